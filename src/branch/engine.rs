//! Diff of two branch package sets into a categorized report

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::branch::comparator::{OrderingStrategy, VersionComparator};
use crate::branch::index::PackageIndex;
use crate::branch::report::{
    Category, CategoryBucket, CategorySelection, ComparisonReport, LatestRevision, build_skeleton,
};
use crate::branch::types::{ArchitectureSet, PackageRecord};

/// What a comparison computes and how
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffConfig {
    pub categories: CategorySelection,
    /// Emit full records instead of bare names
    pub detailed: bool,
    pub strategy: OrderingStrategy,
}

/// Compares the records of sisyphus and p11
pub struct DiffEngine {
    config: DiffConfig,
    comparator: Arc<dyn VersionComparator>,
}

impl DiffEngine {
    /// Create an engine using the comparator of the configured strategy
    pub fn new(config: DiffConfig) -> Self {
        Self::with_comparator(config, config.strategy.comparator())
    }

    pub fn with_comparator(config: DiffConfig, comparator: Arc<dyn VersionComparator>) -> Self {
        Self { config, comparator }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compare both branches over `architectures`
    ///
    /// A `Single` architecture set yields the unwrapped bucket of that
    /// architecture. Entry order inside a category is unspecified.
    pub fn diff(
        &self,
        sisyphus: &[PackageRecord],
        p11: &[PackageRecord],
        architectures: &ArchitectureSet,
    ) -> ComparisonReport {
        let sisyphus_index = PackageIndex::build(sisyphus, architectures);
        let p11_index = PackageIndex::build(p11, architectures);

        // Names of every architecture, so lookups below may miss
        let names: IndexSet<&str> = sisyphus
            .iter()
            .chain(p11)
            .map(|record| record.name.as_str())
            .collect();

        debug!(
            "Comparing {} names over {} architectures ({} vs {} indexed records)",
            names.len(),
            architectures.len(),
            sisyphus_index.len(),
            p11_index.len()
        );

        let mut buckets = build_skeleton(
            &self.config.categories,
            self.config.detailed,
            architectures,
        );

        for name in &names {
            for (arch, bucket) in buckets.iter_mut() {
                let left = sisyphus_index.get(arch, name);
                let right = p11_index.get(arch, name);
                self.classify(bucket, left, right);
            }
        }

        for (arch, bucket) in &buckets {
            for (category, entries) in bucket.iter() {
                debug!("{} {}: {} entries", arch, category, entries.len());
            }
        }

        match architectures {
            ArchitectureSet::Single(arch) => ComparisonReport::Single(
                buckets.remove(arch).unwrap_or_else(|| {
                    CategoryBucket::new(&self.config.categories, self.config.detailed)
                }),
            ),
            ArchitectureSet::Observed(_) => ComparisonReport::PerArchitecture(buckets),
        }
    }

    fn classify(
        &self,
        bucket: &mut CategoryBucket,
        sisyphus: Option<&PackageRecord>,
        p11: Option<&PackageRecord>,
    ) {
        match (sisyphus, p11) {
            (Some(left), None) => add(bucket, Category::SisyphusOnly, left, None),
            (None, Some(right)) => add(bucket, Category::P11Only, right, None),
            (Some(left), Some(right)) => {
                if self.config.categories.sisyphus_outdated && self.comparator.is_older(left, right)
                {
                    let latest = LatestRevision::of(right);
                    add(bucket, Category::SisyphusOutdated, left, Some(latest));
                }
                if self.config.categories.p11_outdated && self.comparator.is_older(right, left) {
                    let latest = LatestRevision::of(left);
                    add(bucket, Category::P11Outdated, right, Some(latest));
                }
            }
            (None, None) => {}
        }
    }
}

/// Record into a category if it is enabled in the bucket
fn add(
    bucket: &mut CategoryBucket,
    category: Category,
    record: &PackageRecord,
    latest: Option<LatestRevision>,
) {
    if let Some(entries) = bucket.get_mut(category) {
        entries.push(record, latest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::comparator::MockVersionComparator;
    use crate::branch::report::CategoryEntries;
    use std::collections::HashSet;

    fn rec(name: &str, arch: &str, version: &str, release: &str) -> PackageRecord {
        PackageRecord::new(name, arch, version, release)
    }

    fn config(categories: CategorySelection, detailed: bool) -> DiffConfig {
        DiffConfig {
            categories,
            detailed,
            strategy: OrderingStrategy::Version,
        }
    }

    fn names_of(report: &ComparisonReport, arch: &str, category: Category) -> HashSet<String> {
        report
            .bucket(arch)
            .and_then(|bucket| bucket.get(category))
            .map(|entries| entries.names().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn sample() -> (Vec<PackageRecord>, Vec<PackageRecord>) {
        let sisyphus = vec![
            rec("bash", "x86_64", "5.2", "alt1"),
            rec("zsh", "x86_64", "5.8", "alt1"),
            rec("vim", "x86_64", "9.1", "alt3"),
            rec("only-sis", "x86_64", "1.0", "alt1"),
            rec("bash", "aarch64", "5.2", "alt1"),
        ];
        let p11 = vec![
            rec("bash", "x86_64", "5.2", "alt1"),
            rec("zsh", "x86_64", "5.9", "alt1"),
            rec("vim", "x86_64", "9.0", "alt5"),
            rec("only-p11", "x86_64", "2.0", "alt1"),
            rec("only-p11", "aarch64", "2.0", "alt1"),
        ];
        (sisyphus, p11)
    }

    #[test]
    fn diff_reports_only_and_outdated_per_architecture() {
        let (sisyphus, p11) = sample();
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let engine = DiffEngine::new(config(CategorySelection::all(), false));

        let report = engine.diff(&sisyphus, &p11, &archs);

        assert_eq!(names_of(&report, "x86_64", Category::SisyphusOnly), set(&["only-sis"]));
        assert_eq!(names_of(&report, "x86_64", Category::P11Only), set(&["only-p11"]));
        assert_eq!(names_of(&report, "x86_64", Category::SisyphusOutdated), set(&["zsh"]));
        assert_eq!(names_of(&report, "x86_64", Category::P11Outdated), set(&["vim"]));

        assert_eq!(names_of(&report, "aarch64", Category::SisyphusOnly), set(&["bash"]));
        assert_eq!(names_of(&report, "aarch64", Category::P11Only), set(&["only-p11"]));
        assert!(names_of(&report, "aarch64", Category::SisyphusOutdated).is_empty());
        assert!(names_of(&report, "aarch64", Category::P11Outdated).is_empty());
    }

    #[test]
    fn diff_with_release_strategy_compares_release_ordinals() {
        let (sisyphus, p11) = sample();
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let engine = DiffEngine::new(DiffConfig {
            categories: CategorySelection::all(),
            detailed: false,
            strategy: OrderingStrategy::Release,
        });

        let report = engine.diff(&sisyphus, &p11, &archs);

        assert_eq!(names_of(&report, "x86_64", Category::SisyphusOutdated), set(&["vim"]));
        assert!(names_of(&report, "x86_64", Category::P11Outdated).is_empty());
    }

    #[test]
    fn diff_only_categories_are_exclusive_with_outdated_and_each_other() {
        let (sisyphus, p11) = sample();
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let report = DiffEngine::new(config(CategorySelection::all(), false))
            .diff(&sisyphus, &p11, &archs);

        for arch in archs.iter() {
            let sis_only = names_of(&report, arch, Category::SisyphusOnly);
            let p11_only = names_of(&report, arch, Category::P11Only);
            let sis_outdated = names_of(&report, arch, Category::SisyphusOutdated);
            let p11_outdated = names_of(&report, arch, Category::P11Outdated);

            assert!(sis_only.is_disjoint(&p11_only));
            assert!(sis_only.is_disjoint(&sis_outdated));
            assert!(p11_only.is_disjoint(&p11_outdated));
        }
    }

    #[test]
    fn diff_buckets_carry_exactly_enabled_categories() {
        let (sisyphus, p11) = sample();
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let categories =
            CategorySelection::only(Category::P11Only).with(Category::SisyphusOutdated);

        let report = DiffEngine::new(config(categories, false)).diff(&sisyphus, &p11, &archs);

        let ComparisonReport::PerArchitecture(buckets) = &report else {
            panic!("expected per-architecture report");
        };
        assert_eq!(buckets.len(), 2);
        for bucket in buckets.values() {
            assert_eq!(
                bucket.categories().collect::<Vec<_>>(),
                vec![Category::P11Only, Category::SisyphusOutdated]
            );
        }
        assert!(names_of(&report, "x86_64", Category::SisyphusOnly).is_empty());
    }

    #[test]
    fn diff_end_to_end_sisyphus_outdated_names_only() {
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1")];
        let p11 = vec![rec("foo", "x86_64", "1.1", "alt1")];
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let engine = DiffEngine::new(config(
            CategorySelection::only(Category::SisyphusOutdated),
            false,
        ));

        let report = engine.diff(&sisyphus, &p11, &archs);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({"x86_64": {"sisyphus_outdated": ["foo"]}})
        );
    }

    #[test]
    fn diff_detailed_outdated_entries_carry_other_branch_fields() {
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1"), rec("bar", "x86_64", "3.0", "alt7")];
        let p11 = vec![rec("foo", "x86_64", "1.1", "alt4"), rec("bar", "x86_64", "2.0", "alt2")];
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let engine = DiffEngine::new(config(CategorySelection::all(), true));

        let report = engine.diff(&sisyphus, &p11, &archs);
        let bucket = report.bucket("x86_64").unwrap();

        let foo = bucket
            .get(Category::SisyphusOutdated)
            .and_then(|entries| entries.detailed("foo"))
            .unwrap();
        assert_eq!(foo.record, sisyphus[0]);
        assert_eq!(
            foo.latest,
            Some(LatestRevision {
                latest_version: "1.1".to_string(),
                latest_release: "alt4".to_string(),
            })
        );

        let bar = bucket
            .get(Category::P11Outdated)
            .and_then(|entries| entries.detailed("bar"))
            .unwrap();
        assert_eq!(bar.record, p11[1]);
        assert_eq!(
            bar.latest,
            Some(LatestRevision {
                latest_version: "3.0".to_string(),
                latest_release: "alt7".to_string(),
            })
        );
    }

    #[test]
    fn diff_detailed_leaves_source_records_untouched() {
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1")];
        let p11 = vec![rec("foo", "x86_64", "1.1", "alt1")];
        let before = sisyphus.clone();
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);

        let report =
            DiffEngine::new(config(CategorySelection::all(), true)).diff(&sisyphus, &p11, &archs);

        assert_eq!(report.total_entries(), 1);
        assert_eq!(sisyphus, before);
        assert!(sisyphus[0].extra.get("latest_version").is_none());
    }

    #[test]
    fn diff_detailed_only_entries_have_no_latest_fields() {
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1")];
        let archs = ArchitectureSet::resolve(None, &sisyphus, &[]);

        let report =
            DiffEngine::new(config(CategorySelection::all(), true)).diff(&sisyphus, &[], &archs);

        let entry = report
            .bucket("x86_64")
            .and_then(|bucket| bucket.get(Category::SisyphusOnly))
            .and_then(|entries| entries.detailed("foo"))
            .unwrap();
        assert_eq!(entry.latest, None);
    }

    #[test]
    fn diff_with_single_architecture_returns_unwrapped_bucket() {
        let sisyphus = vec![rec("foo", "noarch", "1.0", "alt1")];
        let p11 = vec![];
        let archs = ArchitectureSet::Single("noarch".to_string());

        let report = DiffEngine::new(config(CategorySelection::only(Category::SisyphusOnly), false))
            .diff(&sisyphus, &p11, &archs);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({"sisyphus_only": ["foo"]})
        );
    }

    #[test]
    fn diff_with_single_architecture_ignores_names_of_other_architectures() {
        // Names of other architectures still enter the name set but never match
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1"), rec("bar", "i586", "1.0", "alt1")];
        let p11 = vec![rec("baz", "aarch64", "1.0", "alt1")];
        let archs = ArchitectureSet::Single("x86_64".to_string());

        let report =
            DiffEngine::new(config(CategorySelection::all(), false)).diff(&sisyphus, &p11, &archs);

        let ComparisonReport::Single(bucket) = &report else {
            panic!("expected single-architecture report");
        };
        assert_eq!(bucket.total_entries(), 1);
        assert!(bucket.get(Category::SisyphusOnly).unwrap().contains("foo"));
    }

    #[test]
    fn diff_of_empty_inputs_is_empty_report() {
        let report = DiffEngine::new(DiffConfig::default()).diff(&[], &[], &ArchitectureSet::empty());

        assert!(report.is_empty());
        assert_eq!(serde_json::to_value(&report).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn diff_is_idempotent_over_identical_input() {
        let (sisyphus, p11) = sample();
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);
        let engine = DiffEngine::new(config(CategorySelection::all(), false));

        let first = engine.diff(&sisyphus, &p11, &archs);
        let second = engine.diff(&sisyphus, &p11, &archs);

        for arch in archs.iter() {
            for category in Category::ALL {
                assert_eq!(
                    names_of(&first, arch, category),
                    names_of(&second, arch, category)
                );
            }
        }
    }

    #[test]
    fn diff_uses_injected_comparator_in_both_directions() {
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1")];
        let p11 = vec![rec("foo", "x86_64", "1.0", "alt1")];
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);

        let mut comparator = MockVersionComparator::new();
        comparator.expect_is_older().times(2).returning(|_, _| true);

        let engine =
            DiffEngine::with_comparator(config(CategorySelection::all(), false), Arc::new(comparator));
        let report = engine.diff(&sisyphus, &p11, &archs);

        assert_eq!(names_of(&report, "x86_64", Category::SisyphusOutdated), set(&["foo"]));
        assert_eq!(names_of(&report, "x86_64", Category::P11Outdated), set(&["foo"]));
    }

    #[test]
    fn diff_skips_comparator_when_outdated_categories_disabled() {
        let sisyphus = vec![rec("foo", "x86_64", "1.0", "alt1")];
        let p11 = vec![rec("foo", "x86_64", "2.0", "alt1")];
        let archs = ArchitectureSet::resolve(None, &sisyphus, &p11);

        let mut comparator = MockVersionComparator::new();
        comparator.expect_is_older().never();

        let categories = CategorySelection::only(Category::SisyphusOnly).with(Category::P11Only);
        let engine = DiffEngine::with_comparator(config(categories, false), Arc::new(comparator));
        let report = engine.diff(&sisyphus, &p11, &archs);

        assert_eq!(report.total_entries(), 0);
        assert!(matches!(
            report.bucket("x86_64").and_then(|b| b.get(Category::SisyphusOnly)),
            Some(CategoryEntries::Names(names)) if names.is_empty()
        ));
    }
}
