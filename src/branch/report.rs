//! Report categories, per-architecture buckets and skeleton construction

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::branch::types::{ArchitectureSet, PackageRecord};

/// Report category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Present in sisyphus only
    SisyphusOnly,
    /// Present in p11 only
    P11Only,
    /// Older in sisyphus than in p11
    SisyphusOutdated,
    /// Older in p11 than in sisyphus
    P11Outdated,
}

impl Category {
    /// All categories in report order
    pub const ALL: [Category; 4] = [
        Category::SisyphusOnly,
        Category::P11Only,
        Category::SisyphusOutdated,
        Category::P11Outdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SisyphusOnly => "sisyphus_only",
            Category::P11Only => "p11_only",
            Category::SisyphusOutdated => "sisyphus_outdated",
            Category::P11Outdated => "p11_outdated",
        }
    }

    pub fn is_outdated(&self) -> bool {
        matches!(self, Category::SisyphusOutdated | Category::P11Outdated)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which categories a comparison computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySelection {
    pub sisyphus_only: bool,
    pub p11_only: bool,
    pub sisyphus_outdated: bool,
    pub p11_outdated: bool,
}

impl CategorySelection {
    pub fn all() -> Self {
        Self {
            sisyphus_only: true,
            p11_only: true,
            sisyphus_outdated: true,
            p11_outdated: true,
        }
    }

    pub fn none() -> Self {
        Self {
            sisyphus_only: false,
            p11_only: false,
            sisyphus_outdated: false,
            p11_outdated: false,
        }
    }

    pub fn only(category: Category) -> Self {
        Self::none().with(category)
    }

    pub fn with(mut self, category: Category) -> Self {
        match category {
            Category::SisyphusOnly => self.sisyphus_only = true,
            Category::P11Only => self.p11_only = true,
            Category::SisyphusOutdated => self.sisyphus_outdated = true,
            Category::P11Outdated => self.p11_outdated = true,
        }
        self
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::SisyphusOnly => self.sisyphus_only,
            Category::P11Only => self.p11_only,
            Category::SisyphusOutdated => self.sisyphus_outdated,
            Category::P11Outdated => self.p11_outdated,
        }
    }

    /// Enabled categories in report order
    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| self.is_enabled(*category))
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().next().is_none()
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Version and release of the newer branch, attached to outdated entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestRevision {
    pub latest_version: String,
    pub latest_release: String,
}

impl LatestRevision {
    pub fn of(record: &PackageRecord) -> Self {
        Self {
            latest_version: record.version.clone(),
            latest_release: record.release.clone(),
        }
    }
}

/// Copy of a package record as it appears in a detailed report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRecord {
    #[serde(flatten)]
    pub record: PackageRecord,
    #[serde(flatten)]
    pub latest: Option<LatestRevision>,
}

/// Entries of one category, shaped once by the detail level
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryEntries {
    /// Bare package names
    Names(Vec<String>),
    /// Full records keyed by package name
    Detailed(IndexMap<String, DetailedRecord>),
}

impl CategoryEntries {
    pub fn empty(detailed: bool) -> Self {
        if detailed {
            CategoryEntries::Detailed(IndexMap::new())
        } else {
            CategoryEntries::Names(Vec::new())
        }
    }

    /// Add an entry; `latest` is dropped in names-only mode
    pub fn push(&mut self, record: &PackageRecord, latest: Option<LatestRevision>) {
        match self {
            CategoryEntries::Names(names) => names.push(record.name.clone()),
            CategoryEntries::Detailed(records) => {
                records.insert(
                    record.name.clone(),
                    DetailedRecord {
                        record: record.clone(),
                        latest,
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CategoryEntries::Names(names) => names.len(),
            CategoryEntries::Detailed(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            CategoryEntries::Names(names) => names.iter().any(|n| n == name),
            CategoryEntries::Detailed(records) => records.contains_key(name),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            CategoryEntries::Names(names) => names.iter().map(String::as_str).collect(),
            CategoryEntries::Detailed(records) => records.keys().map(String::as_str).collect(),
        }
    }

    pub fn detailed(&self, name: &str) -> Option<&DetailedRecord> {
        match self {
            CategoryEntries::Names(_) => None,
            CategoryEntries::Detailed(records) => records.get(name),
        }
    }
}

/// Enabled categories of one architecture
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryBucket {
    categories: IndexMap<Category, CategoryEntries>,
}

impl CategoryBucket {
    pub fn new(categories: &CategorySelection, detailed: bool) -> Self {
        Self {
            categories: categories
                .enabled()
                .map(|category| (category, CategoryEntries::empty(detailed)))
                .collect(),
        }
    }

    pub fn get(&self, category: Category) -> Option<&CategoryEntries> {
        self.categories.get(&category)
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut CategoryEntries> {
        self.categories.get_mut(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryEntries)> {
        self.categories.iter().map(|(category, entries)| (*category, entries))
    }

    /// Total number of entries across categories
    pub fn total_entries(&self) -> usize {
        self.categories.values().map(CategoryEntries::len).sum()
    }
}

/// Result of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComparisonReport {
    /// Buckets keyed by architecture
    PerArchitecture(BTreeMap<String, CategoryBucket>),
    /// Bucket of the single requested architecture
    Single(CategoryBucket),
}

impl ComparisonReport {
    pub fn empty() -> Self {
        ComparisonReport::PerArchitecture(BTreeMap::new())
    }

    /// Bucket of an architecture; a single-architecture report answers for any name
    pub fn bucket(&self, arch: &str) -> Option<&CategoryBucket> {
        match self {
            ComparisonReport::PerArchitecture(buckets) => buckets.get(arch),
            ComparisonReport::Single(bucket) => Some(bucket),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ComparisonReport::PerArchitecture(buckets) => buckets.is_empty(),
            ComparisonReport::Single(_) => false,
        }
    }

    /// Total number of entries across architectures and categories
    pub fn total_entries(&self) -> usize {
        match self {
            ComparisonReport::PerArchitecture(buckets) => {
                buckets.values().map(CategoryBucket::total_entries).sum()
            }
            ComparisonReport::Single(bucket) => bucket.total_entries(),
        }
    }
}

/// Build one empty bucket per architecture
///
/// Each bucket is constructed on its own, so buckets never share containers.
pub fn build_skeleton(
    categories: &CategorySelection,
    detailed: bool,
    architectures: &ArchitectureSet,
) -> BTreeMap<String, CategoryBucket> {
    architectures
        .iter()
        .map(|arch| (arch.to_string(), CategoryBucket::new(categories, detailed)))
        .collect()
}
