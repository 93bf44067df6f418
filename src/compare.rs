//! Comparison pipeline: fetch both branches, absorb failures, diff
//!
//! Failure policy:
//! - both fetches failed: empty record lists, empty architecture set, empty report
//! - one fetch failed: that branch counts as having zero packages

use futures::future::join;
use tracing::{error, info, warn};

use crate::branch::engine::{DiffConfig, DiffEngine};
use crate::branch::fetcher::BranchFetcher;
use crate::branch::report::ComparisonReport;
use crate::branch::types::{ArchitectureSet, Branch, BranchRequest, PackageRecord};
use crate::config::Settings;

/// Options of a single comparison run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Restrict the comparison to one architecture and unwrap the report
    pub architecture: Option<String>,
    pub diff: DiffConfig,
}

/// Raw package sets as fetched, with the branches whose fetch failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchSnapshot {
    pub sisyphus: Vec<PackageRecord>,
    pub p11: Vec<PackageRecord>,
    pub failed: Vec<Branch>,
}

impl BranchSnapshot {
    pub fn records(&self, branch: Branch) -> &[PackageRecord] {
        match branch {
            Branch::Sisyphus => &self.sisyphus,
            Branch::P11 => &self.p11,
        }
    }

    pub fn all_failed(&self) -> bool {
        self.failed.contains(&Branch::Sisyphus) && self.failed.contains(&Branch::P11)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    pub report: ComparisonReport,
    pub snapshot: BranchSnapshot,
}

/// Fetch both branches concurrently
pub async fn fetch_snapshot(
    fetcher: &dyn BranchFetcher,
    settings: &Settings,
    architecture: Option<&str>,
) -> BranchSnapshot {
    let sisyphus_request = BranchRequest::new(&settings.branches.sisyphus, architecture);
    let p11_request = BranchRequest::new(&settings.branches.p11, architecture);

    let (sisyphus, p11) = join(
        fetcher.fetch(&sisyphus_request),
        fetcher.fetch(&p11_request),
    )
    .await;

    let mut snapshot = BranchSnapshot::default();

    for (branch, request, result) in [
        (Branch::Sisyphus, &sisyphus_request, sisyphus),
        (Branch::P11, &p11_request, p11),
    ] {
        match result {
            Ok(records) => {
                info!(
                    "Fetched {} packages from branch {}",
                    records.len(),
                    request.branch
                );
                match branch {
                    Branch::Sisyphus => snapshot.sisyphus = records,
                    Branch::P11 => snapshot.p11 = records,
                }
            }
            Err(e) => {
                warn!("Failed to fetch branch {}: {}", request.branch, e);
                snapshot.failed.push(branch);
            }
        }
    }

    snapshot
}

/// Run a full comparison against the fetcher
pub async fn run(
    fetcher: &dyn BranchFetcher,
    settings: &Settings,
    options: &CompareOptions,
) -> ComparisonOutcome {
    let snapshot = fetch_snapshot(fetcher, settings, options.architecture.as_deref()).await;
    let report = compare_snapshot(&snapshot, options);

    ComparisonOutcome { report, snapshot }
}

/// Diff an already fetched snapshot
pub fn compare_snapshot(snapshot: &BranchSnapshot, options: &CompareOptions) -> ComparisonReport {
    if snapshot.all_failed() {
        error!("Failed to fetch both branches, producing an empty report");
        return ComparisonReport::empty();
    }

    for branch in &snapshot.failed {
        warn!(
            "Treating branch {} as having no packages for all architectures",
            branch
        );
    }

    let architectures = ArchitectureSet::resolve(
        options.architecture.as_deref(),
        &snapshot.sisyphus,
        &snapshot.p11,
    );

    let engine = DiffEngine::new(options.diff);
    let report = engine.diff(&snapshot.sisyphus, &snapshot.p11, &architectures);
    info!(
        "Comparison finished: {} entries over {} architectures",
        report.total_entries(),
        architectures.len()
    );

    report
}
