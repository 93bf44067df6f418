//! Version ordering between package records of two branches
//!
//! Two interchangeable strategies decide whether a record is older than
//! another one:
//! - version: PEP 440 ordering of the upstream `version` field
//! - release: numeric ordinal of the `release` field ("alt12" -> 12)
//!
//! Both are conservative: anything that fails to parse is never older.

use std::str::FromStr;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use pep508_rs::pep440_rs::Version;
use tracing::debug;

use crate::branch::types::PackageRecord;

/// Length of the distribution prefix in front of the release ordinal
const RELEASE_PREFIX_LEN: usize = 3;

/// Trait for deciding whether one package record is older than another
#[cfg_attr(test, automock)]
pub trait VersionComparator: Send + Sync {
    /// Returns true if `candidate` is strictly older than `reference`
    ///
    /// Unparseable input on either side yields false.
    fn is_older(&self, candidate: &PackageRecord, reference: &PackageRecord) -> bool;
}

/// Which field decides the ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingStrategy {
    /// Compare upstream versions
    #[default]
    Version,
    /// Compare release ordinals
    Release,
}

impl OrderingStrategy {
    /// Returns the comparator implementing this strategy
    pub fn comparator(self) -> Arc<dyn VersionComparator> {
        match self {
            OrderingStrategy::Version => Arc::new(VersionOrdering),
            OrderingStrategy::Release => Arc::new(ReleaseOrdering),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingStrategy::Version => "version",
            OrderingStrategy::Release => "release",
        }
    }
}

/// Orders records by their upstream `version` field
pub struct VersionOrdering;

impl VersionComparator for VersionOrdering {
    fn is_older(&self, candidate: &PackageRecord, reference: &PackageRecord) -> bool {
        match (
            parse_version(&candidate.version),
            parse_version(&reference.version),
        ) {
            (Some(candidate), Some(reference)) => candidate < reference,
            _ => false,
        }
    }
}

/// Orders records by the numeric ordinal of their `release` field
pub struct ReleaseOrdering;

impl VersionComparator for ReleaseOrdering {
    fn is_older(&self, candidate: &PackageRecord, reference: &PackageRecord) -> bool {
        match (
            release_ordinal(&candidate.release),
            release_ordinal(&reference.release),
        ) {
            (Some(candidate), Some(reference)) => candidate < reference,
            _ => false,
        }
    }
}

fn parse_version(version: &str) -> Option<Version> {
    Version::from_str(version)
        .inspect_err(|e| debug!("Failed to parse version '{}': {}", version, e))
        .ok()
}

/// Extract the ordinal from a release string: "alt12" -> 12
pub fn release_ordinal(release: &str) -> Option<u64> {
    let rest = match release.char_indices().nth(RELEASE_PREFIX_LEN) {
        Some((offset, _)) => &release[offset..],
        None => "",
    };
    let ordinal = rest.parse::<u64>().ok();

    if ordinal.is_none() {
        debug!("Failed to parse release ordinal of '{}'", release);
    }

    ordinal
}
