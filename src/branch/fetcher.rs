//! Fetcher trait for reading the package list of a branch

#[cfg(test)]
use mockall::automock;

use crate::branch::error::FetchError;
use crate::branch::types::{BranchRequest, PackageRecord};

/// Trait for fetching binary package lists from a repository database
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BranchFetcher: Send + Sync {
    /// Fetches all binary packages of a branch
    ///
    /// # Arguments
    /// * `request` - Branch name and optional architecture filter
    ///
    /// # Returns
    /// * `Ok(Vec<PackageRecord>)` - Raw package records, possibly empty
    /// * `Err(FetchError)` - If the fetch fails (distinct from an empty branch)
    async fn fetch(&self, request: &BranchRequest) -> Result<Vec<PackageRecord>, FetchError>;
}
