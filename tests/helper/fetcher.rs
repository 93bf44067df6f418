//! Fetcher test utilities

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use branch_diff::branch::error::FetchError;
use branch_diff::branch::fetcher::BranchFetcher;
use branch_diff::branch::types::{BranchRequest, PackageRecord};

pub fn record(name: &str, arch: &str, version: &str, release: &str) -> PackageRecord {
    PackageRecord::new(name, arch, version, release)
}

/// In-memory fetcher serving fixed package sets per branch
///
/// Unknown branches fail with `NotFound`; the architecture filter is
/// applied the way the remote API applies it.
#[derive(Default)]
pub struct FakeFetcher {
    branches: HashMap<String, Vec<PackageRecord>>,
    requests: Mutex<Vec<BranchRequest>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(mut self, branch: &str, records: Vec<PackageRecord>) -> Self {
        self.branches.insert(branch.to_string(), records);
        self
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<BranchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BranchFetcher for FakeFetcher {
    async fn fetch(&self, request: &BranchRequest) -> Result<Vec<PackageRecord>, FetchError> {
        self.requests.lock().unwrap().push(request.clone());

        let records = self
            .branches
            .get(&request.branch)
            .ok_or_else(|| FetchError::NotFound(request.branch.clone()))?;

        Ok(records
            .iter()
            .filter(|record| {
                request
                    .architecture
                    .as_deref()
                    .is_none_or(|arch| record.arch == arch)
            })
            .cloned()
            .collect())
    }
}
