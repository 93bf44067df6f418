//! Common types for branch package sets

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role a branch plays in a comparison
///
/// The concrete branch names ("sisyphus", "p11") come from configuration;
/// the role decides which report categories a branch feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    /// Development branch (sisyphus)
    Sisyphus,
    /// Stable branch (p11)
    P11,
}

impl Branch {
    /// Returns the string representation of the branch role
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Sisyphus => "sisyphus",
            Branch::P11 => "p11",
        }
    }
}

impl std::str::FromStr for Branch {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sisyphus" => Ok(Branch::Sisyphus),
            "p11" => Ok(Branch::P11),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single binary package entry as returned by the branch API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name, unique per architecture within a branch
    pub name: String,
    /// Target architecture (x86_64, aarch64, noarch, ...)
    pub arch: String,
    /// Upstream version string, arbitrary format
    pub version: String,
    /// Distribution release string (e.g. "alt1")
    pub release: String,
    /// Remaining API fields (epoch, disttag, buildtime, source, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageRecord {
    pub fn new(name: &str, arch: &str, version: &str, release: &str) -> Self {
        Self {
            name: name.to_string(),
            arch: arch.to_string(),
            version: version.to_string(),
            release: release.to_string(),
            extra: Map::new(),
        }
    }
}

/// Parameters of a single branch fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRequest {
    /// Branch name as known to the remote database
    pub branch: String,
    /// Restrict the result to one architecture
    pub architecture: Option<String>,
}

impl BranchRequest {
    pub fn new(branch: &str, architecture: Option<&str>) -> Self {
        Self {
            branch: branch.to_string(),
            architecture: architecture.map(str::to_string),
        }
    }
}

/// Architectures considered by a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchitectureSet {
    /// A single architecture explicitly requested; the report is unwrapped to it
    Single(String),
    /// Every architecture observed in the fetched records, sorted
    Observed(BTreeSet<String>),
}

impl ArchitectureSet {
    /// Resolve the set from an optional filter and the records of both branches
    pub fn resolve(
        filter: Option<&str>,
        sisyphus: &[PackageRecord],
        p11: &[PackageRecord],
    ) -> Self {
        match filter {
            Some(arch) => ArchitectureSet::Single(arch.to_string()),
            None => ArchitectureSet::Observed(
                sisyphus
                    .iter()
                    .chain(p11)
                    .map(|record| record.arch.clone())
                    .collect(),
            ),
        }
    }

    /// Empty set, used when no branch could be fetched
    pub fn empty() -> Self {
        ArchitectureSet::Observed(BTreeSet::new())
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            ArchitectureSet::Single(arch) => Box::new(std::iter::once(arch.as_str())),
            ArchitectureSet::Observed(archs) => Box::new(archs.iter().map(String::as_str)),
        }
    }

    pub fn contains(&self, arch: &str) -> bool {
        match self {
            ArchitectureSet::Single(single) => single == arch,
            ArchitectureSet::Observed(archs) => archs.contains(arch),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArchitectureSet::Single(_) => 1,
            ArchitectureSet::Observed(archs) => archs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
