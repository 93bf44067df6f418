//! Architecture → name lookup table over the records of one branch

use std::collections::HashMap;

use crate::branch::types::{ArchitectureSet, PackageRecord};

/// Read-only index of one branch's records, borrowed from the fetched list
///
/// Every architecture of the set it was built for has a table, possibly
/// empty, so lookups never miss an architecture key.
#[derive(Debug, Default)]
pub struct PackageIndex<'a> {
    tables: HashMap<String, HashMap<&'a str, &'a PackageRecord>>,
}

impl<'a> PackageIndex<'a> {
    /// Index `records` over `architectures`
    ///
    /// On duplicate (arch, name) pairs the last record wins. Records of
    /// architectures outside the set are skipped.
    pub fn build(records: &'a [PackageRecord], architectures: &ArchitectureSet) -> Self {
        let mut tables: HashMap<String, HashMap<&'a str, &'a PackageRecord>> = architectures
            .iter()
            .map(|arch| (arch.to_string(), HashMap::new()))
            .collect();

        for record in records {
            if let Some(table) = tables.get_mut(record.arch.as_str()) {
                table.insert(record.name.as_str(), record);
            }
        }

        Self { tables }
    }

    pub fn get(&self, arch: &str, name: &str) -> Option<&'a PackageRecord> {
        self.tables
            .get(arch)
            .and_then(|table| table.get(name))
            .copied()
    }

    pub fn contains(&self, arch: &str, name: &str) -> bool {
        self.get(arch, name).is_some()
    }

    /// Names indexed for an architecture, in no particular order
    pub fn names(&self, arch: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.tables
            .get(arch)
            .into_iter()
            .flat_map(|table| table.keys().copied())
    }

    pub fn architectures(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Total number of indexed records across all architectures
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
