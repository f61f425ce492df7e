//! Genre-grouped catalog index
//!
//! The index is a pure function of the entry list. It is rebuilt from
//! scratch whenever the list changes, never patched.

use std::collections::BTreeMap;

use super::entry::CatalogEntry;

/// Entries grouped by primary genre.
///
/// Buckets iterate in lexicographic label order; within a bucket entries
/// keep catalog insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    buckets: BTreeMap<String, Vec<CatalogEntry>>,
}

impl CatalogIndex {
    /// Group `entries` by [`CatalogEntry::primary_genre`]
    pub fn rebuild(entries: &[CatalogEntry]) -> Self {
        let mut buckets: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        for entry in entries {
            buckets
                .entry(entry.primary_genre().to_string())
                .or_default()
                .push(entry.clone());
        }
        Self { buckets }
    }

    /// Exact-label bucket lookup
    pub fn bucket(&self, genre: &str) -> Option<&[CatalogEntry]> {
        self.buckets.get(genre).map(Vec::as_slice)
    }

    /// Genre labels in presentation order
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn buckets(&self) -> &BTreeMap<String, Vec<CatalogEntry>> {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of indexed entries
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
