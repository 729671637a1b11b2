//! An indexed, insertion-ordered store of metadata records.

use std::collections::HashMap;

use crate::collect::{collect_hierarchy, CollectOptions};
use crate::container::{ContainerError, ReadableContainerTraits};

use super::MetadataRecord;

/// An indexed collection of [`MetadataRecord`]s.
///
/// Records are keyed by a key function (by default the record name) and kept
/// in insertion order. Duplicate keys are not an error: the last record with
/// a key wins, and the key keeps its first-insertion position. Callers that
/// require unique keys can key by the record `id` or detect collisions
/// themselves.
///
/// A store is built once from a collected record sequence and is read-only
/// thereafter.
#[derive(Debug)]
pub struct RecordStore {
    entries: Vec<(String, MetadataRecord)>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Create a store over `records`, keyed by record name.
    #[must_use]
    pub fn new(records: Vec<MetadataRecord>) -> Self {
        Self::new_with_key(records, |record| record.name.clone())
    }

    /// Create a store over `records`, keyed by `key_fn`.
    #[must_use]
    pub fn new_with_key(
        records: Vec<MetadataRecord>,
        key_fn: impl Fn(&MetadataRecord) -> String,
    ) -> Self {
        let mut entries: Vec<(String, MetadataRecord)> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        for record in records {
            let key = key_fn(&record);
            match index.get(&key) {
                Some(&position) => entries[position].1 = record,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, record));
                }
            }
        }
        Self { entries, index }
    }

    /// Collect the whole hierarchy of `container` and index it by record
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError`] if traversal fails (see
    /// [`collect_hierarchy`]).
    pub fn from_container<TContainer: ReadableContainerTraits + ?Sized>(
        container: &TContainer,
        options: &CollectOptions,
    ) -> Result<Self, ContainerError> {
        Ok(Self::new(collect_hierarchy(container, options)?))
    }

    /// Returns the record for `key`, or [`None`] if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataRecord> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Returns the record for `key`, or `default` if absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a MetadataRecord) -> &'a MetadataRecord {
        self.get(key).unwrap_or(default)
    }

    /// The keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// The records, in key insertion order.
    pub fn values(&self) -> impl Iterator<Item = &MetadataRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    /// The key/record pairs, in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataRecord)> {
        self.entries
            .iter()
            .map(|(key, record)| (key.as_str(), record))
    }

    /// The number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indicates if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl serde::Serialize for RecordStore {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = s.serialize_map(Some(self.entries.len()))?;
        for (key, record) in self.iter() {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}
