//! RecordStore implementation
//!
//! BTreeMap-based store with RwLock for concurrency.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::record::Record;

/// Concurrent, duplicate-rejecting record store
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<BTreeMap<String, Arc<Record>>>,
}

impl RecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a record by its exact primary key (read lock)
    pub fn find_by_key(&self, key: &str) -> Result<Arc<Record>, StoreError> {
        self.records
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    /// Whether a record with this key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.records.read().contains_key(key)
    }

    /// Insert a record if its key is absent (write lock)
    ///
    /// An existing record is left untouched and the new one is dropped.
    pub fn save(&self, record: Record) -> Result<(), StoreError> {
        let mut records = self.records.write();
        match records.entry(record.primary_key().to_string()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(record));
                Ok(())
            }
        }
    }

    /// Remove the record stored under `record`'s primary key
    ///
    /// Returns the removed record. Deleting an absent key is an error.
    pub fn delete(&self, record: &Record) -> Result<Arc<Record>, StoreError> {
        self.delete_key(record.primary_key())
    }

    /// Remove the record stored under `key`
    pub fn delete_key(&self, key: &str) -> Result<Arc<Record>, StoreError> {
        self.records
            .write()
            .remove(key)
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }

    /// Point-in-time copy of every record, in ascending key order
    pub fn snapshot(&self) -> Vec<Arc<Record>> {
        self.records.read().values().cloned().collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
