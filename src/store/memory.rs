//! In-memory record store

use super::RecordStore;
use crate::model::{PassportId, Record};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    records: Vec<Record>,
    /// passport id → position in `records`
    index: HashMap<PassportId, usize>,
}

/// A record store that lives only as long as the process
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let store = Self::new();
        for record in records {
            store.insert(&record)?;
        }
        Ok(store)
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, record: &Record) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.index.contains_key(&record.passport_id) {
            return Err(Error::DuplicateRecord(record.passport_id.to_string()));
        }
        let pos = inner.records.len();
        inner.index.insert(record.passport_id.clone(), pos);
        inner.records.push(record.clone());
        Ok(())
    }

    fn get(&self, passport_id: &PassportId) -> Result<Option<Record>> {
        let inner = self.inner.read();
        Ok(inner
            .index
            .get(passport_id)
            .map(|&pos| inner.records[pos].clone()))
    }

    fn list_all_records(&self) -> Result<Vec<Record>> {
        Ok(self.inner.read().records.clone())
    }

    fn len(&self) -> usize {
        self.inner.read().records.len()
    }
}
