//! Record stores
//!
//! The Merkle engine never talks to storage directly. A [`RecordStore`] is
//! handed to the [`Registry`](crate::Registry), which takes one snapshot per
//! root or verification.

mod file_store;
mod memory;

pub use file_store::FileStore;
pub use memory::MemoryStore;

use crate::model::{PassportId, Record};
use crate::Result;

/// Persistence for identity records, keyed by passport id
pub trait RecordStore {
    /// Persist a record
    ///
    /// Fails with [`Error::DuplicateRecord`](crate::Error::DuplicateRecord)
    /// if the passport id is already present.
    fn insert(&self, record: &Record) -> Result<()>;

    /// Look up a record by passport id
    fn get(&self, passport_id: &PassportId) -> Result<Option<Record>>;

    /// Snapshot of every stored record, in insertion order
    fn list_all_records(&self) -> Result<Vec<Record>>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
