//! High-level Registry API
//!
//! This module provides the main entry point for interacting with
//! identity_registry.

use crate::merkle::{self, MerkleTree, VerificationReport};
use crate::model::{Digest, PassportId, Record};
use crate::order::RecordOrder;
use crate::store::{FileStore, RecordStore};
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// The main registry interface
///
/// Wraps a [`RecordStore`] and provides:
/// - Adding identity records
/// - Computing leaf digests and the Merkle root of the current contents
/// - Verifying a claimed identity against that root
///
/// Nothing is cached: every root or verification takes a fresh snapshot of
/// the store and puts it into the registry's [`RecordOrder`].
pub struct Registry<S: RecordStore> {
    store: S,
    order: RecordOrder,
}

impl Registry<FileStore> {
    /// Create a new registry file at the given path
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Registry::new(FileStore::create(path)?))
    }

    /// Open an existing registry file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Registry::new(FileStore::open(path)?))
    }

    /// Open or create a registry file
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Registry::new(FileStore::open_or_create(path)?))
    }

    /// Flush the underlying file
    pub fn sync(&self) -> Result<()> {
        self.store.sync()
    }
}

impl<S: RecordStore> Registry<S> {
    /// Wrap a store using the default record order
    pub fn new(store: S) -> Self {
        Registry {
            store,
            order: RecordOrder::default(),
        }
    }

    /// Set the order in which records become leaves
    pub fn with_order(mut self, order: RecordOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> RecordOrder {
        self.order
    }

    // === Record Operations ===

    /// Add an identity record
    ///
    /// Fails with [`Error::DuplicateRecord`] if the passport id is taken.
    pub fn add_record(
        &self,
        name: impl Into<String>,
        date_of_birth: impl ToString,
        passport_id: impl Into<PassportId>,
    ) -> Result<Record> {
        let record = Record::new(name, date_of_birth, passport_id);
        self.insert(&record)?;
        Ok(record)
    }

    /// Insert an already-built record
    pub fn insert(&self, record: &Record) -> Result<()> {
        self.store.insert(record)?;
        info!(passport_id = %record.passport_id, "added record");
        Ok(())
    }

    /// Get a record by passport id
    pub fn get_record(&self, passport_id: impl Into<PassportId>) -> Result<Record> {
        let passport_id = passport_id.into();
        self.store
            .get(&passport_id)?
            .ok_or_else(|| Error::NotFound(passport_id.to_string()))
    }

    /// Snapshot of all records, in the registry's order
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut records = self.store.list_all_records()?;
        self.order.apply(&mut records);
        debug!(count = records.len(), order = %self.order, "fetched records");
        Ok(records)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // === Merkle Operations ===

    /// Leaf digests of the current snapshot, in order
    pub fn leaf_digests(&self) -> Result<Vec<Digest>> {
        let leaves: Vec<Digest> = self.records()?.iter().map(merkle::hash_record).collect();
        debug!(leaves = ?leaves, "hashed records");
        Ok(leaves)
    }

    /// Full Merkle tree over the current snapshot
    pub fn merkle_tree(&self) -> Result<MerkleTree> {
        MerkleTree::build(self.leaf_digests()?)
    }

    /// Merkle root of the current snapshot
    ///
    /// Fails with [`Error::EmptyInput`] when the registry is empty.
    #[instrument(skip(self), fields(order = %self.order))]
    pub fn merkle_root(&self) -> Result<Digest> {
        let root = merkle::build_root(&self.leaf_digests()?)?;
        info!(root = %root, "computed merkle root");
        Ok(root)
    }

    // === Verification ===

    /// Verify a claimed identity against the root of the current snapshot
    ///
    /// See [`merkle::verify_report`] for why this only succeeds when the
    /// registry holds exactly one matching record.
    #[instrument(skip_all, fields(passport_id = tracing::field::Empty))]
    pub fn verify(
        &self,
        name: impl Into<String>,
        date_of_birth: impl ToString,
        passport_id: impl Into<PassportId>,
    ) -> Result<VerificationReport> {
        let candidate = Record::new(name, date_of_birth, passport_id);
        tracing::Span::current().record("passport_id", candidate.passport_id.as_str());
        self.verify_record(&candidate)
    }

    /// Verify an already-built candidate record
    pub fn verify_record(&self, candidate: &Record) -> Result<VerificationReport> {
        let records = self.records()?;
        let report = merkle::verify_report(candidate, &records)?;

        debug!(candidate = %report.candidate, root = %report.root, "compared candidate to root");
        if report.outcome.is_verified() {
            info!(records = report.record_count, "identity verified");
        } else {
            if report.record_count > 1 {
                warn!(
                    records = report.record_count,
                    "root spans several records; a single leaf cannot match it"
                );
            }
            info!(records = report.record_count, "identity verification failed");
        }

        Ok(report)
    }
}
