//! # identity_registry
//!
//! An identity registry whose contents are fingerprinted by a Merkle root.
//!
//! Every record (name, date of birth, passport id) is hashed into a SHA-256
//! leaf digest. Leaf digests are folded pairwise into a single root, and a
//! claimed identity can be checked against that root.
//!
//! ## Core Concepts
//!
//! - **Records**: identity entries keyed by passport id
//! - **Leaf digests**: `H(hex(H(name)) || hex(H(dob)) || hex(H(passport_id)))`
//! - **Merkle root**: pairwise `H(hex(left) || hex(right))`, odd digests
//!   carried up unchanged
//! - **Verification**: candidate leaf digest compared with the root
//!
//! Verification compares one leaf with the root of the whole set, so it only
//! succeeds for a registry holding exactly that one record. See
//! [`merkle::verify_report`].
//!
//! ## Example
//!
//! ```
//! use identity_registry::{MemoryStore, Registry, Verification};
//!
//! let registry = Registry::new(MemoryStore::new());
//! registry.add_record("John", "1990101", "12345")?;
//!
//! let report = registry.verify("John", "1990101", "12345")?;
//! assert_eq!(report.outcome, Verification::Verified);
//! # Ok::<(), identity_registry::Error>(())
//! ```

pub mod config;
pub mod merkle;
pub mod model;
pub mod order;
pub mod store;

mod error;
mod registry;

pub use config::RegistryConfig;
pub use error::{Error, Result};
pub use merkle::{
    build_root, hash_record, verify, MerkleTree, Verification, VerificationReport,
};
pub use model::{Digest, PassportId, Record};
pub use order::RecordOrder;
pub use registry::Registry;
pub use store::{FileStore, MemoryStore, RecordStore};

/// Registry file format version
pub const VERSION: u32 = 1;

/// Magic bytes for file identification
pub const MAGIC: &[u8; 8] = b"IDREG_DB";
