//! Merkle fingerprints over identity records
//!
//! - `hasher`: record → leaf digest
//! - `tree`: leaf digests → root digest
//! - `verify`: candidate record vs. the root of a record set

mod hasher;
mod tree;
mod verify;

pub use hasher::{hash_field, hash_record};
pub use tree::{build_root, hash_pair, next_level, MerkleTree};
pub use verify::{verify, verify_report, Verification, VerificationReport};
