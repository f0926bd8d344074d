//! Identity verification against a Merkle root.
//!
//! The candidate's leaf digest is compared with the root of the whole record
//! set. This only succeeds when the set holds exactly one record and that
//! record equals the candidate field for field. With two or more records
//! the root is a combination hash and can never equal a single leaf, even if
//! the candidate is present. Callers that need membership checks over larger
//! sets need a sibling-path proof, which this crate does not provide.

use super::hasher::hash_record;
use super::tree::build_root;
use crate::model::{Digest, Record};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Outcome of a verification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    Verified,
    NotVerified,
}

impl Verification {
    /// Compare a candidate leaf digest with a root
    pub fn compare(candidate: &Digest, root: &Digest) -> Self {
        if candidate == root {
            Verification::Verified
        } else {
            Verification::NotVerified
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified)
    }
}

impl std::fmt::Display for Verification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verification::Verified => write!(f, "verified"),
            Verification::NotVerified => write!(f, "not verified"),
        }
    }
}

/// Everything computed while verifying a candidate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub outcome: Verification,
    /// Leaf digest of the candidate record
    pub candidate: Digest,
    /// Root over the record set at the time of the check
    pub root: Digest,
    /// Number of records the root was built from
    pub record_count: usize,
}

/// Verify `candidate` against the root of `all_records`, reporting the
/// intermediate digests.
///
/// `all_records` must already be in the intended order. Fails with
/// [`Error::EmptyInput`](crate::Error::EmptyInput) when it is empty.
pub fn verify_report(candidate: &Record, all_records: &[Record]) -> Result<VerificationReport> {
    let leaves: Vec<Digest> = all_records.iter().map(hash_record).collect();
    let root = build_root(&leaves)?;
    let candidate = hash_record(candidate);

    Ok(VerificationReport {
        outcome: Verification::compare(&candidate, &root),
        candidate,
        root,
        record_count: all_records.len(),
    })
}

/// Verify `candidate` against the root of `all_records`.
pub fn verify(candidate: &Record, all_records: &[Record]) -> Result<Verification> {
    Ok(verify_report(candidate, all_records)?.outcome)
}
