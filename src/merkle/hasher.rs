//! Leaf hashing for identity records.

use crate::model::{Digest, Record};

/// Hash a single field value to its SHA-256 digest.
#[inline]
pub fn hash_field(value: &str) -> Digest {
    Digest::digest(value.as_bytes())
}

/// Compute the leaf digest of a record.
///
/// `H(hex(H(name)) || hex(H(date_of_birth)) || hex(H(passport_id)))`, where
/// `||` concatenates the lowercase hex text. Field order is fixed. Any string,
/// including the empty string, is hashable, so this never fails.
pub fn hash_record(record: &Record) -> Digest {
    Digest::digest_hex_concat(&[
        hash_field(&record.name),
        hash_field(&record.date_of_birth),
        hash_field(record.passport_id.as_str()),
    ])
}
