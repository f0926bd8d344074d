//! Record ordering applied before hashing
//!
//! The Merkle root depends on leaf order, so a store snapshot is always put
//! into a declared order before it is hashed.

use crate::model::Record;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order in which records become Merkle leaves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrder {
    /// Keep whatever order the store returns (insertion order for the
    /// bundled stores)
    Insertion,
    /// Sort by passport id, byte-wise
    ///
    /// This is not a SQL collation: MySQL's default collations compare
    /// case-insensitively, so `"ab1"` and `"AB2"` may scan in a different
    /// order there than here.
    #[default]
    PassportId,
    /// Sort by name, ties broken by passport id
    Name,
}

impl RecordOrder {
    /// Put a snapshot into this order
    pub fn apply(&self, records: &mut [Record]) {
        match self {
            RecordOrder::Insertion => {}
            RecordOrder::PassportId => records.sort_by(|a, b| a.passport_id.cmp(&b.passport_id)),
            RecordOrder::Name => records.sort_by(|a, b| {
                a.name
                    .cmp(&b.name)
                    .then_with(|| a.passport_id.cmp(&b.passport_id))
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOrder::Insertion => "insertion",
            RecordOrder::PassportId => "passport_id",
            RecordOrder::Name => "name",
        }
    }
}

impl fmt::Display for RecordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insertion" => Ok(RecordOrder::Insertion),
            "passport_id" | "passport-id" | "passport" => Ok(RecordOrder::PassportId),
            "name" => Ok(RecordOrder::Name),
            other => Err(Error::Config(format!("Unknown record order: {}", other))),
        }
    }
}
