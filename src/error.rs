//! Error types for identity_registry

use thiserror::Error;

/// Result type alias for identity_registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in identity_registry operations
///
/// A failed verification is not an error: it is reported as
/// [`Verification::NotVerified`](crate::Verification::NotVerified).
#[derive(Error, Debug)]
pub enum Error {
    /// A Merkle reduction was attempted over zero digests
    #[error("Cannot build a Merkle root from an empty set of digests")]
    EmptyInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The passport id is already present in the store
    #[error("Duplicate record: passport id {0} already exists")]
    DuplicateRecord(String),

    /// An encoded record exceeds what the file store accepts
    #[error("Record too large: {size} bytes (max {max})")]
    RecordTooLarge { size: usize, max: usize },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Invalid registry file: {0}")]
    InvalidFile(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Config error: {0}")]
    Config(String),
}
