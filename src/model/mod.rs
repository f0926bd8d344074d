//! Core data model types for identity_registry

mod digest;
mod record;

pub use digest::Digest;
pub use record::{PassportId, Record};
