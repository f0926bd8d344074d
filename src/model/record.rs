//! Identity record - the unit stored in the registry

use serde::{Deserialize, Serialize};

/// Unique key of a record in the store
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassportId(pub String);

impl PassportId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PassportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PassportId {
    fn from(s: &str) -> Self {
        PassportId(s.to_string())
    }
}

impl From<String> for PassportId {
    fn from(s: String) -> Self {
        PassportId(s)
    }
}

impl From<&PassportId> for PassportId {
    fn from(id: &PassportId) -> Self {
        id.clone()
    }
}

/// An identity record: name, date of birth and passport id
///
/// Fields are kept exactly as given. No trimming or case folding happens
/// anywhere, so `"John"` and `"John "` are different identities.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Holder's name
    pub name: String,

    /// Date of birth in whatever textual form the caller uses
    pub date_of_birth: String,

    /// Passport identifier, unique within a store
    pub passport_id: PassportId,
}

impl Record {
    /// Create a new record
    ///
    /// The date of birth accepts anything with a string form, so numeric
    /// dates such as `1990101u32` are stringified before they are hashed.
    pub fn new(
        name: impl Into<String>,
        date_of_birth: impl ToString,
        passport_id: impl Into<PassportId>,
    ) -> Self {
        Record {
            name: name.into(),
            date_of_birth: date_of_birth.to_string(),
            passport_id: passport_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = Record::new("John", "1990101", "12345");
        assert_eq!(record.name, "John");
        assert_eq!(record.date_of_birth, "1990101");
        assert_eq!(record.passport_id.as_str(), "12345");
    }

    #[test]
    fn test_numeric_date_of_birth_is_stringified() {
        let numeric = Record::new("John", 1990101u32, "12345");
        let textual = Record::new("John", "1990101", "12345");
        assert_eq!(numeric, textual);
    }

    #[test]
    fn test_fields_are_not_normalized() {
        let record = Record::new(" John ", "1990101", "ab12");
        assert_eq!(record.name, " John ");
        assert_ne!(record, Record::new("John", "1990101", "ab12"));
    }

    #[test]
    fn test_record_json_roundtrip() {
        let record = Record::new("Mary", "1985203", "67890");
        let json = serde_json::to_string(&record).unwrap();
        let restored: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
    }
}
