//! Strongly-typed ID wrapper for saved result records
//!
//! A newtype over UUID keeps record identifiers from being confused with
//! the free-form program id strings that arrive inside eligibility results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a saved result record.
///
/// Assigned once when the record is created and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ID from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Short prefix form for compact listings
    pub fn short(&self) -> String {
        format!("rec-{}", &self.0.to_string()[..8])
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rec-{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(uuid) = Uuid::parse_str(s) {
            return Ok(Self(uuid));
        }
        let s = s.strip_prefix("rec-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_creation() {
        let id = RecordId::new();
        assert!(!id.as_uuid().is_nil());
    }

    #[test]
    fn test_id_display_round_trips() {
        let id = RecordId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("rec-"));
        assert_eq!(display.parse::<RecordId>().unwrap(), id);
    }

    #[test]
    fn test_id_short_form() {
        let id = RecordId::new();
        let short = id.short();
        assert!(short.starts_with("rec-"));
        assert_eq!(short.len(), 12); // "rec-" + 8 chars
    }

    #[test]
    fn test_id_equality() {
        let id1 = RecordId::new();
        let id2 = id1;
        assert_eq!(id1, id2);

        let id3 = RecordId::new();
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_serialization() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = RecordId::parse(uuid_str).unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }
}
