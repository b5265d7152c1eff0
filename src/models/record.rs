//! Saved result record model
//!
//! A vault record splits into two halves: plaintext index fields used for
//! listing and sorting without a key, and a sealed payload holding
//! everything sensitive. The sealed half is produced and consumed only
//! through the crypto field-cipher boundary; this module just defines the
//! shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::SealedBox;

use super::ids::RecordId;
use super::results::EligibilityResults;

/// The sensitive half of a record. Serialized to JSON, then sealed; this
/// struct never hits disk in plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitiveFields {
    /// Host-application user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Display name the results were computed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// The full eligibility results
    pub results: EligibilityResults,

    /// Opaque snapshot of the answers/profile that produced the results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_snapshot: Option<serde_json::Map<String, serde_json::Value>>,

    /// Free-form user notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A persisted vault record: plaintext index fields plus the sealed
/// sensitive payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedResultRecord {
    /// Unique identifier, assigned at save and immutable afterwards
    pub id: RecordId,

    /// When the evaluation ran; the listing sort key. Never mutated.
    pub evaluated_at: DateTime<Utc>,

    /// State/jurisdiction label, kept in plaintext for listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Number of programs in the qualified partition
    pub qualified_count: usize,

    /// Program ids across all partitions
    #[serde(default)]
    pub programs_evaluated: Vec<String>,

    /// User-assigned tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last modified
    pub updated_at: DateTime<Utc>,

    /// Encrypted [`SensitiveFields`] JSON
    pub sealed: SealedBox,
}

impl SavedResultRecord {
    /// The index-only view handed out by listing
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            evaluated_at: self.evaluated_at,
            state: self.state.clone(),
            qualified_count: self.qualified_count,
            programs_evaluated: self.programs_evaluated.clone(),
            tags: self.tags.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Plaintext index fields of a record, without the sealed payload.
///
/// This is what `list_summaries` returns: enough to render a list of saved
/// runs without decrypting anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Record identifier
    pub id: RecordId,
    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
    /// State/jurisdiction label
    pub state: Option<String>,
    /// Number of qualified programs
    pub qualified_count: usize,
    /// Program ids across all partitions
    pub programs_evaluated: Vec<String>,
    /// User-assigned tags
    pub tags: Vec<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::results::EligibilityResults;
    use chrono::TimeZone;

    fn empty_results(evaluated_at: DateTime<Utc>) -> EligibilityResults {
        EligibilityResults {
            qualified: vec![],
            likely: vec![],
            maybe: vec![],
            not_qualified: vec![],
            total_programs: 0,
            evaluated_at,
        }
    }

    #[test]
    fn test_sensitive_fields_round_trip() {
        let evaluated_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let fields = SensitiveFields {
            user_id: Some("user-1".into()),
            user_name: Some("Alex".into()),
            results: empty_results(evaluated_at),
            profile_snapshot: None,
            notes: Some("first run".into()),
        };

        let json = serde_json::to_string(&fields).unwrap();
        let back: SensitiveFields = serde_json::from_str(&json).unwrap();
        assert_eq!(fields, back);
    }

    #[test]
    fn test_summary_carries_index_fields_only() {
        let now = Utc::now();
        let record = SavedResultRecord {
            id: RecordId::new(),
            evaluated_at: now,
            state: Some("CA".into()),
            qualified_count: 2,
            programs_evaluated: vec!["snap".into(), "wic".into()],
            tags: vec!["march".into()],
            created_at: now,
            updated_at: now,
            sealed: SealedBox::from_encoded("b64payload"),
        };

        let summary = record.summary();
        assert_eq!(summary.id, record.id);
        assert_eq!(summary.qualified_count, 2);
        assert_eq!(summary.tags, vec!["march"]);

        // The summary type has no sealed field to leak
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("b64payload"));
    }
}
