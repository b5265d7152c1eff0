//! Eligibility result data model
//!
//! These structures arrive from an external eligibility-evaluation engine
//! and are treated as opaque values: the vault counts them, sanitizes their
//! text, encrypts them, and hands them back. It never re-evaluates or
//! reinterprets any rule logic.
//!
//! Field names serialize in camelCase and statuses in kebab-case to match
//! the portable export wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Eligibility outcome for a single program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityStatus {
    /// Qualifies under the evaluated rules
    Qualified,
    /// Likely qualifies
    Likely,
    /// Might qualify; more information needed
    Maybe,
    /// Unlikely to qualify
    Unlikely,
    /// Does not qualify
    NotQualified,
}

impl fmt::Display for EligibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qualified => write!(f, "Qualified"),
            Self::Likely => write!(f, "Likely"),
            Self::Maybe => write!(f, "Maybe"),
            Self::Unlikely => write!(f, "Unlikely"),
            Self::NotQualified => write!(f, "Not Qualified"),
        }
    }
}

/// Why the engine reached its conclusion for a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// One-line reason
    pub reason: String,

    /// Supporting detail lines
    #[serde(default)]
    pub details: Vec<String>,

    /// Identifiers of the rules the engine cited
    #[serde(default)]
    pub rules_cited: Vec<String>,
}

/// Estimated benefit amount, when the engine could compute one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedBenefit {
    /// Amount in the program's currency
    pub amount: f64,
    /// Payout frequency, e.g. "monthly"
    pub frequency: String,
}

/// A follow-up action for the user, optionally with a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    /// What to do
    pub step: String,

    /// Where to do it. Untrusted until it passes URL sanitization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Evaluation outcome for one benefit program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEligibilityResult {
    /// Engine-assigned program identifier
    pub program_id: String,

    /// Human-readable program name
    pub program_name: String,

    /// Short program description
    #[serde(default)]
    pub program_description: String,

    /// Jurisdiction the rules were evaluated for, e.g. "CA" or "federal"
    #[serde(default)]
    pub jurisdiction: String,

    /// Eligibility outcome
    pub status: EligibilityStatus,

    /// Confidence label, e.g. "high"
    #[serde(default)]
    pub confidence: String,

    /// Numeric confidence in [0, 1]
    #[serde(default)]
    pub confidence_score: f64,

    /// Why the engine decided this
    pub explanation: Explanation,

    /// Estimated benefit, when computable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_benefit: Option<EstimatedBenefit>,

    /// Documents the user would need to apply
    #[serde(default)]
    pub required_documents: Vec<String>,

    /// Suggested follow-up actions
    #[serde(default)]
    pub next_steps: Vec<NextStep>,

    /// When this program was evaluated
    pub evaluated_at: DateTime<Utc>,

    /// Version of the rule set used
    #[serde(default)]
    pub rules_version: String,
}

/// A full evaluation run, partitioned by outcome.
///
/// Invariant: every program referenced appears in exactly one partition,
/// and `total_programs` counts them all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResults {
    /// Programs the user qualifies for
    #[serde(default)]
    pub qualified: Vec<ProgramEligibilityResult>,

    /// Programs the user likely qualifies for
    #[serde(default)]
    pub likely: Vec<ProgramEligibilityResult>,

    /// Programs that need more information
    #[serde(default)]
    pub maybe: Vec<ProgramEligibilityResult>,

    /// Programs the user does not qualify for (includes "unlikely")
    #[serde(default)]
    pub not_qualified: Vec<ProgramEligibilityResult>,

    /// Total programs across all partitions
    pub total_programs: usize,

    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
}

impl EligibilityResults {
    /// Iterate over every program across all partitions
    pub fn all_programs(&self) -> impl Iterator<Item = &ProgramEligibilityResult> {
        self.qualified
            .iter()
            .chain(self.likely.iter())
            .chain(self.maybe.iter())
            .chain(self.not_qualified.iter())
    }

    /// Mutable iteration over every program (used by sanitization)
    pub fn all_programs_mut(&mut self) -> impl Iterator<Item = &mut ProgramEligibilityResult> {
        self.qualified
            .iter_mut()
            .chain(self.likely.iter_mut())
            .chain(self.maybe.iter_mut())
            .chain(self.not_qualified.iter_mut())
    }

    /// Number of programs in the qualified partition
    pub fn qualified_count(&self) -> usize {
        self.qualified.len()
    }

    /// Program ids across all partitions, in partition order
    pub fn program_ids(&self) -> Vec<String> {
        self.all_programs().map(|p| p.program_id.clone()).collect()
    }

    /// Check the partition invariant: no program id appears twice, and
    /// `total_programs` matches the actual count
    pub fn partitions_consistent(&self) -> bool {
        let ids = self.program_ids();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        unique.len() == ids.len() && ids.len() == self.total_programs
    }
}
