//! Core data models for benefit-vault
//!
//! Eligibility results (externally produced, treated as opaque values),
//! saved vault records, and the strongly-typed record identifier.

pub mod ids;
pub mod record;
pub mod results;

pub use ids::RecordId;
pub use record::{RecordSummary, SavedResultRecord, SensitiveFields};
pub use results::{
    EligibilityResults, EligibilityStatus, EstimatedBenefit, Explanation, NextStep,
    ProgramEligibilityResult,
};
