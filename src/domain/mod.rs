//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies.
//! All types are serializable; the scorer is a pure function of its input.

mod assessment;
mod patient;
mod scoring;

pub use assessment::{
    Assessment, RiskLevel, RiskReport, CONSIDERABLE_RISK_RECOMMENDATIONS,
    LOW_RISK_RECOMMENDATIONS,
};
pub use patient::{field, FormData, Gender, IntakeError, PatientIntake, REQUIRED_FIELDS};
pub use scoring::{RiskScorer, ScoreBreakdown, ScoringConfig};
