//! # NeuroScreen
//!
//! Local-only Alzheimer's risk screening questionnaire.
//!
//! This crate provides:
//! - A deterministic weighted risk scorer over health indicators
//! - A capped SQLite history of past evaluations
//! - A terminal UI for data entry and review
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientIntake, RiskScorer, Assessment)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (SQLite, log sanitization)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Assessment, PatientIntake, RiskLevel, RiskReport, RiskScorer, ScoringConfig};

/// Result type for NeuroScreen operations
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Main error type for NeuroScreen
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("Invalid intake data: {0}")]
    Intake(#[from] domain::IntakeError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
