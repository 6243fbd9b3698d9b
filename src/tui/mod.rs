//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a professional medical-themed interface for:
//! - Dashboard with system status and aggregate history statistics
//! - Questionnaire intake form
//! - Evaluation result with factors and recommendations
//! - Evaluation history browser

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
