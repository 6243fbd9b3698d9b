//! Application layer: Use case orchestration.
//!
//! Services coordinate the domain logic with the storage port. They hold no
//! UI concerns; the TUI calls into them and renders what comes back.

mod analytics;
mod screening;

pub use analytics::{AnalyticsService, HistoryStatistics};
pub use screening::{ScreeningOutcome, ScreeningService};
