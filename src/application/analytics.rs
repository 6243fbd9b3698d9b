//! Analytics service: Aggregate statistics over the evaluation history.
//!
//! Powers the dashboard overview. All aggregates are computed from the
//! stored history, which is capped, so these are cheap in-memory folds.

use std::sync::Arc;

use crate::domain::{Assessment, RiskLevel};
use crate::ports::HistoryStore;
use crate::ScreenError;

/// Aggregate view of the stored history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryStatistics {
    /// Total records currently stored
    pub total: usize,
    /// Records classified as low risk
    pub low: usize,
    /// Records classified as considerable risk
    pub considerable: usize,
    /// Fraction of records classified considerable (0.0 when empty)
    pub considerable_rate: f64,
    /// Mean risk percentage across records (0.0 when empty)
    pub mean_percentage: f64,
}

impl HistoryStatistics {
    fn from_records(records: &[Assessment]) -> Self {
        let total = records.len();
        let considerable = records
            .iter()
            .filter(|a| a.risk_level == RiskLevel::Considerable)
            .count();
        let low = total - considerable;

        let (considerable_rate, mean_percentage) = if total == 0 {
            (0.0, 0.0)
        } else {
            let sum: u64 = records.iter().map(|a| u64::from(a.percentage)).sum();
            (
                considerable as f64 / total as f64,
                sum as f64 / total as f64,
            )
        };

        Self {
            total,
            low,
            considerable,
            considerable_rate,
            mean_percentage,
        }
    }
}

/// Service computing dashboard statistics from the history store.
pub struct AnalyticsService<S>
where
    S: HistoryStore,
{
    history: Arc<S>,
}

impl<S> AnalyticsService<S>
where
    S: HistoryStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    pub fn new(history: Arc<S>) -> Self {
        Self { history }
    }

    /// Compute aggregate statistics over all stored records.
    ///
    /// # Errors
    /// Returns error if the history cannot be read.
    pub fn statistics(&self) -> Result<HistoryStatistics, ScreenError> {
        let records = self
            .history
            .recent(crate::adapters::sqlite::DEFAULT_HISTORY_CAP)
            .map_err(|e| ScreenError::Storage(e.into()))?;
        Ok(HistoryStatistics::from_records(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteHistory;
    use crate::domain::{Assessment, RiskLevel};
    use chrono::Utc;

    fn record(level: RiskLevel, percentage: u32) -> Assessment {
        Assessment {
            patient_id: None,
            risk_level: level,
            percentage,
            summary: "Age: 70 years".into(),
            recommendations: level.recommendations().iter().map(|s| (*s).into()).collect(),
            physician: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_statistics_empty_history() {
        let history = Arc::new(SqliteHistory::in_memory().expect("Should create db"));
        let analytics = AnalyticsService::new(history);

        let stats = analytics.statistics().expect("Should compute");
        assert_eq!(stats.total, 0);
        assert_eq!(stats.considerable_rate, 0.0);
        assert_eq!(stats.mean_percentage, 0.0);
    }

    #[test]
    fn test_statistics_mixed_records() {
        let history = Arc::new(SqliteHistory::in_memory().expect("Should create db"));
        history
            .append(&record(RiskLevel::Low, 20))
            .expect("Should append");
        history
            .append(&record(RiskLevel::Considerable, 60))
            .expect("Should append");
        history
            .append(&record(RiskLevel::Considerable, 40))
            .expect("Should append");

        let analytics = AnalyticsService::new(history);
        let stats = analytics.statistics().expect("Should compute");

        assert_eq!(stats.total, 3);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.considerable, 2);
        assert!((stats.considerable_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((stats.mean_percentage - 40.0).abs() < 1e-9);
    }
}
