//! SQLite adapter: Implementation of HistoryStore.
//!
//! Provides local persistence for the evaluation history. The history is
//! capped (oldest records evicted past the cap) while patient IDs come from
//! the table's AUTOINCREMENT sequence, so IDs stay unique across evictions.
//!
//! # Mutex Behavior
//!
//! Database connection is protected by `Mutex`. A poisoned mutex (from panic
//! in another thread) will cause panic. This fail-fast behavior is intentional
//! for data integrity in healthcare applications.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::domain::{Assessment, RiskLevel};
use crate::ports::{HistoryPage, HistoryStore};

/// Maximum number of history records kept (oldest evicted first).
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// SQLite history adapter.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
    cap: usize,
}

impl SqliteHistory {
    /// Create a new SQLite history with the given database path.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::with_cap(Connection::open(path)?, DEFAULT_HISTORY_CAP)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_cap(Connection::open_in_memory()?, DEFAULT_HISTORY_CAP)
    }

    /// Create an in-memory database with a custom history cap (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory_with_cap(cap: usize) -> Result<Self, StorageError> {
        Self::with_cap(Connection::open_in_memory()?, cap)
    }

    fn with_cap(conn: Connection, cap: usize) -> Result<Self, StorageError> {
        let storage = Self {
            conn: Mutex::new(conn),
            cap,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().expect("Lock failed");

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS assessments (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                patient_id TEXT NOT NULL DEFAULT '',
                risk_level TEXT NOT NULL,
                percentage INTEGER NOT NULL,
                summary TEXT NOT NULL,
                recommendations TEXT NOT NULL,
                physician TEXT,
                created_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    /// Convert RiskLevel to string for storage.
    fn risk_level_to_string(level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Low => "low",
            RiskLevel::Considerable => "considerable",
        }
    }

    /// Convert string to RiskLevel.
    fn string_to_risk_level(s: &str) -> RiskLevel {
        match s.to_lowercase().as_str() {
            "considerable" => RiskLevel::Considerable,
            _ => RiskLevel::Low,
        }
    }

    fn row_to_assessment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Assessment> {
        let patient_id: String = row.get(0)?;
        let risk_level_str: String = row.get(1)?;
        let percentage: i64 = row.get(2)?;
        let summary: String = row.get(3)?;
        let recommendations_json: String = row.get(4)?;
        let physician: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        // Degrade gracefully on a corrupted column instead of failing the
        // whole history load.
        let recommendations: Vec<String> =
            serde_json::from_str(&recommendations_json).unwrap_or_default();
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now());

        Ok(Assessment {
            patient_id: Some(patient_id),
            risk_level: Self::string_to_risk_level(&risk_level_str),
            percentage: percentage.max(0) as u32,
            summary,
            recommendations,
            physician,
            created_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "patient_id, risk_level, percentage, summary, recommendations, physician, created_at";

impl HistoryStore for SqliteHistory {
    type Error = StorageError;

    fn append(&self, assessment: &Assessment) -> Result<String, Self::Error> {
        let recommendations = serde_json::to_string(&assessment.recommendations)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let mut conn = self.conn.lock().expect("Lock failed");
        let tx = conn.transaction()?;

        tx.execute(
            r"
            INSERT INTO assessments (
                risk_level, percentage, summary, recommendations, physician, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                Self::risk_level_to_string(assessment.risk_level),
                i64::from(assessment.percentage),
                assessment.summary,
                recommendations,
                assessment.physician,
                assessment.created_at.to_rfc3339(),
            ],
        )?;

        let seq = tx.last_insert_rowid();
        let patient_id = format!("P{seq:04}");
        tx.execute(
            "UPDATE assessments SET patient_id = ?1 WHERE seq = ?2",
            params![patient_id, seq],
        )?;

        // Evict past the cap, oldest first.
        tx.execute(
            r"
            DELETE FROM assessments WHERE seq NOT IN (
                SELECT seq FROM assessments ORDER BY seq DESC LIMIT ?1
            )
            ",
            params![self.cap as i64],
        )?;

        tx.commit()?;

        tracing::debug!("Saved assessment {} to history", patient_id);
        Ok(patient_id)
    }

    fn recent(&self, limit: usize) -> Result<Vec<Assessment>, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");

        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM assessments ORDER BY seq DESC LIMIT ?1"
        ))?;

        let assessments = stmt
            .query_map(params![limit as i64], Self::row_to_assessment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assessments)
    }

    fn paginated(&self, offset: usize, limit: usize) -> Result<HistoryPage, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");

        let total_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM assessments", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM assessments ORDER BY seq DESC LIMIT ?1 OFFSET ?2"
        ))?;

        let assessments = stmt
            .query_map(params![limit as i64, offset as i64], Self::row_to_assessment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HistoryPage::new(
            assessments,
            total_count as usize,
            offset,
            limit,
        ))
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");

        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM assessments", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    fn delete(&self, patient_id: &str) -> Result<(), Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");
        conn.execute(
            "DELETE FROM assessments WHERE patient_id = ?1",
            params![patient_id],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");
        conn.execute("DELETE FROM assessments", [])?;
        tracing::warn!("Cleared evaluation history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RiskLevel, RiskReport};

    fn sample_assessment(percentage: u32) -> Assessment {
        let level = if percentage >= 40 {
            RiskLevel::Considerable
        } else {
            RiskLevel::Low
        };
        let report = RiskReport {
            points: 0,
            factors: vec![],
            percentage,
            risk_level: level,
        };
        Assessment::from_report(&report, "Age: 72 years, Gender: Female".to_string(), None)
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let storage = SqliteHistory::in_memory().expect("Should create db");

        let id1 = storage.append(&sample_assessment(22)).expect("Should save");
        let id2 = storage.append(&sample_assessment(41)).expect("Should save");

        assert_eq!(id1, "P0001");
        assert_eq!(id2, "P0002");
    }

    #[test]
    fn test_recent_is_most_recent_first() {
        let storage = SqliteHistory::in_memory().expect("Should create db");
        for pct in [10, 20, 30] {
            storage.append(&sample_assessment(pct)).expect("Should save");
        }

        let recent = storage.recent(10).expect("Should load");
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].percentage, 30);
        assert_eq!(recent[2].percentage, 10);
    }

    #[test]
    fn test_cap_evicts_oldest_without_reusing_ids() {
        let storage = SqliteHistory::in_memory_with_cap(3).expect("Should create db");

        for pct in 0..5 {
            storage.append(&sample_assessment(pct)).expect("Should save");
        }

        assert_eq!(storage.count().expect("Should count"), 3);

        let recent = storage.recent(10).expect("Should load");
        let ids: Vec<_> = recent
            .iter()
            .filter_map(|a| a.patient_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["P0005", "P0004", "P0003"]);
    }

    #[test]
    fn test_round_trip_preserves_record() {
        let storage = SqliteHistory::in_memory().expect("Should create db");

        let mut assessment = sample_assessment(41);
        assessment.physician = Some("Dr. House".to_string());
        let id = storage.append(&assessment).expect("Should save");

        let loaded = storage.recent(1).expect("Should load");
        assert_eq!(loaded[0].patient_id.as_deref(), Some(id.as_str()));
        assert_eq!(loaded[0].risk_level, RiskLevel::Considerable);
        assert_eq!(loaded[0].percentage, 41);
        assert_eq!(loaded[0].summary, "Age: 72 years, Gender: Female");
        assert_eq!(loaded[0].recommendations.len(), 4);
        assert_eq!(loaded[0].physician.as_deref(), Some("Dr. House"));
    }

    #[test]
    fn test_paginated() {
        let storage = SqliteHistory::in_memory().expect("Should create db");
        for pct in 0..5 {
            storage.append(&sample_assessment(pct)).expect("Should save");
        }

        let page = storage.paginated(0, 2).expect("Should load");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 5);
        assert!(page.has_more);
        assert_eq!(page.next_offset(), Some(2));

        let last = storage.paginated(4, 2).expect("Should load");
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);
        assert_eq!(last.prev_offset(), Some(2));
    }

    #[test]
    fn test_delete_and_clear() {
        let storage = SqliteHistory::in_memory().expect("Should create db");
        let id = storage.append(&sample_assessment(22)).expect("Should save");
        storage.append(&sample_assessment(41)).expect("Should save");

        storage.delete(&id).expect("Should delete");
        assert_eq!(storage.count().expect("Should count"), 1);

        storage.clear().expect("Should clear");
        assert_eq!(storage.count().expect("Should count"), 0);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("Should create tempdir");
        let path = dir.path().join("history.db");

        {
            let storage = SqliteHistory::new(&path).expect("Should create db");
            storage.append(&sample_assessment(22)).expect("Should save");
        }

        let storage = SqliteHistory::new(&path).expect("Should reopen db");
        assert_eq!(storage.count().expect("Should count"), 1);
        // The ID sequence continues where it left off.
        let id = storage.append(&sample_assessment(30)).expect("Should save");
        assert_eq!(id, "P0002");
    }
}
