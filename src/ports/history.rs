//! History port: Trait for persisting past evaluations.
//!
//! This trait abstracts the storage backend (SQLite) from the application
//! logic. The store owns the history cap and the patient ID sequence.

use crate::domain::Assessment;

/// A page of history records with pagination metadata.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    /// Records in this page, most-recent first
    pub items: Vec<Assessment>,
    /// Total count of stored records (for UI pagination)
    pub total_count: usize,
    /// Current page offset
    pub offset: usize,
    /// Page size limit
    pub limit: usize,
    /// Whether there are more pages
    pub has_more: bool,
}

impl HistoryPage {
    /// Create a new history page.
    #[must_use]
    pub fn new(items: Vec<Assessment>, total_count: usize, offset: usize, limit: usize) -> Self {
        let has_more = offset + items.len() < total_count;
        Self {
            items,
            total_count,
            offset,
            limit,
            has_more,
        }
    }

    /// Get the next page offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        if self.has_more {
            Some(self.offset + self.limit)
        } else {
            None
        }
    }

    /// Get the previous page offset.
    #[must_use]
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset > 0 {
            Some(self.offset.saturating_sub(self.limit))
        } else {
            None
        }
    }
}

/// Trait for the local evaluation history.
///
/// All data is stored locally and never transmitted.
pub trait HistoryStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append an assessment, assigning and returning its patient ID.
    ///
    /// The store evicts the oldest records past its cap. IDs come from a
    /// monotonic sequence, so they stay unique across evictions.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn append(&self, assessment: &Assessment) -> Result<String, Self::Error>;

    /// Load recent assessments (up to `limit`), most-recent first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn recent(&self, limit: usize) -> Result<Vec<Assessment>, Self::Error>;

    /// Load assessments with pagination.
    ///
    /// # Arguments
    /// * `offset` - Starting position (0-indexed)
    /// * `limit` - Maximum number of items to return
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn paginated(&self, offset: usize, limit: usize) -> Result<HistoryPage, Self::Error>;

    /// Get the total count of stored assessments.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count(&self) -> Result<usize, Self::Error>;

    /// Delete an assessment by patient ID.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn delete(&self, patient_id: &str) -> Result<(), Self::Error>;

    /// Clear the whole history.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear(&self) -> Result<(), Self::Error>;
}
