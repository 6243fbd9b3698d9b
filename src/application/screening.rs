//! Screening service: Orchestrates one questionnaire evaluation.
//!
//! This service coordinates:
//! - Required-field validation
//! - Scoring and classification
//! - History persistence (which assigns the patient ID)

use std::sync::Arc;

use crate::domain::{Assessment, FormData, PatientIntake, RiskReport, RiskScorer};
use crate::ports::{HistoryPage, HistoryStore};
use crate::ScreenError;

/// Everything produced by one submission.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    /// Parsed intake (for display back to the operator)
    pub intake: PatientIntake,
    /// Scoring result with the full factor list
    pub report: RiskReport,
    /// The record as stored in history, patient ID assigned
    pub record: Assessment,
}

/// Service for running questionnaire evaluations.
pub struct ScreeningService<S>
where
    S: HistoryStore,
{
    scorer: RiskScorer,
    history: Arc<S>,
}

impl<S> ScreeningService<S>
where
    S: HistoryStore,
    S::Error: Into<crate::adapters::StorageError>,
{
    /// Create a new screening service.
    pub fn new(scorer: RiskScorer, history: Arc<S>) -> Self {
        Self { scorer, history }
    }

    /// Evaluate a form submission.
    ///
    /// Performs the full pipeline:
    /// 1. Validate required fields (aggregated error naming all of them)
    /// 2. Parse into a typed intake with per-field defaults
    /// 3. Score and classify
    /// 4. Append to history, assigning the sequential patient ID
    ///
    /// No partial scoring happens on invalid input.
    ///
    /// # Errors
    /// Returns [`ScreenError::Intake`] on missing required fields, or
    /// [`ScreenError::Storage`] if the record cannot be persisted.
    pub fn assess(&self, form: &FormData) -> Result<ScreeningOutcome, ScreenError> {
        let intake = PatientIntake::from_form(form)?;
        let report = self.scorer.evaluate(&intake);

        let mut record =
            Assessment::from_report(&report, intake.summary(), intake.physician.clone());
        let patient_id = self
            .history
            .append(&record)
            .map_err(|e| ScreenError::Storage(e.into()))?;
        record.patient_id = Some(patient_id);

        tracing::info!(
            "Evaluation complete: points={}, percentage={}%, risk={}",
            report.points,
            report.percentage,
            report.risk_level
        );

        Ok(ScreeningOutcome {
            intake,
            report,
            record,
        })
    }

    /// Get recent assessments from history.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn recent_assessments(&self, limit: usize) -> Result<Vec<Assessment>, ScreenError> {
        self.history
            .recent(limit)
            .map_err(|e| ScreenError::Storage(e.into()))
    }

    /// Get a page of the history.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn history_page(&self, offset: usize, limit: usize) -> Result<HistoryPage, ScreenError> {
        self.history
            .paginated(offset, limit)
            .map_err(|e| ScreenError::Storage(e.into()))
    }

    /// Get total assessment count.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn assessment_count(&self) -> Result<usize, ScreenError> {
        self.history
            .count()
            .map_err(|e| ScreenError::Storage(e.into()))
    }

    /// Clear the evaluation history.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn clear_history(&self) -> Result<(), ScreenError> {
        self.history
            .clear()
            .map_err(|e| ScreenError::Storage(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::SqliteHistory;
    use crate::domain::{field, RiskLevel};

    fn create_test_service() -> ScreeningService<SqliteHistory> {
        let history = Arc::new(SqliteHistory::in_memory().expect("Should create db"));
        ScreeningService::new(RiskScorer::default(), history)
    }

    fn considerable_risk_form() -> FormData {
        let mut form = FormData::new();
        // Age and BMI stay below their rule thresholds; the eleven points
        // come from smoking, family history, hypertension, MMSE 18, ADL 5,
        // functional assessment 5 and memory complaints.
        form.insert(field::AGE.into(), "65".into());
        form.insert(field::GENDER.into(), "0".into());
        form.insert(field::ETHNICITY.into(), "White".into());
        form.insert(field::EDUCATION_LEVEL.into(), "Primary".into());
        form.insert(field::HEIGHT.into(), "1.80".into());
        form.insert(field::WEIGHT.into(), "75".into());
        form.insert(field::MMSE.into(), "18".into());
        form.insert(field::ADL.into(), "5".into());
        form.insert(field::FUNCTIONAL_ASSESSMENT.into(), "5".into());
        form.insert(field::MEMORY_COMPLAINTS.into(), "1".into());
        form.insert(field::FAMILY_HISTORY.into(), "1".into());
        form.insert(field::SMOKING.into(), "1".into());
        form.insert(field::HYPERTENSION.into(), "1".into());
        form.insert(field::DOCTOR_IN_CHARGE.into(), "Dr. Grey".into());
        form
    }

    #[test]
    fn test_assess_persists_and_assigns_id() {
        let service = create_test_service();

        let outcome = service
            .assess(&considerable_risk_form())
            .expect("Should assess");

        assert_eq!(outcome.record.patient_id.as_deref(), Some("P0001"));
        assert_eq!(outcome.report.risk_level, RiskLevel::Considerable);
        assert_eq!(outcome.record.physician.as_deref(), Some("Dr. Grey"));
        assert_eq!(service.assessment_count().expect("Should count"), 1);

        // IDs keep counting on the next submission.
        let second = service
            .assess(&considerable_risk_form())
            .expect("Should assess");
        assert_eq!(second.record.patient_id.as_deref(), Some("P0002"));
    }

    #[test]
    fn test_missing_fields_block_scoring() {
        let service = create_test_service();
        let mut form = considerable_risk_form();
        form.remove(field::AGE);
        form.remove(field::WEIGHT);

        let err = service.assess(&form).expect_err("Should reject");
        let message = err.to_string();
        assert!(message.contains("Age"));
        assert!(message.contains("Weight"));

        // Nothing was persisted.
        assert_eq!(service.assessment_count().expect("Should count"), 0);
    }

    #[test]
    fn test_recent_reflects_submissions() {
        let service = create_test_service();
        service
            .assess(&considerable_risk_form())
            .expect("Should assess");

        let recent = service.recent_assessments(10).expect("Should load");
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].risk_level, RiskLevel::Considerable);
        assert_eq!(recent[0].percentage, 41);
    }

    #[test]
    fn test_clear_history() {
        let service = create_test_service();
        service
            .assess(&considerable_risk_form())
            .expect("Should assess");
        service.clear_history().expect("Should clear");
        assert_eq!(service.assessment_count().expect("Should count"), 0);
    }
}
