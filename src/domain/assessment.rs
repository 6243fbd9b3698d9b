//! Assessment result types.
//!
//! Represents the output of the risk questionnaire: the binary
//! classification, the canned recommendations, and the history record
//! persisted after each evaluation.

use serde::{Deserialize, Serialize};

/// Binary risk classification against the fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Below the threshold
    Low,
    /// At or above the threshold
    Considerable,
}

/// Clinical recommendations shown on a considerable-risk result.
pub const CONSIDERABLE_RISK_RECOMMENDATIONS: [&str; 4] = [
    "Consult a neurologist for a detailed evaluation",
    "Undergo specific neuropsychological testing",
    "Maintain regular physical activity",
    "Stimulate cognitive activities (reading, games, learning)",
];

/// Lifestyle recommendations shown on a low-risk result.
pub const LOW_RISK_RECOMMENDATIONS: [&str; 4] = [
    "Keep up healthy habits",
    "Maintain regular physical activity",
    "Sleep well (7-9 hours per night)",
    "Eat a balanced diet",
];

impl RiskLevel {
    /// Full classification headline as shown to the user.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Low => "Predisposition to Alzheimer's: No - Low Risk",
            Self::Considerable => "Predisposition to Alzheimer's: Yes - Considerable Risk",
        }
    }

    /// The fixed recommendation list for this classification.
    #[must_use]
    pub fn recommendations(&self) -> &'static [&'static str; 4] {
        match self {
            Self::Low => &LOW_RISK_RECOMMENDATIONS,
            Self::Considerable => &CONSIDERABLE_RISK_RECOMMENDATIONS,
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),          // Emerald (#10B981)
            Self::Considerable => (244, 63, 94),  // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Considerable => write!(f, "CONSIDERABLE"),
        }
    }
}

/// Result of a scoring run (before persistence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Total weighted points
    pub points: u32,
    /// Triggered risk factors in category evaluation order; never truncated
    pub factors: Vec<String>,
    /// round(points / max * 100), always in [0, 100]
    pub percentage: u32,
    /// Classification against the threshold
    pub risk_level: RiskLevel,
}

impl RiskReport {
    /// The fixed recommendation list selected by the classification.
    #[must_use]
    pub fn recommendations(&self) -> &'static [&'static str; 4] {
        self.risk_level.recommendations()
    }
}

/// Persisted history record for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Sequential patient ID ("P" + zero-padded), assigned when the record
    /// is appended to history
    pub patient_id: Option<String>,

    /// Risk classification
    pub risk_level: RiskLevel,

    /// Risk percentage at evaluation time
    pub percentage: u32,

    /// Truncated intake summary (first five notable entries)
    pub summary: String,

    /// Recommendations shown with the result
    pub recommendations: Vec<String>,

    /// Physician in charge, if informed
    pub physician: Option<String>,

    /// Timestamp of the evaluation
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Build the history record for a report.
    #[must_use]
    pub fn from_report(report: &RiskReport, summary: String, physician: Option<String>) -> Self {
        Self {
            patient_id: None,
            risk_level: report.risk_level,
            percentage: report.percentage,
            summary,
            recommendations: report
                .recommendations()
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
            physician,
            created_at: chrono::Utc::now(),
        }
    }

    /// Physician name for display ("Not informed" when absent).
    #[must_use]
    pub fn physician_label(&self) -> &str {
        self.physician.as_deref().unwrap_or("Not informed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendations_per_level() {
        assert_eq!(
            RiskLevel::Considerable.recommendations()[0],
            "Consult a neurologist for a detailed evaluation"
        );
        assert_eq!(RiskLevel::Low.recommendations()[0], "Keep up healthy habits");
    }

    #[test]
    fn test_headline_text() {
        assert!(RiskLevel::Considerable.headline().contains("Considerable Risk"));
        assert!(RiskLevel::Low.headline().contains("Low Risk"));
    }

    #[test]
    fn test_assessment_from_report() {
        let report = RiskReport {
            points: 11,
            factors: vec!["Smoking".to_string()],
            percentage: 41,
            risk_level: RiskLevel::Considerable,
        };
        let assessment = Assessment::from_report(&report, "Age: 72 years".to_string(), None);

        assert!(assessment.patient_id.is_none());
        assert_eq!(assessment.percentage, 41);
        assert_eq!(assessment.recommendations.len(), 4);
        assert_eq!(assessment.physician_label(), "Not informed");
    }
}
