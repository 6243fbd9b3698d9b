//! Heuristic risk scorer.
//!
//! A deterministic weighted sum over the questionnaire's health indicators:
//! seven category rule groups evaluated in fixed order, each triggered rule
//! adding its weight and a human-readable factor description. The total is
//! normalized against the maximum attainable score and classified against a
//! fixed percentage threshold. Pure computation with no side effects or
//! error paths; absent data never triggers a rule.

use serde::{Deserialize, Serialize};

use super::assessment::{RiskLevel, RiskReport};
use super::patient::{fmt_scale, PatientIntake};

/// Immutable scoring parameters.
///
/// Passed into [`RiskScorer`] explicitly so tests can vary weights and
/// thresholds without global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of every demographic, lifestyle, condition, exam and symptom rule
    pub base_weight: u32,
    /// Weight of the MMSE rule
    pub cognitive_weight: u32,
    /// Weight of the ADL and functional assessment rules
    pub functional_weight: u32,
    /// Sum of all weights when every rule triggers
    pub max_score: u32,
    /// Percentage at or above which the result is considerable risk
    pub risk_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_weight: 1,
            cognitive_weight: 3,
            functional_weight: 2,
            max_score: 27,
            risk_threshold: 40,
        }
    }
}

/// Running score state: total points plus triggered factor descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub points: u32,
    pub factors: Vec<String>,
}

impl ScoreBreakdown {
    fn hit(&mut self, weight: u32, factor: String) {
        self.points += weight;
        self.factors.push(factor);
    }
}

/// The questionnaire scorer.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    /// Create a scorer with explicit parameters.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// The scoring parameters in effect.
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score, normalize and classify an intake record.
    #[must_use]
    pub fn evaluate(&self, intake: &PatientIntake) -> RiskReport {
        let breakdown = self.score(intake);
        let percentage = self.percentage(breakdown.points);

        RiskReport {
            points: breakdown.points,
            factors: breakdown.factors,
            percentage,
            risk_level: self.classify(percentage),
        }
    }

    /// Evaluate all category rules in fixed order.
    ///
    /// Order only affects the factor list, never the total.
    #[must_use]
    pub fn score(&self, intake: &PatientIntake) -> ScoreBreakdown {
        let mut out = ScoreBreakdown::default();

        self.score_demographics(intake, &mut out);
        self.score_anthropometry(intake, &mut out);
        self.score_lifestyle(intake, &mut out);
        self.score_medical_conditions(intake, &mut out);
        self.score_exams(intake, &mut out);
        self.score_cognition(intake, &mut out);
        self.score_symptoms(intake, &mut out);

        out
    }

    /// Normalize points to a rounded percentage of the maximum score.
    #[must_use]
    pub fn percentage(&self, points: u32) -> u32 {
        (f64::from(points) / f64::from(self.config.max_score) * 100.0).round() as u32
    }

    /// Step function of percentage against the threshold (inclusive on the
    /// high side).
    #[must_use]
    pub fn classify(&self, percentage: u32) -> RiskLevel {
        if percentage >= self.config.risk_threshold {
            RiskLevel::Considerable
        } else {
            RiskLevel::Low
        }
    }

    fn score_demographics(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        if intake.age >= 70 {
            out.hit(
                self.config.base_weight,
                format!("Advanced age: {} years", intake.age),
            );
        }
    }

    fn score_anthropometry(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        if let Some(bmi) = intake.bmi {
            if !(18.5..=30.0).contains(&bmi) {
                out.hit(
                    self.config.base_weight,
                    format!("BMI outside healthy range: {bmi:.1}"),
                );
            }
        }
    }

    fn score_lifestyle(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        if intake.smoking == Some(true) {
            out.hit(self.config.base_weight, "Smoking".to_string());
        }
        if intake.family_history == Some(true) {
            out.hit(
                self.config.base_weight,
                "Family history of Alzheimer's disease".to_string(),
            );
        }
        if matches!(intake.physical_activity, Some(hours) if hours < 2.0) {
            out.hit(
                self.config.base_weight,
                "Insufficient physical activity".to_string(),
            );
        }
        if matches!(intake.sleep_quality, Some(quality) if quality < 6.0) {
            out.hit(self.config.base_weight, "Poor sleep quality".to_string());
        }
    }

    fn score_medical_conditions(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        let conditions = [
            (intake.cardiovascular_disease, "Cardiovascular disease"),
            (intake.diabetes, "Diabetes"),
            (intake.depression, "Depression"),
            (intake.head_injury, "Head injury"),
            (intake.hypertension, "Hypertension"),
        ];

        for (flag, label) in conditions {
            if flag == Some(true) {
                out.hit(self.config.base_weight, label.to_string());
            }
        }
    }

    fn score_exams(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        let systolic_high = matches!(intake.systolic_bp, Some(bp) if bp > 140.0);
        let diastolic_high = matches!(intake.diastolic_bp, Some(bp) if bp > 90.0);
        if systolic_high || diastolic_high {
            out.hit(
                self.config.base_weight,
                "Elevated blood pressure".to_string(),
            );
        }

        if matches!(intake.cholesterol_total, Some(total) if total > 240.0) {
            out.hit(
                self.config.base_weight,
                "Elevated total cholesterol".to_string(),
            );
        }
    }

    fn score_cognition(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        if let Some(mmse) = intake.mmse {
            if mmse < 24.0 {
                out.hit(
                    self.config.cognitive_weight,
                    format!("Low MMSE score: {}/30", fmt_scale(mmse)),
                );
            }
        }

        if let Some(adl) = intake.adl {
            if adl < 8.0 {
                out.hit(
                    self.config.functional_weight,
                    format!("Low ADL score: {}/10", fmt_scale(adl)),
                );
            }
        }

        if let Some(func) = intake.functional_assessment {
            if func < 7.0 {
                out.hit(
                    self.config.functional_weight,
                    format!("Low functional assessment: {}/10", fmt_scale(func)),
                );
            }
        }
    }

    fn score_symptoms(&self, intake: &PatientIntake, out: &mut ScoreBreakdown) {
        let symptoms = [
            (intake.memory_complaints, "Memory complaints"),
            (intake.behavioral_problems, "Behavioral problems"),
            (intake.confusion, "Mental confusion"),
            (intake.disorientation, "Disorientation"),
            (intake.personality_changes, "Personality changes"),
            (
                intake.difficulty_completing_tasks,
                "Difficulty completing tasks",
            ),
            (intake.forgetfulness, "Forgetfulness"),
        ];

        for (flag, label) in symptoms {
            if flag == Some(true) {
                out.hit(self.config.base_weight, label.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RiskScorer {
        RiskScorer::default()
    }

    /// An intake triggering every one of the 27 weighted rules.
    fn worst_case_intake() -> PatientIntake {
        PatientIntake {
            age: 75,
            bmi: Some(32.0),
            smoking: Some(true),
            family_history: Some(true),
            physical_activity: Some(1.0),
            sleep_quality: Some(5.0),
            cardiovascular_disease: Some(true),
            diabetes: Some(true),
            depression: Some(true),
            head_injury: Some(true),
            hypertension: Some(true),
            systolic_bp: Some(150.0),
            diastolic_bp: Some(95.0),
            cholesterol_total: Some(250.0),
            mmse: Some(20.0),
            adl: Some(5.0),
            functional_assessment: Some(5.0),
            memory_complaints: Some(true),
            behavioral_problems: Some(true),
            confusion: Some(true),
            disorientation: Some(true),
            personality_changes: Some(true),
            difficulty_completing_tasks: Some(true),
            forgetfulness: Some(true),
            ..PatientIntake::default()
        }
    }

    #[test]
    fn test_empty_intake_scores_zero() {
        let report = scorer().evaluate(&PatientIntake::default());
        assert_eq!(report.points, 0);
        assert_eq!(report.percentage, 0);
        assert_eq!(report.risk_level, RiskLevel::Low);
        assert!(report.factors.is_empty());
    }

    #[test]
    fn test_every_rule_triggered_scores_max() {
        let report = scorer().evaluate(&worst_case_intake());
        assert_eq!(report.points, 27);
        assert_eq!(report.percentage, 100);
        assert_eq!(report.risk_level, RiskLevel::Considerable);
        assert_eq!(report.factors.len(), 23); // conditions/symptoms listed per flag
    }

    #[test]
    fn test_classification_boundary_inclusive() {
        let s = scorer();
        assert_eq!(s.classify(39), RiskLevel::Low);
        assert_eq!(s.classify(40), RiskLevel::Considerable);
    }

    #[test]
    fn test_spec_example_moderate_profile_stays_low() {
        // age=72, BMI=32, smoking, MMSE=20, all else absent
        let intake = PatientIntake {
            age: 72,
            bmi: Some(32.0),
            smoking: Some(true),
            mmse: Some(20.0),
            ..PatientIntake::default()
        };

        let report = scorer().evaluate(&intake);
        assert_eq!(report.points, 6);
        assert_eq!(report.percentage, 22);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_spec_example_crosses_threshold() {
        let mut intake = PatientIntake {
            mmse: Some(18.0),
            adl: Some(5.0),
            functional_assessment: Some(5.0),
            memory_complaints: Some(true),
            ..PatientIntake::default()
        };

        let report = scorer().evaluate(&intake);
        assert_eq!(report.points, 8);
        assert_eq!(report.percentage, 30);
        assert_eq!(report.risk_level, RiskLevel::Low);

        intake.family_history = Some(true);
        intake.smoking = Some(true);
        intake.hypertension = Some(true);

        let report = scorer().evaluate(&intake);
        assert_eq!(report.points, 11);
        assert_eq!(report.percentage, 41);
        assert_eq!(report.risk_level, RiskLevel::Considerable);
    }

    #[test]
    fn test_absent_fields_never_trigger() {
        let intake = PatientIntake {
            age: 45,
            mmse: None,
            sleep_quality: None,
            physical_activity: None,
            systolic_bp: None,
            ..PatientIntake::default()
        };

        let report = scorer().evaluate(&intake);
        assert_eq!(report.points, 0);
    }

    #[test]
    fn test_explicit_false_flags_do_not_trigger() {
        let intake = PatientIntake {
            smoking: Some(false),
            diabetes: Some(false),
            forgetfulness: Some(false),
            ..PatientIntake::default()
        };
        assert_eq!(scorer().score(&intake).points, 0);
    }

    #[test]
    fn test_percentage_monotonic_in_triggered_rules() {
        let s = scorer();
        let mut intake = PatientIntake::default();
        let mut last = s.evaluate(&intake).percentage;

        let steps: Vec<Box<dyn Fn(&mut PatientIntake)>> = vec![
            Box::new(|i| i.age = 80),
            Box::new(|i| i.bmi = Some(17.0)),
            Box::new(|i| i.smoking = Some(true)),
            Box::new(|i| i.mmse = Some(10.0)),
            Box::new(|i| i.adl = Some(2.0)),
            Box::new(|i| i.functional_assessment = Some(1.0)),
            Box::new(|i| i.hypertension = Some(true)),
            Box::new(|i| i.memory_complaints = Some(true)),
        ];

        for step in steps {
            step(&mut intake);
            let pct = s.evaluate(&intake).percentage;
            assert!(pct >= last, "percentage dropped from {last} to {pct}");
            last = pct;
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let intake = worst_case_intake();
        let s = scorer();
        assert_eq!(s.evaluate(&intake), s.evaluate(&intake));
    }

    #[test]
    fn test_bmi_edges() {
        let s = scorer();
        for (bmi, expect_points) in [(18.5, 0), (30.0, 0), (18.4, 1), (30.1, 1)] {
            let intake = PatientIntake {
                bmi: Some(bmi),
                ..PatientIntake::default()
            };
            assert_eq!(s.score(&intake).points, expect_points, "bmi={bmi}");
        }
    }

    #[test]
    fn test_blood_pressure_either_bound_counts_once() {
        let s = scorer();

        let both = PatientIntake {
            systolic_bp: Some(150.0),
            diastolic_bp: Some(95.0),
            ..PatientIntake::default()
        };
        assert_eq!(s.score(&both).points, 1);

        let diastolic_only = PatientIntake {
            systolic_bp: Some(120.0),
            diastolic_bp: Some(95.0),
            ..PatientIntake::default()
        };
        assert_eq!(s.score(&diastolic_only).points, 1);

        // Boundary values are not elevated (strict comparison)
        let at_limits = PatientIntake {
            systolic_bp: Some(140.0),
            diastolic_bp: Some(90.0),
            ..PatientIntake::default()
        };
        assert_eq!(s.score(&at_limits).points, 0);
    }

    #[test]
    fn test_factor_order_follows_category_order() {
        let report = scorer().evaluate(&worst_case_intake());
        assert!(report.factors[0].starts_with("Advanced age"));
        assert!(report.factors[1].starts_with("BMI outside healthy range"));
        assert_eq!(report.factors.last().map(String::as_str), Some("Forgetfulness"));
    }

    #[test]
    fn test_custom_config_threshold() {
        let config = ScoringConfig {
            risk_threshold: 20,
            ..ScoringConfig::default()
        };
        let s = RiskScorer::new(config);

        let intake = PatientIntake {
            age: 72,
            bmi: Some(32.0),
            smoking: Some(true),
            mmse: Some(20.0),
            ..PatientIntake::default()
        };

        // 22% is low risk under the default threshold, considerable here.
        assert_eq!(s.evaluate(&intake).risk_level, RiskLevel::Considerable);
    }
}
