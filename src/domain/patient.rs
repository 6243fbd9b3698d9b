//! Patient intake types for the Alzheimer's risk questionnaire.
//!
//! The questionnaire arrives as a flat string-keyed form; it is parsed once
//! into a strongly typed [`PatientIntake`] with explicit per-field defaulting.
//! Absent or unparsable optional values become `None` and never contribute to
//! the risk score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw form submission: field name to string-encoded value.
///
/// Booleans are encoded "0"/"1"; numbers are decimal strings.
pub type FormData = BTreeMap<String, String>;

/// Form field names as collected from the questionnaire.
pub mod field {
    pub const AGE: &str = "Age";
    pub const GENDER: &str = "Gender";
    pub const ETHNICITY: &str = "Ethnicity";
    pub const EDUCATION_LEVEL: &str = "EducationLevel";
    pub const HEIGHT: &str = "Height";
    pub const WEIGHT: &str = "Weight";
    pub const BMI: &str = "BMI";
    pub const SMOKING: &str = "Smoking";
    pub const ALCOHOL_CONSUMPTION: &str = "AlcoholConsumption";
    pub const PHYSICAL_ACTIVITY: &str = "PhysicalActivity";
    pub const DIET_QUALITY: &str = "DietQuality";
    pub const SLEEP_QUALITY: &str = "SleepQuality";
    pub const FAMILY_HISTORY: &str = "FamilyHistoryAlzheimers";
    pub const CARDIOVASCULAR_DISEASE: &str = "CardiovascularDisease";
    pub const DIABETES: &str = "Diabetes";
    pub const DEPRESSION: &str = "Depression";
    pub const HEAD_INJURY: &str = "HeadInjury";
    pub const HYPERTENSION: &str = "Hypertension";
    pub const SYSTOLIC_BP: &str = "SystolicBP";
    pub const DIASTOLIC_BP: &str = "DiastolicBP";
    pub const CHOLESTEROL_TOTAL: &str = "CholesterolTotal";
    pub const CHOLESTEROL_LDL: &str = "CholesterolLDL";
    pub const CHOLESTEROL_HDL: &str = "CholesterolHDL";
    pub const CHOLESTEROL_TRIGLYCERIDES: &str = "CholesterolTriglycerides";
    pub const MMSE: &str = "MMSE";
    pub const FUNCTIONAL_ASSESSMENT: &str = "FunctionalAssessment";
    pub const MEMORY_COMPLAINTS: &str = "MemoryComplaints";
    pub const BEHAVIORAL_PROBLEMS: &str = "BehavioralProblems";
    pub const ADL: &str = "ADL";
    pub const CONFUSION: &str = "Confusion";
    pub const DISORIENTATION: &str = "Disorientation";
    pub const PERSONALITY_CHANGES: &str = "PersonalityChanges";
    pub const DIFFICULTY_COMPLETING_TASKS: &str = "DifficultyCompletingTasks";
    pub const FORGETFULNESS: &str = "Forgetfulness";
    pub const DOCTOR_IN_CHARGE: &str = "DoctorInCharge";
}

/// Fields that must be present (non-empty) before scoring runs.
pub const REQUIRED_FIELDS: [&str; 6] = [
    field::AGE,
    field::GENDER,
    field::ETHNICITY,
    field::EDUCATION_LEVEL,
    field::HEIGHT,
    field::WEIGHT,
];

/// Error type for intake validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    /// One aggregated message naming every missing required field.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// Patient gender as encoded on the form (0 = male, 1 = female).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0" => Some(Self::Male),
            "1" => Some(Self::Female),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed questionnaire record.
///
/// Required demographics are parsed leniently (a garbled age becomes 0, which
/// triggers no rule); everything optional is `None` when absent or unparsable.
/// Alcohol, diet quality and the LDL/HDL/triglyceride panels are collected for
/// the record but carry no scoring rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientIntake {
    pub age: u32,
    pub gender: Option<Gender>,
    pub ethnicity: String,
    pub education_level: String,
    /// Height in meters
    pub height_m: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Body Mass Index; supplied on the form, or derived from height/weight
    pub bmi: Option<f64>,
    pub smoking: Option<bool>,
    /// Units per week
    pub alcohol_consumption: Option<f64>,
    /// Hours per week
    pub physical_activity: Option<f64>,
    /// Scale 0-10
    pub diet_quality: Option<f64>,
    /// Scale 0-10
    pub sleep_quality: Option<f64>,
    pub family_history: Option<bool>,
    pub cardiovascular_disease: Option<bool>,
    pub diabetes: Option<bool>,
    pub depression: Option<bool>,
    pub head_injury: Option<bool>,
    pub hypertension: Option<bool>,
    /// mmHg
    pub systolic_bp: Option<f64>,
    /// mmHg
    pub diastolic_bp: Option<f64>,
    /// mg/dL
    pub cholesterol_total: Option<f64>,
    pub cholesterol_ldl: Option<f64>,
    pub cholesterol_hdl: Option<f64>,
    pub cholesterol_triglycerides: Option<f64>,
    /// Mini-Mental State Examination, 0-30 (lower = worse)
    pub mmse: Option<f64>,
    /// Scale 0-10 (lower = worse)
    pub functional_assessment: Option<f64>,
    pub memory_complaints: Option<bool>,
    pub behavioral_problems: Option<bool>,
    /// Activities of Daily Living, 0-10 (lower = worse)
    pub adl: Option<f64>,
    pub confusion: Option<bool>,
    pub disorientation: Option<bool>,
    pub personality_changes: Option<bool>,
    pub difficulty_completing_tasks: Option<bool>,
    pub forgetfulness: Option<bool>,
    pub physician: Option<String>,
}

fn opt_text(form: &FormData, key: &str) -> Option<String> {
    form.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn opt_f64(form: &FormData, key: &str) -> Option<f64> {
    form.get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn opt_flag(form: &FormData, key: &str) -> Option<bool> {
    match form.get(key).map(|v| v.trim()) {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}

impl PatientIntake {
    /// Validate and parse a raw form submission.
    ///
    /// Presence of [`REQUIRED_FIELDS`] is checked first; all missing names are
    /// reported in a single [`IntakeError::MissingFields`]. Optional fields
    /// parse leniently: malformed input is treated as absent, never rejected.
    ///
    /// # Errors
    /// Returns [`IntakeError::MissingFields`] if any required field is empty.
    pub fn from_form(form: &FormData) -> Result<Self, IntakeError> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| opt_text(form, name).is_none())
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IntakeError::MissingFields(missing));
        }

        let height_m = opt_f64(form, field::HEIGHT).filter(|h| *h > 0.0);
        let weight_kg = opt_f64(form, field::WEIGHT).filter(|w| *w > 0.0);

        // BMI is taken as supplied; derived from height/weight only when the
        // form left it blank.
        let bmi = opt_f64(form, field::BMI)
            .or_else(|| match (height_m, weight_kg) {
                (Some(h), Some(w)) => Some(w / (h * h)),
                _ => None,
            });

        Ok(Self {
            age: form
                .get(field::AGE)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0),
            gender: form
                .get(field::GENDER)
                .and_then(|v| Gender::from_code(v)),
            ethnicity: opt_text(form, field::ETHNICITY).unwrap_or_default(),
            education_level: opt_text(form, field::EDUCATION_LEVEL).unwrap_or_default(),
            height_m,
            weight_kg,
            bmi,
            smoking: opt_flag(form, field::SMOKING),
            alcohol_consumption: opt_f64(form, field::ALCOHOL_CONSUMPTION),
            physical_activity: opt_f64(form, field::PHYSICAL_ACTIVITY),
            diet_quality: opt_f64(form, field::DIET_QUALITY),
            sleep_quality: opt_f64(form, field::SLEEP_QUALITY),
            family_history: opt_flag(form, field::FAMILY_HISTORY),
            cardiovascular_disease: opt_flag(form, field::CARDIOVASCULAR_DISEASE),
            diabetes: opt_flag(form, field::DIABETES),
            depression: opt_flag(form, field::DEPRESSION),
            head_injury: opt_flag(form, field::HEAD_INJURY),
            hypertension: opt_flag(form, field::HYPERTENSION),
            systolic_bp: opt_f64(form, field::SYSTOLIC_BP),
            diastolic_bp: opt_f64(form, field::DIASTOLIC_BP),
            cholesterol_total: opt_f64(form, field::CHOLESTEROL_TOTAL),
            cholesterol_ldl: opt_f64(form, field::CHOLESTEROL_LDL),
            cholesterol_hdl: opt_f64(form, field::CHOLESTEROL_HDL),
            cholesterol_triglycerides: opt_f64(form, field::CHOLESTEROL_TRIGLYCERIDES),
            mmse: opt_f64(form, field::MMSE),
            functional_assessment: opt_f64(form, field::FUNCTIONAL_ASSESSMENT),
            memory_complaints: opt_flag(form, field::MEMORY_COMPLAINTS),
            behavioral_problems: opt_flag(form, field::BEHAVIORAL_PROBLEMS),
            adl: opt_f64(form, field::ADL),
            confusion: opt_flag(form, field::CONFUSION),
            disorientation: opt_flag(form, field::DISORIENTATION),
            personality_changes: opt_flag(form, field::PERSONALITY_CHANGES),
            difficulty_completing_tasks: opt_flag(form, field::DIFFICULTY_COMPLETING_TASKS),
            forgetfulness: opt_flag(form, field::FORGETFULNESS),
            physician: opt_text(form, field::DOCTOR_IN_CHARGE),
        })
    }

    /// Truncated one-line summary for the history record: the first five of
    /// age, gender, MMSE, ADL, functional assessment, plus any of memory
    /// complaints / behavioral problems / family history present.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if self.age > 0 {
            parts.push(format!("Age: {} years", self.age));
        }
        if let Some(gender) = self.gender {
            parts.push(format!("Gender: {gender}"));
        }
        if let Some(mmse) = self.mmse {
            parts.push(format!("MMSE: {}/30", fmt_scale(mmse)));
        }
        if let Some(adl) = self.adl {
            parts.push(format!("ADL: {}/10", fmt_scale(adl)));
        }
        if let Some(func) = self.functional_assessment {
            parts.push(format!("Func: {}/10", fmt_scale(func)));
        }
        if self.memory_complaints == Some(true) {
            parts.push("Memory complaints".to_string());
        }
        if self.behavioral_problems == Some(true) {
            parts.push("Behavioral problems".to_string());
        }
        if self.family_history == Some(true) {
            parts.push("Family history".to_string());
        }

        parts.truncate(5);
        parts.join(", ")
    }
}

/// Format a 0-10 / 0-30 scale value without a trailing ".0".
pub(crate) fn fmt_scale(value: f64) -> String {
    if (value - value.trunc()).abs() < f64::EPSILON {
        format!("{}", value.trunc() as i64)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_form() -> FormData {
        let mut form = FormData::new();
        form.insert(field::AGE.into(), "72".into());
        form.insert(field::GENDER.into(), "1".into());
        form.insert(field::ETHNICITY.into(), "White".into());
        form.insert(field::EDUCATION_LEVEL.into(), "Secondary".into());
        form.insert(field::HEIGHT.into(), "1.70".into());
        form.insert(field::WEIGHT.into(), "65".into());
        form
    }

    #[test]
    fn test_missing_fields_aggregated() {
        let mut form = minimal_form();
        form.remove(field::GENDER);
        form.insert(field::HEIGHT.into(), "  ".into());

        let err = PatientIntake::from_form(&form).expect_err("Should fail validation");
        let IntakeError::MissingFields(missing) = err;
        assert_eq!(missing, vec!["Gender".to_string(), "Height".to_string()]);
    }

    #[test]
    fn test_minimal_form_parses() {
        let intake = PatientIntake::from_form(&minimal_form()).expect("Should parse");
        assert_eq!(intake.age, 72);
        assert_eq!(intake.gender, Some(Gender::Female));
        assert_eq!(intake.smoking, None);
        assert_eq!(intake.mmse, None);
    }

    #[test]
    fn test_bmi_derived_from_height_weight() {
        let intake = PatientIntake::from_form(&minimal_form()).expect("Should parse");
        let bmi = intake.bmi.expect("Should derive BMI");
        assert!((bmi - 65.0 / (1.70 * 1.70)).abs() < 1e-9);
    }

    #[test]
    fn test_supplied_bmi_wins_over_derivation() {
        let mut form = minimal_form();
        form.insert(field::BMI.into(), "31.4".into());
        let intake = PatientIntake::from_form(&form).expect("Should parse");
        assert_eq!(intake.bmi, Some(31.4));
    }

    #[test]
    fn test_malformed_optional_values_become_absent() {
        let mut form = minimal_form();
        form.insert(field::MMSE.into(), "not a number".into());
        form.insert(field::SMOKING.into(), "yes".into());

        let intake = PatientIntake::from_form(&form).expect("Should parse");
        assert_eq!(intake.mmse, None);
        assert_eq!(intake.smoking, None);
    }

    #[test]
    fn test_malformed_age_defaults_to_zero() {
        let mut form = minimal_form();
        form.insert(field::AGE.into(), "seventy".into());
        let intake = PatientIntake::from_form(&form).expect("Should parse");
        assert_eq!(intake.age, 0);
    }

    #[test]
    fn test_summary_truncates_to_five() {
        let mut form = minimal_form();
        form.insert(field::MMSE.into(), "20".into());
        form.insert(field::ADL.into(), "6".into());
        form.insert(field::FUNCTIONAL_ASSESSMENT.into(), "5".into());
        form.insert(field::MEMORY_COMPLAINTS.into(), "1".into());
        form.insert(field::FAMILY_HISTORY.into(), "1".into());

        let intake = PatientIntake::from_form(&form).expect("Should parse");
        let summary = intake.summary();
        assert_eq!(
            summary,
            "Age: 72 years, Gender: Female, MMSE: 20/30, ADL: 6/10, Func: 5/10"
        );
    }

    #[test]
    fn test_summary_includes_symptom_flags_when_room() {
        let mut form = minimal_form();
        form.insert(field::MEMORY_COMPLAINTS.into(), "1".into());
        let intake = PatientIntake::from_form(&form).expect("Should parse");
        assert!(intake.summary().ends_with("Memory complaints"));
    }
}
