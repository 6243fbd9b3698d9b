//! Questionnaire intake form.
//!
//! All 35 questionnaire fields in evaluation order, rendered as a paged
//! two-column form. Only the six demographic fields are required; everything
//! else may be left blank and simply contributes nothing to the score.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{field, FormData};
use crate::tui::styles::MedicalTheme;

/// Input discipline for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Decimal number
    Numeric,
    /// Binary flag encoded "0"/"1"
    Flag,
    /// Free text
    Text,
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    /// Questionnaire key submitted with the form
    pub key: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

impl FormField {
    fn new(
        key: &'static str,
        label: &'static str,
        hint: &'static str,
        kind: FieldKind,
        required: bool,
    ) -> Self {
        Self {
            key,
            label,
            hint,
            kind,
            required,
            value: String::new(),
        }
    }
}

/// Intake form state
pub struct IntakeFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for IntakeFormState {
    fn default() -> Self {
        use FieldKind::{Flag, Numeric, Text};

        Self {
            fields: vec![
                // Demographics
                FormField::new(field::AGE, "Age", "years", Numeric, true),
                FormField::new(field::GENDER, "Gender", "0=male, 1=female", Flag, true),
                FormField::new(field::ETHNICITY, "Ethnicity", "free text", Text, true),
                FormField::new(
                    field::EDUCATION_LEVEL,
                    "Education Level",
                    "free text",
                    Text,
                    true,
                ),
                // Anthropometry
                FormField::new(field::HEIGHT, "Height", "meters, e.g. 1.70", Numeric, true),
                FormField::new(field::WEIGHT, "Weight", "kg", Numeric, true),
                FormField::new(field::BMI, "BMI", "blank = derived", Numeric, false),
                // Lifestyle
                FormField::new(field::SMOKING, "Smoking", "0=no, 1=yes", Flag, false),
                FormField::new(
                    field::ALCOHOL_CONSUMPTION,
                    "Alcohol Consumption",
                    "units/week",
                    Numeric,
                    false,
                ),
                FormField::new(
                    field::PHYSICAL_ACTIVITY,
                    "Physical Activity",
                    "hours/week",
                    Numeric,
                    false,
                ),
                FormField::new(field::DIET_QUALITY, "Diet Quality", "0-10", Numeric, false),
                FormField::new(
                    field::SLEEP_QUALITY,
                    "Sleep Quality",
                    "0-10",
                    Numeric,
                    false,
                ),
                // Medical history
                FormField::new(
                    field::FAMILY_HISTORY,
                    "Family History (Alzheimer's)",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(
                    field::CARDIOVASCULAR_DISEASE,
                    "Cardiovascular Disease",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(field::DIABETES, "Diabetes", "0=no, 1=yes", Flag, false),
                FormField::new(field::DEPRESSION, "Depression", "0=no, 1=yes", Flag, false),
                FormField::new(field::HEAD_INJURY, "Head Injury", "0=no, 1=yes", Flag, false),
                FormField::new(
                    field::HYPERTENSION,
                    "Hypertension",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                // Exams
                FormField::new(field::SYSTOLIC_BP, "Systolic BP", "mmHg", Numeric, false),
                FormField::new(field::DIASTOLIC_BP, "Diastolic BP", "mmHg", Numeric, false),
                FormField::new(
                    field::CHOLESTEROL_TOTAL,
                    "Cholesterol Total",
                    "mg/dL",
                    Numeric,
                    false,
                ),
                FormField::new(
                    field::CHOLESTEROL_LDL,
                    "Cholesterol LDL",
                    "mg/dL",
                    Numeric,
                    false,
                ),
                FormField::new(
                    field::CHOLESTEROL_HDL,
                    "Cholesterol HDL",
                    "mg/dL",
                    Numeric,
                    false,
                ),
                FormField::new(
                    field::CHOLESTEROL_TRIGLYCERIDES,
                    "Triglycerides",
                    "mg/dL",
                    Numeric,
                    false,
                ),
                // Cognitive and functional assessments
                FormField::new(field::MMSE, "MMSE", "0-30, lower = worse", Numeric, false),
                FormField::new(
                    field::FUNCTIONAL_ASSESSMENT,
                    "Functional Assessment",
                    "0-10, lower = worse",
                    Numeric,
                    false,
                ),
                FormField::new(field::ADL, "ADL", "0-10, lower = worse", Numeric, false),
                // Symptoms
                FormField::new(
                    field::MEMORY_COMPLAINTS,
                    "Memory Complaints",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(
                    field::BEHAVIORAL_PROBLEMS,
                    "Behavioral Problems",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(field::CONFUSION, "Confusion", "0=no, 1=yes", Flag, false),
                FormField::new(
                    field::DISORIENTATION,
                    "Disorientation",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(
                    field::PERSONALITY_CHANGES,
                    "Personality Changes",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(
                    field::DIFFICULTY_COMPLETING_TASKS,
                    "Difficulty Completing Tasks",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                FormField::new(
                    field::FORGETFULNESS,
                    "Forgetfulness",
                    "0=no, 1=yes",
                    Flag,
                    false,
                ),
                // Record keeping
                FormField::new(
                    field::DOCTOR_IN_CHARGE,
                    "Doctor In Charge",
                    "optional",
                    Text,
                    false,
                ),
            ],
            selected_field: 0,
            error_message: None,
        }
    }
}

impl IntakeFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accepted = match field.kind {
            FieldKind::Numeric => c.is_ascii_digit() || c == '.',
            FieldKind::Flag => (c == '0' || c == '1') && field.value.is_empty(),
            FieldKind::Text => !c.is_control(),
        };
        if accepted {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.clear();
    }

    /// Wipe all field buffers from memory and clear values.
    ///
    /// Intended to be called immediately after a successful submission so
    /// plaintext inputs do not persist in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
            field.value.clear();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Collect non-empty values into a form submission.
    #[must_use]
    pub fn to_form(&self) -> FormData {
        self.fields
            .iter()
            .filter(|f| !f.value.trim().is_empty())
            .map(|f| (f.key.to_string(), f.value.trim().to_string()))
            .collect()
    }

    /// Load sample data (typical considerable-risk profile).
    pub fn load_sample_data(&mut self) {
        let sample: &[(&str, &str)] = &[
            (field::AGE, "72"),
            (field::GENDER, "0"),
            (field::ETHNICITY, "White"),
            (field::EDUCATION_LEVEL, "Primary"),
            (field::HEIGHT, "1.72"),
            (field::WEIGHT, "68"),
            (field::SMOKING, "1"),
            (field::SLEEP_QUALITY, "5"),
            (field::FAMILY_HISTORY, "1"),
            (field::HYPERTENSION, "1"),
            (field::SYSTOLIC_BP, "150"),
            (field::DIASTOLIC_BP, "92"),
            (field::MMSE, "18"),
            (field::FUNCTIONAL_ASSESSMENT, "5"),
            (field::ADL, "5"),
            (field::MEMORY_COMPLAINTS, "1"),
            (field::DOCTOR_IN_CHARGE, "Dr. Santos"),
        ];

        for field_state in self.fields.iter_mut() {
            field_state.value.clear();
            if let Some((_, value)) = sample.iter().find(|(key, _)| *key == field_state.key) {
                field_state.value.push_str(value);
            }
        }
        self.error_message = None;
    }

    /// BMI derived from the current height/weight entries, shown as a
    /// preview while the BMI field itself is blank.
    #[must_use]
    pub fn derived_bmi(&self) -> Option<f64> {
        let value_of = |key: &str| {
            self.fields
                .iter()
                .find(|f| f.key == key)
                .and_then(|f| f.value.trim().parse::<f64>().ok())
                .filter(|v| *v > 0.0)
        };

        if value_of(field::BMI).is_some() {
            return None;
        }
        let height = value_of(field::HEIGHT)?;
        let weight = value_of(field::WEIGHT)?;
        Some(weight / (height * height))
    }

    /// Fields shown per page for the given content area.
    fn page_capacity(area: Rect) -> usize {
        let rows = (area.height.saturating_sub(2) / 3).max(1) as usize;
        rows * 2
    }
}

/// Render the questionnaire intake form
pub fn render_intake_form(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    // Split into header and form
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], chunks[1], state);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, form_area: Rect, state: &IntakeFormState) {
    let capacity = IntakeFormState::page_capacity(form_area);
    let page = state.selected_field / capacity + 1;
    let pages = state.fields.len().div_ceil(capacity);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("New Evaluation", MedicalTheme::title()),
        Span::styled(
            " │ Alzheimer's Risk Questionnaire",
            MedicalTheme::text_secondary(),
        ),
        Span::styled(
            format!(" │ Page {page}/{pages}"),
            MedicalTheme::text_muted(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    // Page window keeping the selected field visible
    let capacity = IntakeFormState::page_capacity(area);
    let start = (state.selected_field / capacity) * capacity;
    let end = (start + capacity).min(state.fields.len());
    let visible = &state.fields[start..end];

    // Two-column layout within the page
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (visible.len() + 1) / 2;

    render_field_column(f, columns[0], &visible[..mid], start, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &visible[mid..],
        start + mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let marker = if field.required { "*" } else { "" };
        let block = Block::default()
            .title(Span::styled(
                format!(" {}{} ", field.label, marker),
                title_style,
            ))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(&field.value, MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", MedicalTheme::focused())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else if let Some(bmi) = state.derived_bmi() {
        Line::from(vec![
            Span::styled("BMI (derived): ", MedicalTheme::text_secondary()),
            Span::styled(format!("{bmi:.1}"), MedicalTheme::info()),
            Span::styled("  ", MedicalTheme::text()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Submit ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓/Tab] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Submit ", MedicalTheme::key_desc()),
            Span::styled("[F2] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Del] ", MedicalTheme::key_hint()),
            Span::styled("Clear Field ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_form_skips_blank_fields() {
        let mut state = IntakeFormState::default();
        state.fields[0].value = "72".to_string();

        let form = state.to_form();
        assert_eq!(form.get(field::AGE).map(String::as_str), Some("72"));
        assert!(!form.contains_key(field::GENDER));
    }

    #[test]
    fn test_flag_fields_accept_single_binary_digit() {
        let mut state = IntakeFormState::default();
        let smoking = state
            .fields
            .iter()
            .position(|f| f.key == field::SMOKING)
            .expect("Smoking field exists");
        state.selected_field = smoking;

        state.input_char('2');
        assert!(state.fields[smoking].value.is_empty());

        state.input_char('1');
        assert_eq!(state.fields[smoking].value, "1");

        // Second digit is rejected; flags are single-character.
        state.input_char('0');
        assert_eq!(state.fields[smoking].value, "1");
    }

    #[test]
    fn test_text_fields_accept_letters() {
        let mut state = IntakeFormState::default();
        let ethnicity = state
            .fields
            .iter()
            .position(|f| f.key == field::ETHNICITY)
            .expect("Ethnicity field exists");
        state.selected_field = ethnicity;

        for c in "White".chars() {
            state.input_char(c);
        }
        assert_eq!(state.fields[ethnicity].value, "White");
    }

    #[test]
    fn test_clear_sensitive_wipes_all_values() {
        let mut state = IntakeFormState::default();
        state.load_sample_data();
        assert!(state.fields.iter().any(|f| !f.value.is_empty()));

        state.clear_sensitive();
        assert!(state.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(state.selected_field, 0);
    }

    #[test]
    fn test_derived_bmi_preview() {
        let mut state = IntakeFormState::default();
        let set = |state: &mut IntakeFormState, key: &str, value: &str| {
            let idx = state
                .fields
                .iter()
                .position(|f| f.key == key)
                .expect("Field exists");
            state.fields[idx].value = value.to_string();
        };

        assert!(state.derived_bmi().is_none());

        set(&mut state, field::HEIGHT, "1.70");
        set(&mut state, field::WEIGHT, "65");
        let bmi = state.derived_bmi().expect("Should derive");
        assert!((bmi - 65.0 / (1.70 * 1.70)).abs() < 1e-9);

        // An explicit BMI entry suppresses the preview.
        set(&mut state, field::BMI, "31.4");
        assert!(state.derived_bmi().is_none());
    }

    #[test]
    fn test_sample_data_produces_valid_form() {
        let mut state = IntakeFormState::default();
        state.load_sample_data();

        let form = state.to_form();
        let intake = crate::domain::PatientIntake::from_form(&form).expect("Sample is valid");
        assert_eq!(intake.age, 72);
        assert_eq!(intake.smoking, Some(true));
    }
}
