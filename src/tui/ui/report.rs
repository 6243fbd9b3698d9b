//! Evaluation result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::ScreeningOutcome;
use crate::tui::styles::MedicalTheme;

/// Maximum risk factors listed on screen; the stored record keeps them all.
const MAX_FACTORS_SHOWN: usize = 6;

/// Report screen state
#[derive(Debug, Clone, Default)]
pub enum ReportState {
    /// Nothing evaluated yet
    #[default]
    Idle,
    /// Completed evaluation
    Complete { outcome: ScreeningOutcome },
    /// Evaluation failed after the form was accepted
    Error { message: String },
}

/// Render the evaluation result
pub fn render_report(f: &mut Frame, area: Rect, state: &ReportState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_report_header(f, chunks[0]);
    render_report_content(f, chunks[1], state);
    render_report_footer(f, chunks[2], state);
}

fn render_report_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Evaluation Result", MedicalTheme::title()),
        Span::styled(" │ Risk Classification", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_report_content(f: &mut Frame, area: Rect, state: &ReportState) {
    match state {
        ReportState::Idle => render_idle(f, area),
        ReportState::Complete { outcome } => render_result(f, area, outcome),
        ReportState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No evaluation yet",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the questionnaire to see a result",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, outcome: &ScreeningOutcome) {
    let block = Block::default()
        .title(Span::styled(" Classification ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Headline
            Constraint::Length(3), // Percentage gauge
            Constraint::Length(2), // Record line
            Constraint::Min(0),    // Factors and recommendations
        ])
        .margin(1)
        .split(inner);

    let report = &outcome.report;
    let risk_style = MedicalTheme::risk_level(report.risk_level);

    // Headline
    let headline = Paragraph::new(vec![Line::from(Span::styled(
        report.risk_level.headline(),
        risk_style.add_modifier(ratatui::style::Modifier::BOLD),
    ))])
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    // Percentage bar
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Percentage ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(report.percentage.min(100) as u16)
        .label(format!(
            "{}% ({} points)",
            report.percentage, report.points
        ));
    f.render_widget(gauge, chunks[1]);

    // Record line
    let record = &outcome.record;
    let record_line = Paragraph::new(Line::from(vec![
        Span::styled("Patient ID: ", MedicalTheme::text_secondary()),
        Span::styled(
            record.patient_id.as_deref().unwrap_or("-").to_string(),
            MedicalTheme::text(),
        ),
        Span::styled("  Physician: ", MedicalTheme::text_secondary()),
        Span::styled(record.physician_label().to_string(), MedicalTheme::text()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(record_line, chunks[2]);

    // Factors (left) and recommendations (right)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    render_factors(f, columns[0], report);
    render_recommendations(f, columns[1], record);
}

fn render_factors(f: &mut Frame, area: Rect, report: &crate::domain::RiskReport) {
    let block = Block::default()
        .title(Span::styled(
            " Identified Risk Factors ",
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if report.factors.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No risk factors identified",
            MedicalTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = report
        .factors
        .iter()
        .take(MAX_FACTORS_SHOWN)
        .map(|factor| {
            Line::from(vec![
                Span::styled("• ", MedicalTheme::warning()),
                Span::styled(factor.clone(), MedicalTheme::text()),
            ])
        })
        .collect();

    if report.factors.len() > MAX_FACTORS_SHOWN {
        lines.push(Line::from(Span::styled(
            format!(
                "... and {} more factors",
                report.factors.len() - MAX_FACTORS_SHOWN
            ),
            MedicalTheme::text_muted(),
        )));
    }

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_recommendations(f: &mut Frame, area: Rect, record: &crate::domain::Assessment) {
    let block = Block::default()
        .title(Span::styled(" Recommendations ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines: Vec<Line> = record
        .recommendations
        .iter()
        .map(|rec| {
            Line::from(vec![
                Span::styled("• ", MedicalTheme::info()),
                Span::styled(rec.clone(), MedicalTheme::text()),
            ])
        })
        .collect();

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_report_footer(f: &mut Frame, area: Rect, state: &ReportState) {
    let content = match state {
        ReportState::Complete { .. } => Line::from(vec![
            Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back to Dashboard ", MedicalTheme::key_desc()),
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Evaluation", MedicalTheme::key_desc()),
        ]),
        ReportState::Error { .. } => Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Back to Form ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ]),
        ReportState::Idle => Line::from(vec![Span::styled(
            "Nothing to show",
            MedicalTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
