//! Evaluation history view.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::Assessment;
use crate::tui::styles::MedicalTheme;

/// History screen state
#[derive(Default)]
pub struct HistoryState {
    /// Records most-recent first
    pub records: Vec<Assessment>,
    pub selected: usize,
    pub error: Option<String>,
}

impl HistoryState {
    pub fn next_record(&mut self) {
        if !self.records.is_empty() {
            self.selected = (self.selected + 1) % self.records.len();
        }
    }

    pub fn prev_record(&mut self) {
        if !self.records.is_empty() {
            if self.selected == 0 {
                self.selected = self.records.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    /// Replace the record list, keeping the selection in bounds.
    pub fn set_records(&mut self, records: Vec<Assessment>) {
        self.records = records;
        if self.selected >= self.records.len() {
            self.selected = self.records.len().saturating_sub(1);
        }
        self.error = None;
    }
}

/// Render the evaluation history
pub fn render_history(f: &mut Frame, area: Rect, state: &HistoryState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_history_header(f, chunks[0], state);
    render_history_content(f, chunks[1], state);
    render_history_footer(f, chunks[2], state);
}

fn render_history_header(f: &mut Frame, area: Rect, state: &HistoryState) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Evaluation History", MedicalTheme::title()),
        Span::styled(
            format!(" │ {} records (most recent first)", state.records.len()),
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_history_content(f: &mut Frame, area: Rect, state: &HistoryState) {
    if let Some(error) = &state.error {
        let content = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("! Error", MedicalTheme::danger())),
            Line::from(""),
            Line::from(Span::styled(error.clone(), MedicalTheme::text())),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::danger()),
        );
        f.render_widget(content, area);
        return;
    }

    if state.records.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No evaluations stored yet. Press [Esc] and start one with [N].",
            MedicalTheme::text_muted(),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
        f.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_record_list(f, columns[0], state);
    render_record_detail(f, columns[1], &state.records[state.selected]);
}

fn render_record_list(f: &mut Frame, area: Rect, state: &HistoryState) {
    let items: Vec<ListItem> = state
        .records
        .iter()
        .map(|record| {
            let id = record.patient_id.as_deref().unwrap_or("-");
            let when = record.created_at.format("%Y-%m-%d %H:%M");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{id:<7}"), MedicalTheme::text()),
                Span::styled(
                    format!("{:>3}% ", record.percentage),
                    MedicalTheme::risk_gauge(record.percentage),
                ),
                Span::styled(
                    format!("{:<13}", record.risk_level.to_string()),
                    MedicalTheme::risk_level(record.risk_level),
                ),
                Span::styled(format!(" {when}"), MedicalTheme::text_muted()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(" Records ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .highlight_style(MedicalTheme::selected());

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));

    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_record_detail(f: &mut Frame, area: Rect, record: &Assessment) {
    let block = Block::default()
        .title(Span::styled(" Details ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Classification: ", MedicalTheme::text_secondary()),
            Span::styled(
                record.risk_level.to_string(),
                MedicalTheme::risk_level(record.risk_level),
            ),
            Span::styled(
                format!(" ({}%)", record.percentage),
                MedicalTheme::text_secondary(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Physician: ", MedicalTheme::text_secondary()),
            Span::styled(record.physician_label().to_string(), MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Summary", MedicalTheme::subtitle())),
    ];

    if record.summary.is_empty() {
        lines.push(Line::from(Span::styled(
            "No summary recorded",
            MedicalTheme::text_muted(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            record.summary.clone(),
            MedicalTheme::text(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Recommendations",
        MedicalTheme::subtitle(),
    )));
    for rec in &record.recommendations {
        lines.push(Line::from(vec![
            Span::styled("• ", MedicalTheme::info()),
            Span::styled(rec.clone(), MedicalTheme::text()),
        ]));
    }

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn render_history_footer(f: &mut Frame, area: Rect, state: &HistoryState) {
    let mut spans = vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Select ", MedicalTheme::key_desc()),
        Span::styled("[R] ", MedicalTheme::key_hint()),
        Span::styled("Refresh ", MedicalTheme::key_desc()),
    ];
    if !state.records.is_empty() {
        spans.push(Span::styled("[C] ", MedicalTheme::key_hint()));
        spans.push(Span::styled("Clear History ", MedicalTheme::key_desc()));
    }
    spans.push(Span::styled("[Esc] ", MedicalTheme::key_hint()));
    spans.push(Span::styled("Back", MedicalTheme::key_desc()));

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskLevel;
    use chrono::Utc;

    fn record(id: &str) -> Assessment {
        Assessment {
            patient_id: Some(id.to_string()),
            risk_level: RiskLevel::Low,
            percentage: 10,
            summary: String::new(),
            recommendations: Vec::new(),
            physician: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_selection_wraps() {
        let mut state = HistoryState::default();
        state.set_records(vec![record("P0002"), record("P0001")]);

        state.next_record();
        assert_eq!(state.selected, 1);
        state.next_record();
        assert_eq!(state.selected, 0);
        state.prev_record();
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn test_set_records_clamps_selection() {
        let mut state = HistoryState::default();
        state.set_records(vec![record("P0003"), record("P0002"), record("P0001")]);
        state.selected = 2;

        state.set_records(vec![record("P0003")]);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_selection_noop_when_empty() {
        let mut state = HistoryState::default();
        state.next_record();
        state.prev_record();
        assert_eq!(state.selected, 0);
    }
}
