//! Dashboard view: Main overview screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::HistoryStatistics;
use crate::domain::RiskLevel;
use crate::tui::styles::MedicalTheme;

/// Dashboard state for rendering.
pub struct DashboardState {
    pub storage_ready: bool,
    pub record_count: usize,
    pub history_cap: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            storage_ready: false,
            record_count: 0,
            history_cap: crate::adapters::sqlite::DEFAULT_HISTORY_CAP,
        }
    }
}

/// Render the main dashboard view.
pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    stats: &HistoryStatistics,
) {
    // Split into header and main content
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state, stats);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("NeuroScreen", MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Alzheimer's Risk Screening Questionnaire",
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

fn render_main_content(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    stats: &HistoryStatistics,
) {
    // Split into left (status) and right (history overview)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Status panels
            Constraint::Percentage(60), // History overview
        ])
        .split(area);

    render_status_panels(f, chunks[0], state);
    render_history_overview(f, chunks[1], stats);
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // System status
            Constraint::Length(5), // History capacity
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    // System Status
    let status_items = vec![
        format_status_item("Local History Storage", state.storage_ready),
        Line::from(vec![
            Span::styled("  Evaluations Stored: ", MedicalTheme::text_secondary()),
            Span::styled(state.record_count.to_string(), MedicalTheme::text()),
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" System Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let status_list = Paragraph::new(status_items).block(status_block);
    f.render_widget(status_list, chunks[0]);

    // History capacity gauge (oldest records are evicted past the cap)
    let cap = state.history_cap.max(1);
    let used = state.record_count.min(cap);
    let ratio = used as f64 / cap as f64;

    let capacity_block = Block::default()
        .title(Span::styled(" History Capacity ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let capacity_gauge = Gauge::default()
        .block(capacity_block)
        .gauge_style(if ratio >= 1.0 {
            MedicalTheme::warning()
        } else {
            MedicalTheme::info()
        })
        .percent((ratio * 100.0) as u16)
        .label(format!("{used}/{cap}"));

    f.render_widget(capacity_gauge, chunks[1]);

    // Quick Actions
    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Evaluation", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[H] ", MedicalTheme::key_hint()),
            Span::styled("Evaluation History", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let actions_list = Paragraph::new(actions).block(actions_block);
    f.render_widget(actions_list, chunks[2]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", MedicalTheme::success())
    } else {
        ("FAIL", MedicalTheme::danger())
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), MedicalTheme::text()),
    ])
}

fn render_history_overview(f: &mut Frame, area: Rect, stats: &HistoryStatistics) {
    let block = Block::default()
        .title(Span::styled(
            " Recent Activity (Aggregated) ",
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if stats.total == 0 {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No evaluations yet. Press [N] to start.",
            MedicalTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled("Stored evaluations: ", MedicalTheme::text_secondary()),
            Span::styled(stats.total.to_string(), MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Low Risk: ", MedicalTheme::text_secondary()),
            Span::styled(
                stats.low.to_string(),
                MedicalTheme::risk_level(RiskLevel::Low),
            ),
            Span::styled("  ", MedicalTheme::text()),
            Span::styled("Considerable Risk: ", MedicalTheme::text_secondary()),
            Span::styled(
                stats.considerable.to_string(),
                MedicalTheme::risk_level(RiskLevel::Considerable),
            ),
        ]),
        Line::from(vec![
            Span::styled("Considerable Rate: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:.0}%", stats.considerable_rate * 100.0),
                MedicalTheme::text(),
            ),
            Span::styled("  ", MedicalTheme::text()),
            Span::styled("Mean Risk: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:.1}%", stats.mean_percentage),
                MedicalTheme::text(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Details are available in the history view ([H]).",
            MedicalTheme::text_muted(),
        )]),
    ];

    let p = Paragraph::new(lines).block(Block::default());
    f.render_widget(p, inner);
}
