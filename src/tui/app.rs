//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::sqlite::{SqliteHistory, DEFAULT_HISTORY_CAP};
use crate::application::{AnalyticsService, HistoryStatistics, ScreeningService};
use crate::domain::RiskScorer;
use crate::ScreenError;

use super::ui::{
    dashboard::{render_dashboard, DashboardState},
    history::{render_history, HistoryState},
    intake::{render_intake_form, IntakeFormState},
    render_disclaimer,
    report::{render_report, ReportState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    IntakeForm,
    Report,
    History,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Screening service
    screening_service: ScreeningService<SqliteHistory>,

    /// Analytics service
    analytics_service: AnalyticsService<SqliteHistory>,

    /// Dashboard state
    dashboard_state: DashboardState,

    /// Intake form state
    intake_form_state: IntakeFormState,

    /// Report state
    report_state: ReportState,

    /// History state
    history_state: HistoryState,
}

impl App {
    /// Create a new application instance using the default storage.
    ///
    /// This is a convenience method that constructs the storage internally.
    /// For more control, use `with_dependencies()`.
    ///
    /// # Errors
    /// Returns error if the history database cannot be opened.
    pub fn new() -> Result<Self> {
        let db_path = std::env::var("NEUROSCREEN_DB_PATH")
            .unwrap_or_else(|_| "neuroscreen.db".to_string());
        let history = Arc::new(SqliteHistory::new(&db_path)?);

        let screening_service = ScreeningService::new(RiskScorer::default(), history.clone());
        let analytics_service = AnalyticsService::new(history);

        Ok(Self::with_dependencies(screening_service, analytics_service))
    }

    /// Create application with injected services (Composition Root pattern).
    ///
    /// Allows `main.rs` or tests to construct the storage externally.
    #[must_use]
    pub fn with_dependencies(
        screening_service: ScreeningService<SqliteHistory>,
        analytics_service: AnalyticsService<SqliteHistory>,
    ) -> Self {
        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            screening_service,
            analytics_service,
            dashboard_state: DashboardState::default(),
            intake_form_state: IntakeFormState::default(),
            report_state: ReportState::default(),
            history_state: HistoryState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Initial state update
        self.update_dashboard_state();

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            // Aggregates are fetched per frame so the dashboard always
            // reflects the stored history.
            let stats = if self.screen == Screen::Dashboard {
                self.analytics_service.statistics().unwrap_or_default()
            } else {
                HistoryStatistics::default()
            };

            // Draw current screen
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Dashboard => {
                        render_dashboard(f, content_area, &self.dashboard_state, &stats);
                    }
                    Screen::IntakeForm => {
                        render_intake_form(f, content_area, &self.intake_form_state);
                    }
                    Screen::Report => render_report(f, content_area, &self.report_state),
                    Screen::History => render_history(f, content_area, &self.history_state),
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::IntakeForm => self.handle_intake_form_key(key),
            Screen::Report => self.handle_report_key(key),
            Screen::History => self.handle_history_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.intake_form_state = IntakeFormState::default();
                self.screen = Screen::IntakeForm;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.load_history();
                self.screen = Screen::History;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_intake_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up => {
                self.intake_form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.intake_form_state.next_field();
            }
            // F2 instead of a letter: text fields accept letters as input.
            KeyCode::F(2) => {
                self.intake_form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.intake_form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.intake_form_state.delete_char();
            }
            KeyCode::Delete => {
                self.intake_form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_intake_form();
            }
            _ => {}
        }
    }

    fn handle_report_key(&mut self, key: KeyCode) {
        match &self.report_state {
            ReportState::Complete { .. } => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.update_dashboard_state();
                    self.screen = Screen::Dashboard;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.intake_form_state = IntakeFormState::default();
                    self.screen = Screen::IntakeForm;
                }
                _ => {}
            },
            ReportState::Error { .. } => match key {
                KeyCode::Enter => {
                    self.screen = Screen::IntakeForm;
                }
                KeyCode::Esc => {
                    self.screen = Screen::Dashboard;
                }
                _ => {}
            },
            ReportState::Idle => {
                if key == KeyCode::Esc {
                    self.screen = Screen::Dashboard;
                }
            }
        }
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.update_dashboard_state();
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up => {
                self.history_state.prev_record();
            }
            KeyCode::Down => {
                self.history_state.next_record();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.load_history();
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if let Err(e) = self.screening_service.clear_history() {
                    tracing::error!("Failed to clear history: {}", e);
                    self.history_state.error = Some(e.to_string());
                } else {
                    self.load_history();
                }
            }
            _ => {}
        }
    }

    fn submit_intake_form(&mut self) {
        let form = self.intake_form_state.to_form();
        match self.screening_service.assess(&form) {
            Ok(outcome) => {
                // Clear plaintext buffers from the UI immediately.
                self.intake_form_state.clear_sensitive();
                self.report_state = ReportState::Complete { outcome };
                self.screen = Screen::Report;
            }
            Err(ScreenError::Intake(e)) => {
                self.intake_form_state.error_message = Some(e.to_string());
            }
            Err(e) => {
                tracing::error!("Evaluation failed: {}", e);
                self.report_state = ReportState::Error {
                    message: e.to_string(),
                };
                self.screen = Screen::Report;
            }
        }
    }

    fn update_dashboard_state(&mut self) {
        match self.screening_service.assessment_count() {
            Ok(count) => {
                self.dashboard_state.storage_ready = true;
                self.dashboard_state.record_count = count;
            }
            Err(e) => {
                tracing::error!("Failed to read history count: {}", e);
                self.dashboard_state.storage_ready = false;
            }
        }
        self.dashboard_state.history_cap = DEFAULT_HISTORY_CAP;
    }

    fn load_history(&mut self) {
        match self.screening_service.recent_assessments(DEFAULT_HISTORY_CAP) {
            Ok(records) => self.history_state.set_records(records),
            Err(e) => {
                tracing::error!("Failed to load history: {}", e);
                self.history_state.error = Some(e.to_string());
            }
        }
    }
}
