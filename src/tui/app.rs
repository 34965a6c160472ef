//! Main TUI application state and logic

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::{
    components::StatusDisplay,
    events::AppEvent,
    screens::{FormScreen, RecordsScreen},
    traits::ScreenAction,
    ui::centered_rect,
};
use crate::config::Config;
use crate::models::RecordField;
use crate::reference::ReferenceService;
use crate::registry::{CityLookupTicket, FormMode, LookupOutcome, PostalLookupTicket, RegistrationManager};

/// What to show right after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupAction {
    NewForm,
    /// New form with this state preselected once the state list arrives
    NewFormForState(String),
    /// New form with the postal code filled in and looked up
    NewFormForPostalCode(String),
}

/// Main TUI application state
pub struct App {
    pub config: Config,
    pub manager: RegistrationManager,
    service: Arc<dyn ReferenceService>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    pub records: RecordsScreen,
    pub form: FormScreen,
    pub status: StatusDisplay,

    pub should_quit: bool,
    pub show_help_popup: bool,
    /// Lookups spawned and not yet answered
    pub pending_lookups: usize,
    /// State to select once the state list has loaded
    pending_state: Option<String>,
}

impl App {
    pub fn new(config: Config, service: Arc<dyn ReferenceService>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            manager: RegistrationManager::new(),
            service,
            events_tx,
            events_rx,
            records: RecordsScreen::new(),
            form: FormScreen::new(),
            status: StatusDisplay::new(),
            should_quit: false,
            show_help_popup: false,
            pending_lookups: 0,
            pending_state: None,
        }
    }

    /// Kick off the state list download
    pub fn start(&mut self) {
        self.status.set_loading("Loading states...");
        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.pending_lookups += 1;
        tokio::spawn(async move {
            let result = service.list_states().await;
            let _ = tx.send(AppEvent::StatesLoaded(result));
        });
    }

    pub fn apply_startup(&mut self, action: StartupAction) {
        self.apply_action(ScreenAction::OpenCreateForm);
        match action {
            StartupAction::NewForm => {}
            StartupAction::NewFormForState(code) => {
                let code = code.trim().to_uppercase();
                self.form.form.focus(RecordField::StateCode);
                if self.manager.states().is_empty() {
                    self.pending_state = Some(code);
                } else {
                    self.apply_action(ScreenAction::SelectState(code));
                }
            }
            StartupAction::NewFormForPostalCode(code) => {
                self.form.form.focus(RecordField::PostalCode);
                self.apply_action(ScreenAction::UpdateField(RecordField::PostalCode, code));
                self.apply_action(ScreenAction::LookupPostalCode);
            }
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.start();

        loop {
            self.process_pending_events();
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(self.config.tick_rate())? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Apply every lookup result that has already arrived
    pub fn process_pending_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    /// Wait for the next lookup result and apply it
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_app_event(event);
                true
            }
            None => false,
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let form_open = self.manager.mode().is_open();
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Char('?') if !form_open => {
                self.show_help_popup = !self.show_help_popup;
                return;
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return;
            }
            _ => {}
        }

        if self.show_help_popup {
            return;
        }

        let action = if form_open {
            self.form.handle_key_event(key)
        } else {
            match key.code {
                KeyCode::Char('q') if self.records.pending_delete.is_none() => ScreenAction::Quit,
                _ => self.records.handle_key_event(key, self.manager.records()),
            }
        };
        self.apply_action(action);
    }

    /// Carry out a screen's request against the manager
    pub fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::OpenCreateForm => {
                self.manager.open_create_form();
                self.form.reset_focus();
                self.status.set_info("New registration");
            }
            ScreenAction::OpenEditForm(id) => match self.manager.open_edit_form(id) {
                Ok(()) => {
                    self.form.reset_focus();
                    self.status.set_info("Editing record");
                    if let Some(ticket) = self.manager.begin_city_refresh() {
                        self.spawn_city_lookup(ticket);
                    }
                }
                Err(e) => self.status.set_error(e.to_string()),
            },
            ScreenAction::DeleteRecord(id) => match self.manager.delete_record(id) {
                Ok(record) => {
                    info!("Deleted record {}", id);
                    self.status.set_success(format!("Deleted {}", record.name));
                }
                Err(e) => self.status.set_error(e.to_string()),
            },
            ScreenAction::UpdateField(field, value) => {
                self.manager.update_draft_field(field, value);
            }
            ScreenAction::SelectState(code) => {
                if let Some(ticket) = self.manager.begin_state_selection(&code) {
                    self.status.set_loading(format!("Loading municipalities for {}...", code));
                    self.spawn_city_lookup(ticket);
                }
            }
            ScreenAction::LookupPostalCode => {
                let ticket = self.manager.begin_postal_lookup();
                self.status
                    .set_loading(format!("Looking up postal code {}...", ticket.postal_code));
                self.spawn_postal_lookup(ticket);
            }
            ScreenAction::SubmitForm => match self.manager.submit_draft() {
                Ok(id) => {
                    let name = self
                        .manager
                        .records()
                        .get(id)
                        .map(|r| r.name.clone())
                        .unwrap_or_default();
                    self.status.set_success(format!("Saved {}", name));
                    self.records.table.sync_len(self.manager.records().len());
                    self.records.table.select_id(self.manager.records(), id);
                }
                Err(e) => self.status.set_error(e.to_string()),
            },
            ScreenAction::CancelForm => {
                self.manager.cancel_form();
                self.status.set_info("Form closed without saving");
            }
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::None => {}
        }
        self.sync_views();
    }

    /// Apply the result of a background lookup
    pub fn handle_app_event(&mut self, event: AppEvent) {
        self.pending_lookups = self.pending_lookups.saturating_sub(1);
        debug!("Lookup finished: {}", event.describe());

        match event {
            AppEvent::StatesLoaded(result) => match self.manager.apply_states(result) {
                Ok(count) => {
                    self.status.set_info(format!("Loaded {} states", count));
                    if let Some(code) = self.pending_state.take() {
                        self.apply_action(ScreenAction::SelectState(code));
                    } else if self.manager.mode().is_open() && self.manager.cities().is_empty() {
                        if let Some(ticket) = self.manager.begin_city_refresh() {
                            self.spawn_city_lookup(ticket);
                        }
                    }
                }
                Err(e) => self.status.set_error(format!("Could not load states: {}", e)),
            },
            AppEvent::CitiesLoaded { ticket, result } => {
                let state_code = &ticket.state_code;
                match self.manager.apply_city_lookup(&ticket, result) {
                    Ok(LookupOutcome::Applied) => self.status.set_info(format!(
                        "{} municipalities in {}",
                        self.manager.cities().len(),
                        state_code
                    )),
                    Ok(_) => debug!("Dropped municipality list for {}", state_code),
                    Err(e) => self.status.set_error(format!(
                        "Could not load municipalities for {}: {}",
                        state_code, e
                    )),
                }
            }
            AppEvent::AddressResolved { ticket, result } => {
                let postal_code = &ticket.postal_code;
                match self.manager.apply_postal_lookup(&ticket, result) {
                    Ok(LookupOutcome::Applied) => {
                        self.status
                            .set_success(format!("Address filled from postal code {}", postal_code));
                        if let Some(ticket) = self.manager.begin_city_refresh() {
                            self.spawn_city_lookup(ticket);
                        }
                    }
                    Ok(_) => debug!("Dropped address for postal code {}", postal_code),
                    Err(e) => {
                        let retry = if e.is_transient() { " (Ctrl+B to retry)" } else { "" };
                        self.status.set_error(format!(
                            "Postal code {} lookup failed: {}{}",
                            postal_code, e, retry
                        ));
                    }
                }
            }
        }
        self.sync_views();
    }

    fn spawn_city_lookup(&mut self, ticket: CityLookupTicket) {
        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.pending_lookups += 1;
        tokio::spawn(async move {
            let result = service.list_cities(ticket.state_id).await;
            let _ = tx.send(AppEvent::CitiesLoaded { ticket, result });
        });
    }

    fn spawn_postal_lookup(&mut self, ticket: PostalLookupTicket) {
        let service = Arc::clone(&self.service);
        let tx = self.events_tx.clone();
        self.pending_lookups += 1;
        tokio::spawn(async move {
            let result = service.lookup_postal_code(&ticket.postal_code).await;
            let _ = tx.send(AppEvent::AddressResolved { ticket, result });
        });
    }

    fn sync_views(&mut self) {
        self.records.table.sync_len(self.manager.records().len());
        self.form.sync_from(
            self.manager.draft(),
            self.manager.states(),
            self.manager.cities(),
        );
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.records.draw(f, chunks[0], self.manager.records());

        let mode = self.manager.mode();
        if mode.is_open() {
            self.form.draw(f, chunks[0], self.manager.draft(), self.pending_lookups);
        }

        let hint = if mode.is_open() {
            " Esc: Cancel | Ctrl+S: Save | F1: Help "
        } else {
            " q: Quit | F1/?: Help "
        };
        self.status.render(f, chunks[1], hint);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    fn get_context_help(&self) -> String {
        let global_help = "Global:\n\
            F1 - Toggle this help\n\
            Esc - Close help\n\n";

        let screen_help = match self.manager.mode() {
            FormMode::Closed => {
                "Records:\n\
                ↑/↓ - Select record\n\
                n - New registration\n\
                e / Enter - Edit selected record\n\
                d - Delete selected record (asks y/n)\n\
                ? - Toggle this help\n\
                q - Quit"
            }
            FormMode::OpenCreate | FormMode::OpenEdit(_) => {
                "Registration form:\n\
                Tab / Shift+Tab - Next / previous field\n\
                Enter / Space - Open the state or municipality list\n\
                ↑/↓ - Move in a list\n\
                Ctrl+B / F2 - Fill the address from the postal code\n\
                Ctrl+S - Save\n\
                Esc - Cancel"
            }
        };

        format!("{}{}", global_help, screen_help)
    }
}
