//! TUI application loop for the tenant settings page
//!
//! Execution is single-threaded from the page's point of view: key events
//! and network-completion events interleave on this loop. Network calls run
//! on spawned tasks and report back over a channel; the controller's save
//! gate ensures at most one write is ever in flight.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::{ApiError, ConfigurationService, TenantConfigDocument};
use crate::config::Config;
use crate::drafts::FileDraftStore;
use crate::settings::controller::{Notice, SaveBlocked, SettingsController, StepSelection};
use crate::settings::forms::{BrandingForm, FieldSet, GeneralForm, SecurityForm};
use crate::settings::SettingsStep;
use crate::ui::settings_screen::{self, SettingsView};

/// Events delivered back to the loop from spawned tasks
pub enum AppEvent {
    /// Initial configuration fetch completed
    HydrateFinished(Result<Option<TenantConfigDocument>, ApiError>),
    /// Combined save completed
    SaveFinished {
        result: Result<(), ApiError>,
        doc: TenantConfigDocument,
    },
}

pub struct App {
    config: Config,
    tenant: String,
    service: Arc<dyn ConfigurationService>,
    controller: SettingsController<FileDraftStore>,
    general_form: GeneralForm,
    branding_form: BrandingForm,
    security_form: SecurityForm,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Currently displayed notice and when it appeared
    current_notice: Option<(Notice, Instant)>,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        tenant: String,
        service: Arc<dyn ConfigurationService>,
    ) -> Result<Self> {
        let store = FileDraftStore::new(config.drafts_path())
            .context("Failed to open the draft cache")?;
        let controller = SettingsController::new(store);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            tenant,
            service,
            controller,
            general_form: GeneralForm::new(),
            branding_form: BrandingForm::new(),
            security_form: SecurityForm::new(),
            events_tx,
            events_rx,
            current_notice: None,
            should_quit: false,
        })
    }

    /// Run the TUI until the user quits
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

        self.spawn_hydration();
        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode().ok();
        execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            self.apply_pending_events();
            self.collect_notices();
            self.expire_notice();
            self.draw(terminal)?;

            if event::poll(tick_rate).context("Failed to poll terminal events")? {
                if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }
        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let step = self.controller.active_step();
        let is_edit_mode = self.controller.is_edit_mode();
        let save_in_flight = self.controller.is_save_in_flight();
        let notice = self.current_notice.as_ref().map(|(n, _)| n.clone());

        let fields = match step {
            SettingsStep::General => &mut self.general_form.fields,
            SettingsStep::Branding => &mut self.branding_form.fields,
            SettingsStep::Security => &mut self.security_form.fields,
        };
        let mut view = SettingsView {
            tenant: &self.tenant,
            step,
            is_edit_mode,
            save_in_flight,
            notice: notice.as_ref(),
            fields,
        };
        terminal
            .draw(|frame| settings_screen::render(frame, &mut view))
            .context("Failed to draw frame")?;
        Ok(())
    }

    // ─── Async task plumbing ───────────────────────────────────────────────

    /// One best-effort fetch per page view; failure is downgraded to
    /// "no configuration" by the controller and never retried.
    fn spawn_hydration(&self) {
        let service = Arc::clone(&self.service);
        let tenant = self.tenant.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = service.fetch(&tenant).await;
            let _ = tx.send(AppEvent::HydrateFinished(result));
        });
    }

    fn apply_pending_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::HydrateFinished(result) => {
                    self.controller.apply_fetch(result);
                    if let Some(general) = self.controller.general_data() {
                        self.general_form.set_data(&general.clone());
                    }
                    if let Some(branding) = self.controller.branding_data() {
                        self.branding_form.set_data(&branding.clone());
                    }
                }
                AppEvent::SaveFinished { result, doc } => {
                    self.controller.finish_save(result, &doc);
                }
            }
        }
    }

    // ─── Notices ───────────────────────────────────────────────────────────

    fn collect_notices(&mut self) {
        if let Some(notice) = self.controller.drain_notices().into_iter().last() {
            self.current_notice = Some((notice, Instant::now()));
        }
    }

    fn expire_notice(&mut self) {
        let ttl = Duration::from_secs(self.config.ui.notice_ttl_secs);
        if let Some((_, shown_at)) = &self.current_notice {
            if shown_at.elapsed() > ttl {
                self.current_notice = None;
            }
        }
    }

    // ─── Input handling ────────────────────────────────────────────────────

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') => self.save(),
                KeyCode::Char('e') => self.controller.enter_edit_mode(),
                KeyCode::Char('d') => self.current_notice = None,
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::F(1) => self.select_step(SettingsStep::General),
            KeyCode::F(2) => self.select_step(SettingsStep::Branding),
            KeyCode::F(3) => self.select_step(SettingsStep::Security),
            KeyCode::Char('q') if !self.controller.is_edit_mode() => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.active_fields_mut().next_field(),
            KeyCode::BackTab => self.active_fields_mut().prev_field(),
            _ if self.controller.is_edit_mode() => {
                self.active_fields_mut().handle_key(code);
            }
            _ => {}
        }
    }

    fn active_fields_mut(&mut self) -> &mut FieldSet {
        match self.controller.active_step() {
            SettingsStep::General => &mut self.general_form.fields,
            SettingsStep::Branding => &mut self.branding_form.fields,
            SettingsStep::Security => &mut self.security_form.fields,
        }
    }

    /// Tab selection; selecting a gated step triggers the general form's
    /// own submit instead, and the controller advances on success.
    fn select_step(&mut self, step: SettingsStep) {
        match self.controller.select_step(step) {
            StepSelection::Switched | StepSelection::AlreadyActive => {}
            StepSelection::SubmitGeneralFirst => self.submit_general_form(),
        }
    }

    // ─── Save dispatch ─────────────────────────────────────────────────────

    /// Route the save action to the active step's form. No business logic
    /// here beyond dispatch; the forms validate, the controller decides.
    fn save(&mut self) {
        if !self.controller.is_edit_mode() {
            self.controller.enter_edit_mode();
            return;
        }
        match self.controller.active_step() {
            SettingsStep::General => self.submit_general_form(),
            SettingsStep::Branding => self.submit_branding_form(),
            SettingsStep::Security => self.submit_security_form(),
        }
    }

    fn submit_general_form(&mut self) {
        let data = match self.general_form.try_submit() {
            Ok(data) => data,
            // Inline errors are already recorded on the form
            Err(_) => return,
        };
        if let Err(errors) = self.controller.submit_general(data) {
            self.general_form.fields.errors = errors;
        }
    }

    fn submit_branding_form(&mut self) {
        let data = match self.branding_form.try_submit() {
            Ok(data) => data,
            Err(_) => return,
        };
        let doc = match self.controller.prepare_branding_save(data) {
            Ok(doc) => doc,
            // Controller already warned and moved back to the general step
            Err(SaveBlocked::MissingGeneralData) => return,
        };
        if !self.controller.begin_save() {
            return;
        }

        let service = Arc::clone(&self.service);
        let tenant = self.tenant.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = service.save(&tenant, &doc).await;
            let _ = tx.send(AppEvent::SaveFinished { result, doc });
        });
    }

    fn submit_security_form(&mut self) {
        if let Ok(data) = self.security_form.try_submit() {
            self.controller.submit_security(data);
        }
    }
}
