use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;

use crate::config::Config;
use crate::lookup::{Departure, DepartureClient, LookupError};
use crate::model::TripRequest;

use super::action::Action;
use super::error::AppError;
use super::screens::{
    Confirmation, HelpState, ResultPanel, TripFormState, draw_help, draw_trip_form,
};
use super::widgets::StatusBarContext;

/// How long the event loop waits for a key before checking for lookup results.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// All screens the app can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// The trip request form and its result panel.
    TripForm,
    /// Show keybinding help.
    Help,
}

/// A finished flight lookup, sent back from the background task.
#[derive(Debug)]
pub struct LookupOutcome {
    /// The request the lookup was started for.
    pub request: TripRequest,
    /// The matching departure, `None` if the flight is not on the board.
    pub result: Result<Option<Departure>, LookupError>,
}

/// Top-level application state.
pub struct App {
    screen: Screen,
    trip_form: TripFormState,
    help: HelpState,
    client: DepartureClient,
    runtime: Handle,
    outcome_tx: Sender<LookupOutcome>,
    outcome_rx: Receiver<LookupOutcome>,
    airport_code: String,
    /// Flights whose lookups have not answered yet, oldest first.
    in_flight: Vec<String>,
    last_confirmation: Option<Confirmation>,
    should_quit: bool,
}

impl App {
    /// Creates a new `App` on the [`Screen::TripForm`] screen.
    ///
    /// Lookups are spawned on `runtime`.
    pub fn new(config: &Config, runtime: Handle) -> Result<Self, AppError> {
        let client = DepartureClient::new(&config.lookup)?;
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Ok(Self {
            screen: Screen::TripForm,
            trip_form: TripFormState::new(config.form.airport_label.as_str()),
            help: HelpState::new(),
            client,
            runtime,
            outcome_tx,
            outcome_rx,
            airport_code: config.lookup.airport_code.clone(),
            in_flight: Vec::new(),
            last_confirmation: None,
            should_quit: false,
        })
    }

    /// Main event loop: draw → poll event → dispatch → apply finished lookups.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(POLL_INTERVAL)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
            self.drain_outcomes();
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        match self.screen {
            Screen::TripForm => draw_trip_form(&self.trip_form, &self.status(), frame, area),
            Screen::Help => draw_help(&self.help, frame, area),
        }
    }

    /// Handles a key event: global keys first, then screen-specific.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let action = match self.screen {
            Screen::TripForm => self.trip_form.handle_key(key),
            Screen::Help => self.help.handle_key(key),
        };
        self.apply_action(action);
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(screen) => {
                if screen == Screen::Help {
                    self.help.reset();
                }
                self.screen = screen;
            }
            Action::Lookup(request) => self.start_lookup(request),
            Action::Complete(confirmation) => {
                tracing::info!(
                    flight = %confirmation.request.flight,
                    verified = confirmation.verified,
                    "trip request confirmed"
                );
                self.last_confirmation = Some(confirmation);
            }
            Action::Quit => self.should_quit = true,
        }
    }

    /// Spawns a background lookup for `request`. Earlier lookups are not cancelled.
    fn start_lookup(&mut self, request: TripRequest) {
        tracing::info!(flight = %request.flight, "looking up flight");
        self.in_flight.push(request.flight.clone());

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let result = client.lookup_flight(&request.flight).await;
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(LookupOutcome { request, result });
        });
    }

    /// Applies every lookup that has finished since the last call, in arrival order.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Opens the result panel for a successful lookup, or reports the failure.
    ///
    /// A failed lookup never opens the panel. While a panel is open the
    /// failure belongs to a superseded submit and is only logged.
    pub fn apply_outcome(&mut self, outcome: LookupOutcome) {
        let LookupOutcome { request, result } = outcome;
        if let Some(pos) = self.in_flight.iter().position(|f| *f == request.flight) {
            self.in_flight.remove(pos);
        }

        match result {
            Ok(found) => {
                self.trip_form.open_panel(ResultPanel::from_lookup(request, found));
            }
            Err(e) => {
                tracing::error!(flight = %request.flight, error = %e, "flight lookup failed");
                if self.trip_form.panel().is_none() {
                    self.trip_form.set_error(format!("Flight lookup failed: {e}"));
                }
            }
        }
    }

    /// Status bar content for the current state.
    fn status(&self) -> StatusBarContext {
        StatusBarContext {
            airport_code: self.airport_code.clone(),
            checking: self.in_flight.last().cloned(),
            submitted: self
                .last_confirmation
                .as_ref()
                .map(|c| (c.request.flight.clone(), c.verified)),
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the trip form state.
    pub fn trip_form(&self) -> &TripFormState {
        &self.trip_form
    }

    /// Returns the flights whose lookups are still running.
    pub fn in_flight(&self) -> &[String] {
        &self.in_flight
    }

    /// Returns the most recently confirmed trip request, if any.
    pub fn last_confirmation(&self) -> Option<&Confirmation> {
        self.last_confirmation.as_ref()
    }
}
