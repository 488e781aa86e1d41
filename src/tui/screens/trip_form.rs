//! Trip request screen: the drop-off form and its lookup result panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::result_panel::{ResultPanel, draw_result_panel};
use crate::model::{TripField, TripRequest};
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::{
    FIELD_ROW_HEIGHT, Form, FormField, StatusBarContext, draw_form, draw_status_bar,
};

/// Form row of a field. Rows are laid out in [`TripField::ALL`] order.
fn row(field: TripField) -> usize {
    field as usize
}

/// State for the trip request screen.
#[derive(Debug, Clone)]
pub struct TripFormState {
    form: Form,
    panel: Option<ResultPanel>,
    general_error: Option<String>,
}

impl TripFormState {
    /// Creates an empty form whose read-only airport field shows `airport_label`.
    pub fn new(airport_label: impl Into<String>) -> Self {
        let airport_label = airport_label.into();
        let fields = TripField::ALL
            .into_iter()
            .map(|field| match field {
                TripField::Airport => FormField::read_only(field.label(), airport_label.as_str()),
                TripField::Flight | TripField::Tel | TripField::Identity => {
                    FormField::new(field.label(), true)
                }
                TripField::Name | TripField::RideNotes => FormField::new(field.label(), false),
            })
            .collect();
        Self {
            form: Form::new(fields),
            panel: None,
            general_error: None,
        }
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    ///
    /// While the result panel is open, keys go to the panel only.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.panel.is_some() {
            return self.handle_panel_key(key);
        }

        match key.code {
            KeyCode::Tab => {
                self.blur();
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab => {
                self.blur();
                self.form.focus_prev();
                Action::None
            }
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Action::None
            }
            KeyCode::Char(ch) => {
                self.form.insert_char(ch);
                Action::None
            }
            KeyCode::Backspace => {
                self.form.delete_char();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => Action::Quit,
            KeyCode::F(1) => Action::Navigate(Screen::Help),
            _ => Action::None,
        }
    }

    fn handle_panel_key(&mut self, key: KeyEvent) -> Action {
        let Some(panel) = self.panel.take() else {
            return Action::None;
        };
        match (panel, key.code) {
            (ResultPanel::NotMatched { request }, KeyCode::Enter | KeyCode::Char('y')) => {
                self.panel = Some(ResultPanel::NotMatched { request }.override_match());
                Action::None
            }
            (ResultPanel::NotMatched { .. }, KeyCode::Esc | KeyCode::Char('r')) => Action::None,
            (matched @ ResultPanel::Matched { .. }, KeyCode::Enter | KeyCode::Esc) => {
                matched.confirm().map_or(Action::None, Action::Complete)
            }
            (panel, _) => {
                self.panel = Some(panel);
                Action::None
            }
        }
    }

    /// Re-validates the focused field as focus leaves it.
    fn blur(&mut self) {
        let index = self.form.focus();
        if let Some(&field) = TripField::ALL.get(index) {
            self.validate_field(field);
        }
    }

    /// Runs one field's rule and updates only that field's error.
    fn validate_field(&mut self, field: TripField) {
        let index = row(field);
        match field.check(self.form.value(index)) {
            Ok(()) => self.form.clear_error(index),
            Err(e) => self.form.set_error(index, e.to_string()),
        }
    }

    /// Validates every field and, if all pass, asks the app to look the flight up.
    fn submit(&mut self) -> Action {
        self.general_error = None;
        self.form.clear_errors();

        let request = self.request();
        for (field, err) in request.validate() {
            self.form.set_error(row(field), err.to_string());
        }

        if self.form.has_errors() {
            return Action::None;
        }
        Action::Lookup(request)
    }

    /// The current field values as a [`TripRequest`].
    pub fn request(&self) -> TripRequest {
        let value = |field| self.form.value(row(field)).to_string();
        TripRequest {
            airport: value(TripField::Airport),
            flight: value(TripField::Flight),
            name: value(TripField::Name),
            tel: value(TripField::Tel),
            identity: value(TripField::Identity),
            ride_notes: value(TripField::RideNotes),
        }
    }

    /// Returns a reference to the form for rendering.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The focused field.
    pub fn focused_field(&self) -> Option<TripField> {
        TripField::ALL.get(self.form.focus()).copied()
    }

    /// Shows the lookup result, replacing any panel already open.
    ///
    /// Clears a lookup failure left by an earlier submit.
    pub fn open_panel(&mut self, panel: ResultPanel) {
        self.general_error = None;
        self.panel = Some(panel);
    }

    /// Returns the open result panel, if any.
    pub fn panel(&self) -> Option<&ResultPanel> {
        self.panel.as_ref()
    }

    /// Sets an error message not tied to any specific field.
    ///
    /// Used to surface lookup failures inline.
    pub fn set_error(&mut self, msg: String) {
        self.general_error = Some(msg);
    }

    /// Returns the general error message, if any.
    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }
}

/// Renders the trip request screen, with the result panel on top when open.
#[mutants::skip]
pub fn draw_trip_form(
    state: &TripFormState,
    status: &StatusBarContext,
    frame: &mut Frame,
    area: Rect,
) {
    let [status_area, content_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    draw_status_bar(status, frame, status_area);

    let block = Block::default()
        .title(" Airport Drop-off Trip ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(content_area);
    frame.render_widget(block, content_area);

    let form_height = FIELD_ROW_HEIGHT * TripField::ALL.len() as u16;
    let [form_area, error_area, _spacer, footer_area] = Layout::vertical([
        Constraint::Length(form_height),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    draw_form(state.form(), frame, form_area);

    if let Some(err) = state.general_error() {
        let error = Paragraph::new(Line::from(Span::styled(
            err,
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(error, error_area);
    }

    let footer = Paragraph::new(Line::from(
        "Tab/Shift+Tab: next/prev  Enter: next step  F1: help  Esc: quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);

    if let Some(panel) = state.panel() {
        draw_result_panel(panel, frame, area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::lookup::Departure;

    const AIRPORT: &str = "Taoyuan International Airport Terminal 1";

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn shift_press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_string(state: &mut TripFormState, s: &str) {
        for ch in s.chars() {
            state.handle_key(press(KeyCode::Char(ch)));
        }
    }

    /// Fills flight, name, tel and identity (leaving notes empty); focus ends on Identity.
    fn fill_form(state: &mut TripFormState, flight: &str, name: &str, tel: &str, identity: &str) {
        type_string(state, flight);
        state.handle_key(press(KeyCode::Tab));
        type_string(state, name);
        state.handle_key(press(KeyCode::Tab));
        type_string(state, tel);
        state.handle_key(press(KeyCode::Tab));
        type_string(state, identity);
    }

    fn fill_valid_form(state: &mut TripFormState) {
        fill_form(state, "CI123", "Lin Mei", "0912345678", "A123456789");
    }

    fn error_of(state: &TripFormState, field: TripField) -> Option<&str> {
        state.form().fields()[row(field)].error.as_deref()
    }

    fn departure(airline: &str, number: &str) -> Departure {
        serde_json::from_str(&format!(
            r#"{{"AirlineID":"{airline}","FlightNumber":"{number}"}}"#
        ))
        .unwrap()
    }

    /// Submits a valid form and returns the request the lookup was asked for.
    fn submit_valid(state: &mut TripFormState) -> TripRequest {
        fill_valid_form(state);
        match state.handle_key(press(KeyCode::Enter)) {
            Action::Lookup(request) => request,
            other => panic!("expected Lookup, got {other:?}"),
        }
    }

    mod typing {
        use super::*;

        #[test]
        fn focus_starts_on_flight() {
            let state = TripFormState::new(AIRPORT);
            assert_eq!(state.focused_field(), Some(TripField::Flight));
        }

        #[test]
        fn chars_fill_focused_field() {
            let mut state = TripFormState::new(AIRPORT);
            type_string(&mut state, "CI1");
            assert_eq!(state.form().value(row(TripField::Flight)), "CI1");
        }

        #[test]
        fn flight_is_not_uppercased() {
            let mut state = TripFormState::new(AIRPORT);
            type_string(&mut state, "ci123");
            assert_eq!(state.request().flight, "ci123");
        }

        #[test]
        fn backspace_deletes_char() {
            let mut state = TripFormState::new(AIRPORT);
            type_string(&mut state, "AB");
            state.handle_key(press(KeyCode::Backspace));
            assert_eq!(state.request().flight, "A");
        }

        #[test]
        fn control_chars_are_not_inserted() {
            let mut state = TripFormState::new(AIRPORT);
            let ctrl_a = KeyEvent {
                modifiers: KeyModifiers::CONTROL,
                ..press(KeyCode::Char('a'))
            };
            state.handle_key(ctrl_a);
            assert_eq!(state.request().flight, "");
        }

        #[test]
        fn ride_notes_take_free_text() {
            let mut state = TripFormState::new(AIRPORT);
            for _ in 0..4 {
                state.handle_key(press(KeyCode::Tab));
            }
            assert_eq!(state.focused_field(), Some(TripField::RideNotes));
            type_string(&mut state, "2 bags & a stroller!");
            assert_eq!(state.request().ride_notes, "2 bags & a stroller!");
        }
    }

    mod airport_field {
        use super::*;

        #[test]
        fn shows_configured_label() {
            let state = TripFormState::new(AIRPORT);
            assert_eq!(state.request().airport, AIRPORT);
        }

        #[test]
        fn is_never_focused() {
            let mut state = TripFormState::new(AIRPORT);
            for _ in 0..12 {
                state.handle_key(press(KeyCode::Tab));
                assert_ne!(state.focused_field(), Some(TripField::Airport));
            }
            for _ in 0..12 {
                state.handle_key(shift_press(KeyCode::BackTab));
                assert_ne!(state.focused_field(), Some(TripField::Airport));
            }
        }

        #[test]
        fn tab_wraps_from_notes_to_flight() {
            let mut state = TripFormState::new(AIRPORT);
            for _ in 0..5 {
                state.handle_key(press(KeyCode::Tab));
            }
            assert_eq!(state.focused_field(), Some(TripField::Flight));
        }
    }

    mod blur_validation {
        use super::*;

        #[test]
        fn leaving_invalid_field_flags_it() {
            let mut state = TripFormState::new(AIRPORT);
            type_string(&mut state, "CI-123");
            state.handle_key(press(KeyCode::Tab));
            assert_eq!(
                error_of(&state, TripField::Flight),
                Some("only English letters and digits allowed")
            );
        }

        #[test]
        fn only_the_left_field_is_checked() {
            let mut state = TripFormState::new(AIRPORT);
            type_string(&mut state, "CI123");
            state.handle_key(press(KeyCode::Tab));
            // Tel and identity are empty (invalid) but have not been visited.
            assert!(!state.form().has_errors());
        }

        #[test]
        fn empty_name_passes_on_blur() {
            let mut state = TripFormState::new(AIRPORT);
            state.handle_key(press(KeyCode::Tab)); // flight -> name (flight empty, flagged)
            state.handle_key(press(KeyCode::Tab)); // name -> tel
            assert_eq!(error_of(&state, TripField::Name), None);
            assert!(error_of(&state, TripField::Flight).is_some());
        }

        #[test]
        fn backtab_also_validates() {
            let mut state = TripFormState::new(AIRPORT);
            state.handle_key(press(KeyCode::Tab)); // name
            type_string(&mut state, "R2 D2");
            state.handle_key(shift_press(KeyCode::BackTab));
            assert_eq!(
                error_of(&state, TripField::Name),
                Some("only English letters and spaces allowed")
            );
        }

        #[test]
        fn fixing_field_clears_error_on_next_blur() {
            let mut state = TripFormState::new(AIRPORT);
            state.handle_key(press(KeyCode::Tab)); // name
            state.handle_key(press(KeyCode::Tab)); // tel
            type_string(&mut state, "09-12");
            state.handle_key(press(KeyCode::Tab));
            assert_eq!(error_of(&state, TripField::Tel), Some("only digits allowed"));

            state.handle_key(shift_press(KeyCode::BackTab)); // back to tel
            for _ in 0..5 {
                state.handle_key(press(KeyCode::Backspace));
            }
            type_string(&mut state, "0912");
            state.handle_key(press(KeyCode::Tab));
            assert_eq!(error_of(&state, TripField::Tel), None);
        }

        #[test]
        fn ride_notes_never_flagged() {
            let mut state = TripFormState::new(AIRPORT);
            for _ in 0..4 {
                state.handle_key(press(KeyCode::Tab));
            }
            type_string(&mut state, "@@@ ###");
            state.handle_key(press(KeyCode::Tab));
            assert_eq!(error_of(&state, TripField::RideNotes), None);
        }
    }

    mod submit {
        use super::*;

        #[test]
        fn valid_form_requests_lookup() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            assert_eq!(
                request,
                TripRequest {
                    airport: AIRPORT.into(),
                    flight: "CI123".into(),
                    name: "Lin Mei".into(),
                    tel: "0912345678".into(),
                    identity: "A123456789".into(),
                    ride_notes: String::new(),
                }
            );
            assert!(state.panel().is_none(), "panel opens only after the response");
        }

        #[test]
        fn empty_submit_flags_required_fields() {
            let mut state = TripFormState::new(AIRPORT);
            let action = state.handle_key(press(KeyCode::Enter));
            assert_eq!(action, Action::None);
            assert!(error_of(&state, TripField::Flight).is_some());
            assert!(error_of(&state, TripField::Tel).is_some());
            assert!(error_of(&state, TripField::Identity).is_some());
            assert_eq!(error_of(&state, TripField::Name), None);
            assert_eq!(error_of(&state, TripField::RideNotes), None);
        }

        #[test]
        fn any_invalid_field_blocks_lookup() {
            let cases = [
                ("CI 123", "Lin Mei", "0912345678", "A123456789"),
                ("CI123", "Lin Mei 2", "0912345678", "A123456789"),
                ("CI123", "Lin Mei", "0912-345", "A123456789"),
                ("CI123", "Lin Mei", "0912345678", "A12345678?"),
            ];
            for (flight, name, tel, identity) in cases {
                let mut state = TripFormState::new(AIRPORT);
                fill_form(&mut state, flight, name, tel, identity);
                let action = state.handle_key(press(KeyCode::Enter));
                assert_eq!(
                    action,
                    Action::None,
                    "{flight}/{name}/{tel}/{identity} should be blocked"
                );
                assert!(state.form().has_errors());
            }
        }

        #[test]
        fn errors_cleared_on_resubmit() {
            let mut state = TripFormState::new(AIRPORT);
            state.handle_key(press(KeyCode::Enter));
            assert!(state.form().has_errors());
            fill_valid_form(&mut state);
            let action = state.handle_key(press(KeyCode::Enter));
            assert!(matches!(action, Action::Lookup(_)));
            assert!(!state.form().has_errors());
        }

        #[test]
        fn submit_clears_general_error() {
            let mut state = TripFormState::new(AIRPORT);
            state.set_error("Flight lookup failed: timeout".into());
            submit_valid(&mut state);
            assert_eq!(state.general_error(), None);
        }

        #[test]
        fn open_panel_clears_general_error() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.set_error("Flight lookup failed: HTTP 502".into());
            state.open_panel(ResultPanel::from_lookup(request, None));
            assert_eq!(state.general_error(), None);
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn esc_quits() {
            let mut state = TripFormState::new(AIRPORT);
            assert_eq!(state.handle_key(press(KeyCode::Esc)), Action::Quit);
        }

        #[test]
        fn f1_opens_help() {
            let mut state = TripFormState::new(AIRPORT);
            assert_eq!(
                state.handle_key(press(KeyCode::F(1))),
                Action::Navigate(Screen::Help)
            );
        }

        #[test]
        fn unhandled_key_returns_none() {
            let mut state = TripFormState::new(AIRPORT);
            assert_eq!(state.handle_key(press(KeyCode::F(5))), Action::None);
        }
    }

    mod panel {
        use super::*;

        #[test]
        fn matched_panel_closes_with_confirmation() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(
                request.clone(),
                Some(departure("CI", "123")),
            ));

            match state.handle_key(press(KeyCode::Enter)) {
                Action::Complete(confirmation) => {
                    assert!(confirmation.verified);
                    assert_eq!(confirmation.request, request);
                }
                other => panic!("expected Complete, got {other:?}"),
            }
            assert!(state.panel().is_none());
        }

        #[test]
        fn override_marks_matched_without_new_lookup() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(request, None));

            let action = state.handle_key(press(KeyCode::Enter));
            assert_eq!(action, Action::None, "override must not trigger a lookup");
            assert!(state.panel().is_some_and(ResultPanel::is_matched));

            match state.handle_key(press(KeyCode::Esc)) {
                Action::Complete(confirmation) => assert!(!confirmation.verified),
                other => panic!("expected Complete, got {other:?}"),
            }
        }

        #[test]
        fn y_also_overrides() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(request, None));
            state.handle_key(press(KeyCode::Char('y')));
            assert!(state.panel().is_some_and(ResultPanel::is_matched));
        }

        #[test]
        fn re_enter_closes_panel_and_keeps_values() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(request.clone(), None));

            let action = state.handle_key(press(KeyCode::Esc));
            assert_eq!(action, Action::None, "re-enter must not quit");
            assert!(state.panel().is_none());
            assert_eq!(state.request(), request);

            // The form is editable again.
            state.handle_key(press(KeyCode::Char('4')));
            assert_eq!(state.request().identity, "A1234567894");
        }

        #[test]
        fn r_also_re_enters() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(request, None));
            state.handle_key(press(KeyCode::Char('r')));
            assert!(state.panel().is_none());
        }

        #[test]
        fn other_keys_are_swallowed_while_open() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(request.clone(), None));

            state.handle_key(press(KeyCode::Char('x')));
            state.handle_key(press(KeyCode::Tab));
            assert_eq!(
                state.panel(),
                Some(&ResultPanel::NotMatched { request: request.clone() })
            );
            assert_eq!(state.request(), request);
        }
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        fn render(state: &TripFormState) -> String {
            let backend = TestBackend::new(80, 30);
            let mut terminal = Terminal::new(backend).unwrap();
            let status = StatusBarContext {
                airport_code: "TPE".into(),
                ..StatusBarContext::default()
            };
            terminal
                .draw(|frame| draw_trip_form(state, &status, frame, frame.area()))
                .unwrap();
            buffer_to_string(terminal.backend().buffer())
        }

        #[test]
        fn renders_title_fields_and_airport() {
            let output = render(&TripFormState::new(AIRPORT));
            assert!(output.contains("Airport Drop-off Trip"));
            assert!(output.contains("Flight Number"));
            assert!(output.contains("ID / Passport Number"));
            assert!(output.contains(AIRPORT));
            assert!(output.contains("[TPE]"));
        }

        #[test]
        fn renders_footer() {
            let output = render(&TripFormState::new(AIRPORT));
            assert!(output.contains("Enter: next step"));
        }

        #[test]
        fn renders_field_error() {
            let mut state = TripFormState::new(AIRPORT);
            state.handle_key(press(KeyCode::Enter));
            let output = render(&state);
            assert!(output.contains("only digits allowed"));
        }

        #[test]
        fn renders_general_error() {
            let mut state = TripFormState::new(AIRPORT);
            state.set_error("Flight lookup failed: HTTP 503".into());
            let output = render(&state);
            assert!(output.contains("Flight lookup failed"));
        }

        #[test]
        fn renders_not_matched_panel_over_form() {
            let mut state = TripFormState::new(AIRPORT);
            let request = submit_valid(&mut state);
            state.open_panel(ResultPanel::from_lookup(request, None));
            let output = render(&state);
            assert!(output.contains("CI123"));
            assert!(output.contains("not found"));
        }
    }
}
