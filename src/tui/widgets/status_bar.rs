//! Status bar widget: one-line airport and lookup progress display.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// IATA code of the airport whose departures are checked.
    pub airport_code: String,
    /// Flight currently being looked up, if a request is in flight.
    pub checking: Option<String>,
    /// Flight of the last completed trip request and whether it was verified.
    pub submitted: Option<(String, bool)>,
}

/// Renders a one-line status bar.
///
/// Display format (left-aligned):
/// - Lookup in flight:     `[TPE]  Checking CI123…`  (Yellow)
/// - Verified and closed:  `[TPE]  Submitted CI123`  (Green)
/// - Submitted by override: `[TPE]  Submitted CI123 (unverified)`  (Yellow)
/// - Otherwise:            `[TPE]`
///
/// A pending lookup takes precedence over the last submission. Renders
/// nothing if `ctx.airport_code` is empty.
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    if ctx.airport_code.is_empty() {
        return;
    }

    let cyan = Style::default().fg(Color::Cyan);
    let yellow = Style::default().fg(Color::Yellow);
    let green = Style::default().fg(Color::Green);

    let mut spans = vec![Span::styled(format!("[{}]", ctx.airport_code), cyan)];

    if let Some(flight) = &ctx.checking {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("Checking {flight}\u{2026}"), yellow));
    } else if let Some((flight, verified)) = &ctx.submitted {
        spans.push(Span::raw("  "));
        if *verified {
            spans.push(Span::styled(format!("Submitted {flight}"), green));
        } else {
            spans.push(Span::styled(
                format!("Submitted {flight} (unverified)"),
                yellow,
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
