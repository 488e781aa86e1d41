//! Lookup result panel, shown once the departure board answers.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::lookup::Departure;
use crate::model::TripRequest;

/// Check-mark colour on the success panel.
const SUCCESS_COLOR: Color = Color::Rgb(0x21, 0xae, 0xd2);

/// A trip request the user has finished with.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub request: TripRequest,
    /// `false` when the user overrode a failed match.
    pub verified: bool,
    /// The matching departure board row, when verified.
    pub departure: Option<Departure>,
    pub confirmed_at: DateTime<Utc>,
}

/// The two states of the result panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    /// The flight is on the board, or the user chose to proceed anyway.
    Matched {
        request: TripRequest,
        departure: Option<Departure>,
        verified: bool,
    },
    /// No departure with the submitted flight code.
    NotMatched { request: TripRequest },
}

impl ResultPanel {
    /// Builds the panel for a finished lookup.
    pub fn from_lookup(request: TripRequest, found: Option<Departure>) -> Self {
        match found {
            Some(departure) => Self::Matched {
                request,
                departure: Some(departure),
                verified: true,
            },
            None => Self::NotMatched { request },
        }
    }

    /// Returns `true` for the `Matched` state.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// The request this panel is about.
    pub fn request(&self) -> &TripRequest {
        match self {
            Self::Matched { request, .. } | Self::NotMatched { request } => request,
        }
    }

    /// Accepts an unmatched flight as-is. A matched panel is returned unchanged.
    pub fn override_match(self) -> Self {
        match self {
            Self::NotMatched { request } => {
                tracing::warn!(flight = %request.flight, "unverified flight accepted by override");
                Self::Matched {
                    request,
                    departure: None,
                    verified: false,
                }
            }
            matched => matched,
        }
    }

    /// Turns a matched panel into a [`Confirmation`]; `None` while unmatched.
    pub fn confirm(self) -> Option<Confirmation> {
        match self {
            Self::Matched {
                request,
                departure,
                verified,
            } => Some(Confirmation {
                request,
                verified,
                departure,
                confirmed_at: Utc::now(),
            }),
            Self::NotMatched { .. } => None,
        }
    }
}

fn departure_lines(departure: &Departure) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let rows = [
        ("Departs", departure.schedule_departure_time.as_deref()),
        ("To", departure.arrival_airport_id.as_deref()),
        ("Terminal", departure.terminal.as_deref()),
        ("Gate", departure.gate.as_deref()),
        ("Status", departure.departure_remark.as_deref()),
    ];
    rows.into_iter()
        .filter_map(|(name, value)| {
            value.map(|v| {
                Line::from(vec![
                    Span::styled(format!("{name:<9}"), label),
                    Span::raw(v.to_string()),
                ])
            })
        })
        .collect()
}

fn matched_lines(
    request: &TripRequest,
    departure: Option<&Departure>,
    verified: bool,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "\u{2714}",
            Style::default()
                .fg(SUCCESS_COLOR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Trip request complete"),
        Line::from(Span::styled(
            format!("Flight {}", request.flight),
            Style::default().fg(Color::White),
        )),
    ];
    if !verified {
        lines.push(Line::from(Span::styled(
            "(flight not found on today's departures)",
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(departure) = departure {
        lines.push(Line::from(""));
        lines.extend(departure_lines(departure));
    }
    lines
}

fn not_matched_lines(request: &TripRequest) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Flight \u{201c}{}\u{201d} not found", request.flight),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            "Please check the flight number and departure time. You can also \
             submit this flight as your airport transfer details anyway.",
        ),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Confirm flight details and submit",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            "[Esc] Re-enter",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Renders the panel centered over `area`, clearing what is beneath it.
#[mutants::skip]
pub fn draw_result_panel(panel: &ResultPanel, frame: &mut Frame, area: Rect) {
    let (title, lines, footer) = match panel {
        ResultPanel::Matched {
            request,
            departure,
            verified,
        } => (
            " Confirmed ",
            matched_lines(request, departure.as_ref(), *verified),
            "Enter/Esc: close",
        ),
        ResultPanel::NotMatched { request } => (
            " Flight Not Found ",
            not_matched_lines(request),
            "Enter/y: submit anyway  Esc/r: re-enter",
        ),
    };

    let width = 56.min(area.width);
    let inner_width = width.saturating_sub(2).max(1);
    // Wrapped body rows, plus one row of slack for word-boundary wrapping.
    let body_rows = lines
        .iter()
        .map(|line| {
            u16::try_from(line.width())
                .unwrap_or(u16::MAX)
                .div_ceil(inner_width)
                .max(1)
        })
        .fold(1_u16, u16::saturating_add);
    let height = body_rows.saturating_add(3).min(area.height);
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [body_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, body_area);
    frame.render_widget(
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_area,
    );
}
