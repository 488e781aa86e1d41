//! Actions returned by screen event handlers.

use crate::model::TripRequest;

use super::app::Screen;
use super::screens::Confirmation;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to start lookups, record confirmations and
/// navigate between screens.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Check the validated request's flight against the departure board.
    Lookup(TripRequest),
    /// The user closed a confirmed result panel.
    Complete(Confirmation),
    /// Quit the application.
    Quit,
}
