//! TUI screen implementations.

pub mod help;
pub mod result_panel;
pub mod trip_form;

pub use help::{HelpState, draw_help};
pub use result_panel::{Confirmation, ResultPanel, draw_result_panel};
pub use trip_form::{TripFormState, draw_trip_form};
