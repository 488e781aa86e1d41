//! Reusable TUI widgets.

pub mod form;
pub mod status_bar;

pub use form::{FIELD_ROW_HEIGHT, Form, FormField, draw_form};
pub use status_bar::{StatusBarContext, draw_status_bar};
