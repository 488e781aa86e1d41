//! Flight lookup against the airport's real-time departure board (FIDS).
//!
//! The board is fetched as a JSON list and scanned linearly for a row
//! whose carrier code plus flight number equals the submitted flight.

mod client;
mod departure;
mod error;

pub use client::DepartureClient;
pub use departure::{Departure, find_departure, flight_exists};
pub use error::LookupError;
