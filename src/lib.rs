#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Airport drop-off trip request form with live flight verification.

pub mod config;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod tui;
