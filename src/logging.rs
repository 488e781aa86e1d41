//! Diagnostic logging to a file.
//!
//! The terminal belongs to the TUI, so events are written (without ANSI
//! colours) to the file named by [`Config::log_path`](crate::config::Config::log_path).
//! `RUST_LOG` takes precedence over the configured level.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Installs the global subscriber, appending to the configured log file.
///
/// Returns the path being written to. Calling this more than once keeps the
/// first subscriber.
pub fn init_logging(config: &Config) -> io::Result<PathBuf> {
    let path = config.log_path();
    let file = open_log_file(&path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.logging.level)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true),
    );
    let _ = subscriber.try_init();
    Ok(path)
}

/// Filter directive scoping `level` to this crate.
fn default_directive(level: &str) -> String {
    format!("tripform={level}")
}

/// Opens `path` for appending, creating it and its parent directory if needed.
fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
