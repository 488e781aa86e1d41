use crate::config::ConfigError;
use crate::lookup::LookupError;

/// Errors that can occur in the TUI layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The departure board client could not be built.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),
}
