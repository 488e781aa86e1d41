//! Configuration loading via figment.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file at
//! `~/.config/tripform/config.toml`, then `TRIPFORM_` environment
//! variables with `__` separating nested keys
//! (e.g. `TRIPFORM_LOOKUP__AIRPORT_CODE=KHH`).

use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name used under the platform config and data directories.
const APP_DIR_NAME: &str = "tripform";

/// Default diagnostic log file name.
const LOG_FILE_NAME: &str = "tripform.log";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// The merged configuration holds an unusable value.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Description of the offending value.
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Departure board lookup.
    pub lookup: LookupConfig,
    /// Form presentation.
    pub form: FormConfig,
    /// Diagnostic logging.
    pub logging: LoggingConfig,
}

/// Where and how to fetch the departure board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the FIDS departure endpoint, without the airport code.
    pub endpoint: String,
    /// IATA code of the departure airport.
    pub airport_code: String,
    /// Field the board is ordered by.
    pub order_by: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Form presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Text shown in the read-only airport field.
    pub airport_label: String,
}

/// Diagnostic log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path. Defaults to `~/.local/share/tripform/tripform.log`.
    pub path: Option<PathBuf>,
    /// Default level for this crate when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://tdx.transportdata.tw/api/basic/v2/Air/FIDS/Airport/Departure"
                .to_string(),
            airport_code: "TPE".to_string(),
            order_by: "ScheduleDepartureTime".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            airport_label: "Taoyuan International Airport Terminal 1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            path: None,
            level: "info".to_string(),
        }
    }
}

impl LookupConfig {
    /// Full departure board URL for the configured airport.
    pub fn departures_url(&self) -> String {
        format!(
            "{}/{}?$orderby={}&$format=JSON",
            self.endpoint.trim_end_matches('/'),
            self.airport_code,
            self.order_by
        )
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Loads configuration from the default file location and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration with an optional custom config file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TRIPFORM_").split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Default data directory, home of the diagnostic log.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    /// Log file path, resolving the default if unset.
    pub fn log_path(&self) -> PathBuf {
        self.logging
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LOG_FILE_NAME))
    }

    /// Checks values that would otherwise fail late (at lookup time).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lookup = &self.lookup;
        if !(lookup.endpoint.starts_with("http://") || lookup.endpoint.starts_with("https://")) {
            return Err(invalid(format!(
                "lookup.endpoint must be an http(s) URL, got {:?}",
                lookup.endpoint
            )));
        }

        let code_ok = (3..=4).contains(&lookup.airport_code.len())
            && lookup
                .airport_code
                .chars()
                .all(|c| c.is_ascii_alphanumeric());
        if !code_ok {
            return Err(invalid(format!(
                "lookup.airport_code must be 3-4 letters or digits, got {:?}",
                lookup.airport_code
            )));
        }

        if lookup.order_by.trim().is_empty() {
            return Err(invalid("lookup.order_by must not be empty".to_string()));
        }

        if lookup.timeout_secs == 0 {
            return Err(invalid(
                "lookup.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.form.airport_label.trim().is_empty() {
            return Err(invalid("form.airport_label must not be empty".to_string()));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(invalid(format!(
                "logging.level must be one of trace, debug, info, warn, error, got {:?}",
                self.logging.level
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}
