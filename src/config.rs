//! Application configuration.
//!
//! Values come from a TOML file, then from `TICTACTOE_*` environment
//! variables, then from command-line flags, each layer overriding the last.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tictactoe_server::ClientVariant;
use tictactoe_session::MAX_DIMENSION;
use tracing::{debug, info, instrument, warn};

use crate::tui::LayoutConfig;

/// File looked for in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "tictactoe.toml";

/// Widest grid line the layout accepts, in terminal cells.
pub const MAX_LAYOUT_GAP: u16 = 4;

/// Largest border the layout accepts, in terminal cells.
pub const MAX_LAYOUT_PADDING: u16 = 16;

/// Largest cell side the layout accepts, in terminal cells.
pub const MAX_LAYOUT_CELL: u16 = 64;

/// Settings for both the server and the terminal client.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    /// Address the session server binds to.
    #[serde(default = "default_host")]
    #[setters(into)]
    host: String,

    /// Port the session server binds to.
    #[serde(default = "default_port")]
    port: u16,

    /// JSON file backing the session record.
    #[serde(default = "default_store_path")]
    #[setters(into)]
    store_path: PathBuf,

    /// Session server the client talks to.
    #[serde(default = "default_server_url")]
    #[setters(into)]
    server_url: String,

    /// Client flavour.
    #[serde(default)]
    variant: ClientVariant,

    /// Starting board dimension (the stateful client uses the stored one).
    #[serde(default = "default_dimension")]
    dimension: usize,

    /// Largest dimension the client may resize to.
    #[serde(default = "default_max_dimension")]
    max_dimension: usize,

    /// Pause before a finished game's result is announced.
    #[serde(default = "default_reveal_delay_ms")]
    reveal_delay_ms: u64,

    /// Where the terminal client writes its log.
    #[serde(default = "default_log_file")]
    #[setters(into)]
    log_file: PathBuf,

    /// Board presentation.
    #[serde(default)]
    layout: LayoutConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("tictactoe_session.json")
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_dimension() -> usize {
    3
}

fn default_max_dimension() -> usize {
    MAX_DIMENSION as usize
}

fn default_reveal_delay_ms() -> u64 {
    500
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictactoe_tui.log")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store_path: default_store_path(),
            server_url: default_server_url(),
            variant: ClientVariant::default(),
            dimension: default_dimension(),
            max_dimension: default_max_dimension(),
            reveal_delay_ms: default_reveal_delay_ms(),
            log_file: default_log_file(),
            layout: LayoutConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// the values are out of range.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(variant = %config.variant, dimension = config.dimension, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else the defaults. Environment overrides are applied afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file was found but is unusable.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `TICTACTOE_SERVER_URL`, `TICTACTOE_STORE_PATH` and
    /// `TICTACTOE_REVEAL_DELAY_MS` as looked up through `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("TICTACTOE_SERVER_URL") {
            debug!(%url, "Server URL from environment");
            self.server_url = url;
        }
        if let Some(path) = lookup("TICTACTOE_STORE_PATH") {
            debug!(%path, "Store path from environment");
            self.store_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("TICTACTOE_REVEAL_DELAY_MS") {
            match raw.parse() {
                Ok(ms) => self.reveal_delay_ms = ms,
                Err(e) => warn!(%raw, error = %e, "Ignoring bad TICTACTOE_REVEAL_DELAY_MS"),
            }
        }
        self
    }

    /// Checks that the dimensions and board layout are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ceiling = MAX_DIMENSION as usize;
        if self.max_dimension == 0 || self.max_dimension > ceiling {
            return Err(ConfigError::new(format!(
                "max_dimension must be between 1 and {}, got {}",
                ceiling, self.max_dimension
            )));
        }
        if self.dimension == 0 || self.dimension > self.max_dimension {
            return Err(ConfigError::new(format!(
                "dimension must be between 1 and {}, got {}",
                self.max_dimension, self.dimension
            )));
        }
        self.validate_layout()
    }

    fn validate_layout(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if *layout.gap() > MAX_LAYOUT_GAP {
            return Err(ConfigError::new(format!(
                "layout.gap must be at most {}, got {}",
                MAX_LAYOUT_GAP,
                layout.gap()
            )));
        }
        if *layout.padding() > MAX_LAYOUT_PADDING {
            return Err(ConfigError::new(format!(
                "layout.padding must be at most {}, got {}",
                MAX_LAYOUT_PADDING,
                layout.padding()
            )));
        }
        let cells = [
            ("width", *layout.min_cell_width(), *layout.max_cell_width()),
            ("height", *layout.min_cell_height(), *layout.max_cell_height()),
        ];
        for (axis, min, max) in cells {
            if min == 0 || min > max || max > MAX_LAYOUT_CELL {
                return Err(ConfigError::new(format!(
                    "layout cell {} must satisfy 1 <= min <= max <= {}, got {}..{}",
                    axis, MAX_LAYOUT_CELL, min, max
                )));
            }
        }
        Ok(())
    }

    /// Reveal delay as a [`Duration`].
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
