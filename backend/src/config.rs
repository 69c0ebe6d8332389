//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from `CUSTOMERS_*` environment variables or a configuration
//! file; command-line flags belong to the binary and are parsed separately.

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Prefix of issued customer numbers when none is configured.
pub const DEFAULT_NUMBER_PREFIX: &str = "CUS";

/// First customer number sequence value when none is configured.
pub const DEFAULT_SEQUENCE_START: u64 = 100_000;

/// Problems turning raw settings into usable values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or merged.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader diagnostic.
        message: String,
    },
    /// The log format is neither `json` nor `pretty`.
    #[error("unknown log format '{value}', expected 'json' or 'pretty'")]
    UnknownLogFormat {
        /// Rejected value.
        value: String,
    },
    /// The customer number prefix contains something other than ASCII
    /// letters.
    #[error("customer number prefix '{value}' must consist of ASCII letters")]
    InvalidNumberPrefix {
        /// Rejected value.
        value: String,
    },
}

/// Log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable lines.
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::UnknownLogFormat {
                value: value.to_owned(),
            }),
        }
    }
}

/// Settings for the customer script runner.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CUSTOMERS")]
pub struct CustomerSettings {
    /// Prefix of issued customer numbers.
    pub number_prefix: Option<String>,
    /// First value of the customer number sequence.
    pub sequence_start: Option<u64>,
    /// `json` or `pretty`.
    pub log_format: Option<String>,
    /// Script run when no path is given on the command line.
    pub script: Option<PathBuf>,
}

impl CustomerSettings {
    /// Load settings from the environment and configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source is malformed.
    pub fn load(program: impl Into<OsString>) -> Result<Self, ConfigError> {
        Self::load_from_iter([program.into()]).map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Configured customer number prefix, upper-cased, or the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumberPrefix`] when the prefix is blank
    /// or not purely alphabetic.
    pub fn number_prefix(&self) -> Result<String, ConfigError> {
        let raw = self
            .number_prefix
            .as_deref()
            .unwrap_or(DEFAULT_NUMBER_PREFIX)
            .trim();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidNumberPrefix {
                value: raw.to_owned(),
            });
        }
        Ok(raw.to_ascii_uppercase())
    }

    /// Configured sequence start, or the default.
    #[must_use]
    pub fn sequence_start(&self) -> u64 {
        self.sequence_start.unwrap_or(DEFAULT_SEQUENCE_START)
    }

    /// Configured log format, or the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLogFormat`] for unrecognised values.
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        self.log_format
            .as_deref()
            .map_or(Ok(LogFormat::default()), LogFormat::from_str)
    }
}
