//! Controller configuration.
//!
//! [`SafeConfig`] is plain serde data with defaults for every field, so a
//! partial JSON document (or none at all) is enough to start the safe.
//!
//! # Examples
//!
//! ```
//! use safebox_core::SafeConfig;
//!
//! let config = SafeConfig::from_json_str(r#"{ "user_pin": "2468" }"#).unwrap();
//! assert_eq!(config.user_pin, "2468");
//! assert_eq!(config.max_attempts, 3);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DISPLAY_COLUMNS, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_USER_PIN,
};
use crate::{Error, Pin, Result};

/// Runtime configuration for the safe controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeConfig {
    /// User PIN installed at startup.
    pub user_pin: String,

    /// Failed attempts before lockout.
    pub max_attempts: u32,

    /// Delay between keypad polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Character columns per display row.
    pub display_columns: usize,
}

impl Default for SafeConfig {
    fn default() -> Self {
        Self {
            user_pin: DEFAULT_USER_PIN.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            display_columns: DEFAULT_DISPLAY_COLUMNS,
        }
    }
}

impl SafeConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed JSON and `Error::Config` for
    /// values rejected by [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SafeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, otherwise the errors
    /// of [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Set the user PIN.
    pub fn with_user_pin(mut self, user_pin: impl Into<String>) -> Self {
        self.user_pin = user_pin.into();
        self
    }

    /// Set the lockout threshold.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    /// Returns `Error::Config` if the user PIN is not 4 characters, the
    /// lockout threshold is zero, the poll interval is zero or the display
    /// has no columns.
    pub fn validate(&self) -> Result<()> {
        Pin::new(&self.user_pin).map_err(|e| Error::Config(format!("user_pin: {e}")))?;

        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.display_columns == 0 {
            return Err(Error::Config(
                "display_columns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured user PIN.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the configured value has the wrong length.
    pub fn user_pin(&self) -> Result<Pin> {
        Pin::new(&self.user_pin)
    }

    /// The poll interval as a `Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
