//! Configuration
//!
//! Cart settings read from an optional YAML file. Every field has a default, so
//! an empty file (or no file at all) is a valid configuration.

use std::{fs, path::Path};

use jiff::SignedDuration;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::LineIdentity, notifications::NotificationTiming, slideshow::DEFAULT_INTERVAL,
    store::DEFAULT_STORAGE_KEY,
};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Cart settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CartConfig {
    /// Storage key the cart is persisted under
    pub storage_key: String,

    /// ISO currency code used to display prices
    pub currency: String,

    /// How card adds derive line ids
    pub line_identity: LineIdentity,

    /// Notification timing
    pub notification: NotificationConfig,

    /// Slideshow timing
    pub slideshow: SlideshowConfig,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: "USD".to_string(),
            line_identity: LineIdentity::default(),
            notification: NotificationConfig::default(),
            slideshow: SlideshowConfig::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_norway::from_str(contents)?)
    }

    /// Resolve the display currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not an ISO 4217 currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.to_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }
}

/// Notification timing in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Fully visible period
    pub visible_ms: u64,

    /// Fade-out period
    pub fade_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            visible_ms: 2500,
            fade_ms: 300,
        }
    }
}

impl NotificationConfig {
    /// Timing for a [`Notifier`](crate::notifications::Notifier).
    #[must_use]
    pub fn timing(&self) -> NotificationTiming {
        NotificationTiming {
            visible: millis(self.visible_ms),
            fade: millis(self.fade_ms),
        }
    }
}

/// Slideshow timing in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Time each image is shown while cycling
    pub interval_ms: u64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_ms: u64::try_from(DEFAULT_INTERVAL.as_millis()).unwrap_or(3000),
        }
    }
}

impl SlideshowConfig {
    /// Interval for a [`Slideshow`](crate::slideshow::Slideshow).
    #[must_use]
    pub fn interval(&self) -> SignedDuration {
        millis(self.interval_ms)
    }
}

fn millis(value: u64) -> SignedDuration {
    SignedDuration::from_millis(i64::try_from(value).unwrap_or(i64::MAX))
}
