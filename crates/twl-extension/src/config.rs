//! Extension configuration.
//!
//! Loaded once at startup and shared read-only afterwards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use twl_eligibility::{EligibilityThresholds, DEFAULT_MIN_ACCOUNT_AGE_DAYS, DEFAULT_MIN_EDIT_COUNT};

/// Default landing page for the primary notification link.
pub const DEFAULT_PRIMARY_URL: &str = "https://wikipedialibrary.wmflabs.org/";

/// Default page for the secondary notification link.
pub const DEFAULT_SECONDARY_URL: &str =
    "https://en.wikipedia.org/wiki/Wikipedia:The_Wikipedia_Library";

/// Configuration for the TWL extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TwlConfig {
    /// Whether page saves trigger eligibility checks at all
    pub send_notifications: bool,

    /// Minimum global edit count
    pub edit_count: u64,

    /// Minimum global account age, in days
    pub registration_days: u64,

    /// Primary link of the notification
    pub primary_url: String,

    /// Secondary link of the notification
    pub secondary_url: String,
}

impl Default for TwlConfig {
    fn default() -> Self {
        Self {
            send_notifications: true,
            edit_count: DEFAULT_MIN_EDIT_COUNT,
            registration_days: DEFAULT_MIN_ACCOUNT_AGE_DAYS,
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            secondary_url: DEFAULT_SECONDARY_URL.to_string(),
        }
    }
}

impl TwlConfig {
    /// Create config from environment variables with defaults.
    ///
    /// - `TWL_SEND_NOTIFICATIONS`
    /// - `TWL_EDIT_COUNT`
    /// - `TWL_REGISTRATION_DAYS`
    /// - `TWL_PRIMARY_URL`
    /// - `TWL_SECONDARY_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let send_notifications = match lookup("TWL_SEND_NOTIFICATIONS") {
            Some(raw) => parse_bool("TWL_SEND_NOTIFICATIONS", &raw)?,
            None => defaults.send_notifications,
        };

        let edit_count = match lookup("TWL_EDIT_COUNT") {
            Some(raw) => parse_u64("TWL_EDIT_COUNT", &raw)?,
            None => defaults.edit_count,
        };

        let registration_days = match lookup("TWL_REGISTRATION_DAYS") {
            Some(raw) => parse_u64("TWL_REGISTRATION_DAYS", &raw)?,
            None => defaults.registration_days,
        };

        let primary_url = lookup("TWL_PRIMARY_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.primary_url);

        let secondary_url = lookup("TWL_SECONDARY_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.secondary_url);

        Ok(Self {
            send_notifications,
            edit_count,
            registration_days,
            primary_url,
            secondary_url,
        })
    }

    /// Parse config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Eligibility thresholds derived from this config.
    pub fn thresholds(&self) -> EligibilityThresholds {
        EligibilityThresholds::from_days(self.edit_count, self.registration_days)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig { key, value: raw.to_string() }),
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidConfig { key, value: raw.to_string() })
}
