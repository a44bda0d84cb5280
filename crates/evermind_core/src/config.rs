//! Engine tuning knobs.
//!
//! # Invariants
//! - Durations are whole minutes in `1..=MAX_WINDOW_MINUTES` once
//!   `validate()` passes.
//! - Defaults reproduce the 24h reminder lead and 24h "due soon" window.

use chrono::Duration;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Local cache key holding the assignment snapshot.
pub const DEFAULT_ASSIGNMENTS_KEY: &str = "evermind-assignments";
/// Local cache key holding the notifications-enabled flag.
pub const DEFAULT_NOTIFICATIONS_KEY: &str = "evermind-notifications";

const DAY_MINUTES: i64 = 24 * 60;
/// Upper bound for every window: ten years of minutes.
pub const MAX_WINDOW_MINUTES: i64 = 10 * 365 * DAY_MINUTES;

/// Runtime configuration for `AssignmentService`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How long before the due instant a reminder fires.
    pub reminder_lead_minutes: i64,
    /// How far ahead of "now" a reminder may be scheduled in one pass.
    pub reminder_horizon_minutes: i64,
    /// Width of the "due soon" classification window.
    pub due_soon_window_minutes: i64,
    pub assignments_key: String,
    pub notifications_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_lead_minutes: DAY_MINUTES,
            reminder_horizon_minutes: DAY_MINUTES,
            due_soon_window_minutes: DAY_MINUTES,
            assignments_key: DEFAULT_ASSIGNMENTS_KEY.to_string(),
            notifications_key: DEFAULT_NOTIFICATIONS_KEY.to_string(),
        }
    }
}

/// Config load failures.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl EngineConfig {
    /// Loads a JSON config file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("reminder_lead_minutes", self.reminder_lead_minutes),
            ("reminder_horizon_minutes", self.reminder_horizon_minutes),
            ("due_soon_window_minutes", self.due_soon_window_minutes),
        ] {
            if value <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
            if value > MAX_WINDOW_MINUTES {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be at most {MAX_WINDOW_MINUTES}, got {value}"
                )));
            }
        }
        if self.assignments_key.trim().is_empty() || self.notifications_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "cache keys cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reminder_lead(&self) -> Duration {
        Duration::minutes(self.reminder_lead_minutes)
    }

    pub fn reminder_horizon(&self) -> Duration {
        Duration::minutes(self.reminder_horizon_minutes)
    }

    pub fn due_soon_window(&self) -> Duration {
        Duration::minutes(self.due_soon_window_minutes)
    }
}
