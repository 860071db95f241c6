//! Start-up configuration from the command line and environment variables.

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the dataset to open at start-up.
pub const DATA_ENV: &str = "SLEEP_DASH_DATA";
/// Environment variable overriding the initial minimum-sleep slider value.
pub const MIN_SLEEP_ENV: &str = "SLEEP_DASH_MIN_SLEEP";
/// Initial minimum-sleep slider value, in hours.
pub const DEFAULT_MIN_SLEEP: i64 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SLEEP_DASH_MIN_SLEEP must be a whole number of hours, got '{value}'")]
    InvalidMinSleep { value: String },
}

/// Dashboard configuration resolved at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Dataset to load immediately; `None` waits for File → Open.
    pub data_path: Option<PathBuf>,
    /// Slider value before the user touches it (clamped to the data range).
    pub default_min_sleep: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            default_min_sleep: DEFAULT_MIN_SLEEP,
        }
    }
}

impl DashboardConfig {
    /// Read the process arguments and environment.
    ///
    /// # Sources
    /// - first positional argument, else `SLEEP_DASH_DATA`: dataset path
    /// - `SLEEP_DASH_MIN_SLEEP` (optional, default: 7): initial slider value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    /// Resolve from an explicit argument and an environment lookup.
    pub fn from_sources(
        arg: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_path = arg
            .or_else(|| env(DATA_ENV))
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let default_min_sleep = match env(MIN_SLEEP_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidMinSleep { value: raw.clone() })?,
            None => DEFAULT_MIN_SLEEP,
        };

        Ok(Self {
            data_path,
            default_min_sleep,
        })
    }
}
