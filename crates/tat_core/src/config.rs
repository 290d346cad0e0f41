//! Runner configuration.

use crate::error::{Result, TatError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up by [`Config::load_from_dir`].
pub const CONFIG_FILE_NAME: &str = "tat.toml";

/// Comprehensive configuration for a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Assertion polling configuration.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Timer/clock configuration.
    #[serde(default)]
    pub clock: ClockConfig,

    /// HTTP collaborator configuration.
    #[serde(default)]
    pub http: HttpConfig,

    /// Fixture locations.
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

impl Config {
    /// Load configuration from a file, falling back to defaults if it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| TatError::ConfigError(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| TatError::ConfigError(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Load `tat.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(CONFIG_FILE_NAME))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TatError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| TatError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }
}

/// Assertion polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// How long an assertion keeps polling before failing (default: 4000).
    pub timeout_ms: u64,

    /// Delay between polls (default: 50).
    pub interval_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 4000,
            interval_ms: 50,
        }
    }
}

impl RetryConfig {
    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the poll interval as a Duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Timer/clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockConfig {
    /// Maximum timers fired by a single advance (default: 10000).
    pub timer_step_limit: usize,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timer_step_limit: 10_000,
        }
    }
}

/// HTTP collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,

    /// User agent sent with requests.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("tat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Returns the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fixture locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FixturesConfig {
    /// Directory upload fixtures are resolved against.
    /// Defaults to the fixtures bundled with this crate.
    pub root: Option<PathBuf>,

    /// Site description to load instead of the embedded CAC TAT site.
    pub site: Option<PathBuf>,
}
