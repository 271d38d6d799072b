//! Orchestrator settings
//!
//! Operator-tunable knobs for console sessions, persisted as TOML. The
//! fallback delay defaults to zero: a failed attempt is fully torn down
//! before the next begins, so waiting buys nothing for correctness. A
//! nonzero delay only slows the visible flicker through "Connecting..."
//! states.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default per-attempt connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Default delay before falling back to the next option, in milliseconds
pub const DEFAULT_FALLBACK_DELAY_MS: u64 = 0;

/// Neutral URL a frame is reset to on teardown
pub const DEFAULT_NEUTRAL_FRAME_URL: &str = "about:blank";

/// Settings for console session orchestration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Delay before attempting the next option after a failure, in
    /// milliseconds
    pub fallback_delay_ms: u64,
    /// Per-attempt connect timeout in seconds; a timeout counts as the
    /// option's one failed attempt
    pub connect_timeout_secs: u64,
    /// URL frames are reset to during HTML5 teardown
    pub neutral_frame_url: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: DEFAULT_FALLBACK_DELAY_MS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            neutral_frame_url: DEFAULT_NEUTRAL_FRAME_URL.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates settings with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback delay in milliseconds
    #[must_use]
    pub const fn with_fallback_delay_ms(mut self, delay_ms: u64) -> Self {
        self.fallback_delay_ms = delay_ms;
        self
    }

    /// Sets the per-attempt connect timeout in seconds
    #[must_use]
    pub const fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Sets the neutral frame URL
    #[must_use]
    pub fn with_neutral_frame_url(mut self, url: impl Into<String>) -> Self {
        self.neutral_frame_url = url.into();
        self
    }

    /// Returns the fallback delay as a [`Duration`]
    #[must_use]
    pub const fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    /// Returns the connect timeout as a [`Duration`]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the default settings file path, if a config directory is
    /// known for this platform
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vmconsole").join("settings.toml"))
    }

    /// Loads settings from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Saves settings to a TOML file, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization or writing fails.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}
