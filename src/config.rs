//! Daemon configuration.
//!
//! Settings live in an optional JSON file (`~/.rene/config.json` by
//! default). Every field has a default, so a missing file or a partial file
//! is fine.
//!
//! ```json
//! {
//!   "socket_path": "/tmp/rene.sock",
//!   "sound": { "enabled": true, "frequency_hz": 660.0, "volume": 0.5 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::sound::{SoundSource, DEFAULT_DURATION_MS, DEFAULT_FREQUENCY_HZ, DEFAULT_VOLUME};

/// Directory under the home directory holding the socket and config file.
pub const APP_DIR: &str = ".rene";

/// Socket file name inside [`APP_DIR`].
pub const SOCKET_FILE: &str = "rene.sock";

/// Config file name inside [`APP_DIR`].
pub const CONFIG_FILE: &str = "config.json";

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be determined.
    #[error("could not determine the home directory")]
    HomeDirectoryNotFound,

    /// The config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Paths
// ============================================================================

/// Returns `~/.rene`.
pub fn app_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirectoryNotFound)?;
    Ok(home.join(APP_DIR))
}

/// Returns the default socket path, `~/.rene/rene.sock`.
pub fn default_socket_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join(SOCKET_FILE))
}

/// Returns the default config file path, `~/.rene/config.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dir()?.join(CONFIG_FILE))
}

// ============================================================================
// SoundConfig
// ============================================================================

fn default_enabled() -> bool {
    true
}

fn default_frequency_hz() -> f32 {
    DEFAULT_FREQUENCY_HZ
}

fn default_duration_ms() -> u64 {
    DEFAULT_DURATION_MS
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

/// Completion cue settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Whether to play anything at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Audio file to play instead of the beep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Beep pitch in Hz.
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f32,

    /// Beep length in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Volume multiplier, 0.0 to 1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            file: None,
            frequency_hz: default_frequency_hz(),
            duration_ms: default_duration_ms(),
            volume: default_volume(),
        }
    }
}

impl SoundConfig {
    /// Returns the source the worker should play.
    pub fn to_source(&self) -> SoundSource {
        match &self.file {
            Some(path) => SoundSource::file(path),
            None => SoundSource::beep(self.frequency_hz, self.duration_ms, self.volume),
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frequency_hz > 0.0 && self.frequency_hz <= 20_000.0) {
            return Err(ConfigError::Invalid(format!(
                "sound.frequency_hz must be within (0, 20000], got {}",
                self.frequency_hz
            )));
        }
        if self.duration_ms == 0 || self.duration_ms > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "sound.duration_ms must be within 1-10000, got {}",
                self.duration_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Invalid(format!(
                "sound.volume must be within 0.0-1.0, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

// ============================================================================
// DaemonConfig
// ============================================================================

/// Daemon settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Socket to listen on; `~/.rene/rene.sock` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,

    /// Completion cue.
    #[serde(default)]
    pub sound: SoundConfig,
}

impl DaemonConfig {
    /// Loads the config from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `~/.rene/config.json`.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&default_config_path()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sound.validate()
    }

    /// Returns the configured socket path or the default one.
    pub fn resolved_socket_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.socket_path {
            Some(path) => Ok(path.clone()),
            None => default_socket_path(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
