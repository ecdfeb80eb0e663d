//! Sound sources for the completion cue.

use std::path::{Path, PathBuf};

/// Default beep pitch in Hz.
pub const DEFAULT_FREQUENCY_HZ: f32 = 800.0;

/// Default beep length in milliseconds.
pub const DEFAULT_DURATION_MS: u64 = 1000;

/// Default beep volume (0.0 - 1.0).
pub const DEFAULT_VOLUME: f32 = 0.3;

/// What to play when a countdown completes.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// A synthesized sine beep.
    Beep {
        /// Pitch in Hz
        frequency_hz: f32,
        /// Length in milliseconds
        duration_ms: u64,
        /// Volume multiplier (0.0 - 1.0)
        volume: f32,
    },
    /// An audio file decoded by rodio.
    File {
        /// Path to the file
        path: PathBuf,
    },
}

impl SoundSource {
    /// Creates a beep source.
    #[must_use]
    pub fn beep(frequency_hz: f32, duration_ms: u64, volume: f32) -> Self {
        Self::Beep {
            frequency_hz,
            duration_ms,
            volume,
        }
    }

    /// Creates a file source. The path is not checked until playback.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// The default cue: one second of 800 Hz at 30% volume.
    #[must_use]
    pub fn default_beep() -> Self {
        Self::beep(DEFAULT_FREQUENCY_HZ, DEFAULT_DURATION_MS, DEFAULT_VOLUME)
    }

    #[must_use]
    pub fn is_beep(&self) -> bool {
        matches!(self, Self::Beep { .. })
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Beep { .. } => None,
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::default_beep()
    }
}
