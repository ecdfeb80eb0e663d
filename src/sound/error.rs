//! Sound system error types.
//!
//! None of these ever reach the timer: the playback worker logs them and
//! moves on.

use thiserror::Error;

/// Errors that can occur while playing the completion cue.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., headless machine).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream or sink.
    #[error("failed to open audio stream: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the synthesized beep.
    #[must_use]
    pub fn should_fallback_to_beep(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::FileNotFound(_) => "check sound.file in the config; the default beep is used",
            Self::DecodeError(_) => "the sound file may be corrupt or in an unsupported format",
            Self::StreamError(_) => "check the system audio settings",
            Self::PlaybackError(_) => "restart the daemon",
        }
    }
}
