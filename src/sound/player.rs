//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

/// A sound player backed by the default rodio output device.
///
/// The output stream is not `Send` on every platform, so a player must stay
/// on the thread that created it. [`super::SoundWorker`] takes care of that.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Opens the default audio output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a sound from the given source without blocking.
    ///
    /// A file that cannot be opened or decoded falls back to the default
    /// beep.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created or the fallback fails too.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { path } => match self.play_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.should_fallback_to_beep() => {
                    warn!(
                        "Failed to play '{}': {}, falling back to beep",
                        path.display(),
                        e
                    );
                    self.play(&SoundSource::default_beep())
                }
                Err(e) => Err(e),
            },
            SoundSource::Beep {
                frequency_hz,
                duration_ms,
                volume,
            } => self.play_beep(*frequency_hz, *duration_ms, *volume),
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.detach();

        debug!("Playing sound file: {}", path.display());
        Ok(())
    }

    fn play_beep(&self, frequency_hz: f32, duration_ms: u64, volume: f32) -> Result<(), SoundError> {
        let mut beep = SineWave::new(frequency_hz).take_duration(Duration::from_millis(duration_ms));
        beep.set_filter_fadeout();

        let sink = self.sink()?;
        sink.append(beep.amplify(volume));
        sink.detach();

        debug!(frequency_hz, duration_ms, "Playing beep");
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}
