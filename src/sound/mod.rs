//! Completion sound for the Pomodoro timer.
//!
//! This module provides the audible cue played when a countdown reaches
//! zero:
//!
//! - A synthesized sine beep, or an audio file decoded by rodio
//! - A dedicated playback thread so the tick path never waits on audio
//! - Graceful degradation when no audio device is available
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐  try_send   ┌──────────────────┐
//! │ SoundWorker          │────────────▶│  playback thread │
//! │ (NotificationSound)  │  (bounded)  │ RodioSoundPlayer │
//! └──────────────────────┘             └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use rene::sound::{NotificationSound, SoundSource, SoundWorker};
//!
//! let sound = SoundWorker::rodio(SoundSource::default_beep());
//! sound.play(); // returns immediately
//! ```

mod error;
mod player;
mod source;
mod worker;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::{SoundSource, DEFAULT_DURATION_MS, DEFAULT_FREQUENCY_HZ, DEFAULT_VOLUME};
pub use worker::SoundWorker;

/// The audible cue fired once per completed countdown.
///
/// `play` is fire-and-forget: it must return quickly and must not report
/// failures back to the caller.
pub trait NotificationSound: Send + Sync {
    fn play(&self);
}

/// Low-level playback of a specific source.
pub trait SoundPlayer {
    /// Starts playing `source` without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Arc<P> {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        (**self).play(source)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    attempts: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Successful plays.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Every `play` call, failed or not.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if let Ok(mut calls) = self.play_calls.lock() {
            calls.push(source.clone());
        }
        Ok(())
    }
}

/// Mock completion cue for testing; counts `play` calls.
#[derive(Debug, Default)]
pub struct MockNotificationSound {
    plays: AtomicUsize,
}

impl MockNotificationSound {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl NotificationSound for MockNotificationSound {
    fn play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}
