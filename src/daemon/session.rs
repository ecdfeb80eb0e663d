//! Host-side session around one Pomodoro engine.
//!
//! A [`Session`] forwards commands to the engine and keeps the tick source
//! in step with the running flag: armed while the countdown runs, aborted
//! the moment it stops. It also holds the last track reported by the music
//! widget, which it never inspects.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::Duration;
use tracing::debug;

use crate::engine::PomodoroEngine;
use crate::types::{Mode, TimerState, Track};

use super::ticker::{Ticker, TICK_PERIOD};

/// One engine, its tick source, and the current track.
#[derive(Debug)]
pub struct Session {
    engine: Arc<Mutex<PomodoroEngine>>,
    ticker: Ticker,
    track: Option<Track>,
}

impl Session {
    /// Creates a session ticking once per second.
    pub fn new(engine: PomodoroEngine) -> Self {
        Self::with_tick_period(engine, TICK_PERIOD)
    }

    /// Creates a session with a custom tick period.
    pub fn with_tick_period(engine: PomodoroEngine, period: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker: Ticker::new(period),
            track: None,
        }
    }

    pub async fn start(&mut self) -> TimerState {
        self.apply(PomodoroEngine::start).await
    }

    pub async fn pause(&mut self) -> TimerState {
        self.apply(PomodoroEngine::pause).await
    }

    pub async fn toggle(&mut self) -> TimerState {
        self.apply(PomodoroEngine::toggle).await
    }

    pub async fn reset(&mut self) -> TimerState {
        self.apply(PomodoroEngine::reset).await
    }

    pub async fn switch_mode(&mut self, mode: Mode) -> TimerState {
        self.apply(|engine| engine.switch_mode(mode)).await
    }

    /// Returns the current engine snapshot.
    pub async fn snapshot(&self) -> TimerState {
        self.engine.lock().await.snapshot()
    }

    /// Replaces the current track; `None` clears it.
    pub fn set_track(&mut self, track: Option<Track>) {
        debug!(present = track.is_some(), "track changed");
        self.track = track;
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// Returns true while a tick source is driving the engine.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Runs a command against the engine, then reconciles the tick source.
    async fn apply<F>(&mut self, command: F) -> TimerState
    where
        F: FnOnce(&mut PomodoroEngine),
    {
        let state = {
            let mut engine = self.engine.lock().await;
            command(&mut *engine);
            engine.snapshot()
        };

        if state.running {
            if !self.ticker.is_active() {
                self.ticker.arm(self.engine.clone());
            }
        } else {
            self.ticker.disarm();
        }

        state
    }
}

// ============================================================================
// Tests
// ============================================================================
