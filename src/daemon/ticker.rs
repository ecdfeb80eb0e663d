//! Tick source for the Pomodoro engine.
//!
//! A [`Ticker`] drives one engine with a `tokio::time::interval` task. The
//! task is spawned when the countdown starts and aborted as soon as it
//! stops, so there is never more than one source calling
//! [`PomodoroEngine::tick`]. Late ticks are skipped rather than replayed;
//! the countdown simply falls behind the wall clock.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::engine::{PomodoroEngine, TickOutcome};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns at most one running tick task.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Creates an idle ticker with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Returns the tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true while a tick task is alive.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts ticking `engine`, replacing any previous task.
    ///
    /// The first tick lands one full period after this call.
    pub fn arm(&mut self, engine: Arc<Mutex<PomodoroEngine>>) {
        self.disarm();
        debug!(period_ms = self.period.as_millis() as u64, "tick source armed");
        self.handle = Some(tokio::spawn(run_ticks(engine, self.period)));
    }

    /// Stops the tick task, if any.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("tick source disarmed");
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Ticks the engine until it stops running.
async fn run_ticks(engine: Arc<Mutex<PomodoroEngine>>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let outcome = engine.lock().await.tick();
        match outcome {
            TickOutcome::Counted { remaining_seconds } => {
                trace!(remaining_seconds, "tick");
            }
            TickOutcome::Completed => {
                debug!("countdown completed, tick source stopping");
                break;
            }
            TickOutcome::Idle => {
                debug!("engine not running, tick source stopping");
                break;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
