//! Pomodoro engine.
//!
//! This module owns the countdown state machine:
//! - Commands (start / pause / toggle / reset / switch mode)
//! - The per-second tick handler
//! - Session counting on transitions into work
//! - Event emission, including the one-shot completion signal
//!
//! The engine never schedules anything itself. Whoever hosts it must call
//! [`PomodoroEngine::tick`] once per elapsed second while it is running.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::types::{Mode, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine on state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or continued
    Started {
        mode: Mode,
        remaining_seconds: u32,
    },
    /// Countdown paused
    Paused {
        mode: Mode,
        remaining_seconds: u32,
    },
    /// Countdown restored to the full duration of the mode
    Reset { mode: Mode },
    /// Mode changed (or was re-entered)
    ModeSwitched {
        from: Mode,
        to: Mode,
        session_count: u32,
    },
    /// One second elapsed
    Tick { remaining_seconds: u32 },
    /// Countdown reached zero
    Completed { mode: Mode, session_count: u32 },
}

// ============================================================================
// TickOutcome
// ============================================================================

/// Result of a single [`PomodoroEngine::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Idle,
    /// One second was taken off the clock.
    Counted { remaining_seconds: u32 },
    /// The countdown hit zero on this tick and the engine stopped.
    Completed,
}

// ============================================================================
// PomodoroEngine
// ============================================================================

/// Countdown state machine for one timer session.
#[derive(Debug)]
pub struct PomodoroEngine {
    state: TimerState,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl PomodoroEngine {
    /// Creates an engine paused at the start of the first work session.
    pub fn new(event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: TimerState::new(),
            event_tx,
        }
    }

    /// Starts the countdown.
    ///
    /// Does nothing if already running or if there is no time left; a reset
    /// or mode switch is needed after a completion.
    pub fn start(&mut self) {
        if self.state.running || self.state.remaining_seconds == 0 {
            return;
        }

        self.state.running = true;
        debug!(mode = ?self.state.mode, remaining = self.state.remaining_seconds, "timer started");
        self.emit(TimerEvent::Started {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Pauses the countdown. Idempotent.
    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }

        self.state.running = false;
        debug!(mode = ?self.state.mode, remaining = self.state.remaining_seconds, "timer paused");
        self.emit(TimerEvent::Paused {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
        });
    }

    /// Pauses if running, otherwise starts.
    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Restores the full duration of the current mode and stops.
    ///
    /// Mode and session count are left alone.
    pub fn reset(&mut self) {
        self.state.remaining_seconds = self.state.mode.duration_seconds();
        self.state.running = false;
        debug!(mode = ?self.state.mode, "timer reset");
        self.emit(TimerEvent::Reset {
            mode: self.state.mode,
        });
    }

    /// Switches to `mode` with a fresh, stopped countdown.
    ///
    /// Entering work from either break starts a new session. Re-entering the
    /// current mode still resets the countdown.
    pub fn switch_mode(&mut self, mode: Mode) {
        let from = self.state.mode;
        if mode == Mode::Work && from != Mode::Work {
            self.state.session_count = self.state.session_count.saturating_add(1);
        }

        self.state.mode = mode;
        self.state.remaining_seconds = mode.duration_seconds();
        self.state.running = false;

        info!(
            from = from.as_str(),
            to = mode.as_str(),
            session = self.state.session_count,
            "mode switched"
        );
        self.emit(TimerEvent::ModeSwitched {
            from,
            to: mode,
            session_count: self.state.session_count,
        });
    }

    /// Advances the countdown by one second.
    ///
    /// No-op while paused. On the tick that takes the clock from one second
    /// to zero the engine stops and emits [`TimerEvent::Completed`] before
    /// returning; later ticks do nothing.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        if self.state.remaining_seconds <= 1 {
            self.state.remaining_seconds = 0;
            self.state.running = false;

            info!(mode = self.state.mode.as_str(), "countdown completed");
            self.emit(TimerEvent::Tick {
                remaining_seconds: 0,
            });
            self.emit(TimerEvent::Completed {
                mode: self.state.mode,
                session_count: self.state.session_count,
            });
            return TickOutcome::Completed;
        }

        self.state.remaining_seconds -= 1;
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });
        TickOutcome::Counted {
            remaining_seconds: self.state.remaining_seconds,
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Sends an event; a dropped receiver only means nobody is listening.
    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.event_tx.send(event) {
            debug!("timer event dropped, no receiver: {:?}", e.0);
        }
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_engine() -> (PomodoroEngine, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PomodoroEngine::new(tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn completions(events: &[TimerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TimerEvent::Completed { .. }))
            .count()
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_engine() {
            let (engine, mut rx) = create_engine();
            let state = engine.snapshot();

            assert_eq!(state.mode, Mode::Work);
            assert_eq!(state.remaining_seconds, 1500);
            assert!(!state.running);
            assert_eq!(state.session_count, 1);
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_snapshot_is_a_copy() {
            let (mut engine, _rx) = create_engine();
            let before = engine.snapshot();

            engine.start();
            engine.tick();

            assert_eq!(before.remaining_seconds, 1500);
            assert_eq!(engine.snapshot().remaining_seconds, 1499);
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    mod command_tests {
        use super::*;

        #[test]
        fn test_start() {
            let (mut engine, mut rx) = create_engine();

            engine.start();

            assert!(engine.is_running());
            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::Started {
                    mode: Mode::Work,
                    remaining_seconds: 1500
                }]
            );
        }

        #[test]
        fn test_start_when_running_is_noop() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            drain(&mut rx);

            engine.start();

            assert!(engine.is_running());
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_start_at_zero_is_noop() {
            let (mut engine, mut rx) = create_engine();
            engine.state_mut().remaining_seconds = 0;

            engine.start();

            assert!(!engine.is_running());
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_pause() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.state_mut().remaining_seconds = 1000;
            drain(&mut rx);

            engine.pause();

            let state = engine.snapshot();
            assert!(!state.running);
            assert_eq!(state.remaining_seconds, 1000);
            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::Paused {
                    mode: Mode::Work,
                    remaining_seconds: 1000
                }]
            );
        }

        #[test]
        fn test_pause_twice_is_idempotent() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.tick();

            engine.pause();
            let after_first = engine.snapshot();
            drain(&mut rx);

            engine.pause();

            assert_eq!(engine.snapshot(), after_first);
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_toggle() {
            let (mut engine, _rx) = create_engine();

            engine.toggle();
            assert!(engine.is_running());

            engine.toggle();
            assert!(!engine.is_running());
        }

        #[test]
        fn test_toggle_after_completion_stays_stopped() {
            let (mut engine, _rx) = create_engine();
            engine.state_mut().remaining_seconds = 0;

            engine.toggle();

            assert!(!engine.is_running());
        }

        #[test]
        fn test_reset_preserves_mode() {
            let (mut engine, _rx) = create_engine();
            engine.switch_mode(Mode::ShortBreak);
            engine.start();
            for _ in 0..42 {
                engine.tick();
            }

            engine.reset();

            let state = engine.snapshot();
            assert_eq!(state.remaining_seconds, 300);
            assert!(!state.running);
            assert_eq!(state.mode, Mode::ShortBreak);
        }

        #[test]
        fn test_reset_keeps_session_count() {
            let (mut engine, _rx) = create_engine();
            engine.switch_mode(Mode::ShortBreak);
            engine.switch_mode(Mode::Work);

            engine.reset();

            assert_eq!(engine.snapshot().session_count, 2);
        }

        #[test]
        fn test_reset_after_completion_allows_start() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            engine.state_mut().remaining_seconds = 1;
            engine.tick();

            engine.reset();
            engine.start();

            assert!(engine.is_running());
            assert_eq!(engine.snapshot().remaining_seconds, 1500);
        }

        #[test]
        fn test_switch_mode_resets_duration() {
            for from in Mode::ALL {
                let (mut engine, _rx) = create_engine();
                engine.switch_mode(from);
                engine.start();
                engine.tick();

                engine.switch_mode(Mode::LongBreak);

                let state = engine.snapshot();
                assert_eq!(state.remaining_seconds, 900, "from {:?}", from);
                assert!(!state.running);
                assert_eq!(state.mode, Mode::LongBreak);
            }
        }

        #[test]
        fn test_switch_to_same_mode_resets() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.tick();
            engine.tick();
            drain(&mut rx);

            engine.switch_mode(Mode::Work);

            let state = engine.snapshot();
            assert_eq!(state.remaining_seconds, 1500);
            assert!(!state.running);
            assert_eq!(state.session_count, 1);
            assert_eq!(
                drain(&mut rx),
                vec![TimerEvent::ModeSwitched {
                    from: Mode::Work,
                    to: Mode::Work,
                    session_count: 1
                }]
            );
        }
    }

    // ------------------------------------------------------------------------
    // Session counting
    // ------------------------------------------------------------------------

    mod session_tests {
        use super::*;

        #[test]
        fn test_break_then_work_increments() {
            let (mut engine, _rx) = create_engine();
            let k = engine.snapshot().session_count;

            engine.switch_mode(Mode::ShortBreak);
            engine.switch_mode(Mode::Work);

            assert_eq!(engine.snapshot().session_count, k + 1);
        }

        #[test]
        fn test_session_count_saturates() {
            let (mut engine, _rx) = create_engine();
            engine.switch_mode(Mode::ShortBreak);
            engine.state_mut().session_count = u32::MAX;

            engine.switch_mode(Mode::Work);

            assert_eq!(engine.snapshot().session_count, u32::MAX);
            assert_eq!(engine.snapshot().mode, Mode::Work);
        }

        #[test]
        fn test_break_to_break_does_not_increment() {
            let (mut engine, _rx) = create_engine();
            let k = engine.snapshot().session_count;

            engine.switch_mode(Mode::ShortBreak);
            engine.switch_mode(Mode::LongBreak);

            assert_eq!(engine.snapshot().session_count, k);
        }

        #[test]
        fn test_long_break_then_work_increments() {
            let (mut engine, _rx) = create_engine();

            engine.switch_mode(Mode::LongBreak);
            engine.switch_mode(Mode::Work);

            assert_eq!(engine.snapshot().session_count, 2);
        }

        #[test]
        fn test_work_reentry_does_not_increment() {
            let (mut engine, _rx) = create_engine();

            engine.switch_mode(Mode::Work);
            engine.switch_mode(Mode::Work);

            assert_eq!(engine.snapshot().session_count, 1);
        }

        #[test]
        fn test_several_cycles() {
            let (mut engine, _rx) = create_engine();

            for _ in 0..3 {
                engine.switch_mode(Mode::ShortBreak);
                engine.switch_mode(Mode::Work);
            }
            engine.switch_mode(Mode::LongBreak);
            engine.switch_mode(Mode::ShortBreak);

            assert_eq!(engine.snapshot().session_count, 4);
        }
    }

    // ------------------------------------------------------------------------
    // Tick handling
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_decrements_by_one() {
            let (mut engine, _rx) = create_engine();
            engine.start();
            engine.state_mut().remaining_seconds = 600;

            let outcome = engine.tick();

            assert_eq!(
                outcome,
                TickOutcome::Counted {
                    remaining_seconds: 599
                }
            );
            let state = engine.snapshot();
            assert_eq!(state.remaining_seconds, 599);
            assert!(state.running);
        }

        #[test]
        fn test_tick_at_two_does_not_complete() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.state_mut().remaining_seconds = 2;

            engine.tick();

            assert_eq!(engine.snapshot().remaining_seconds, 1);
            assert!(engine.is_running());
            assert_eq!(completions(&drain(&mut rx)), 0);
        }

        #[test]
        fn test_completion_boundary() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.state_mut().remaining_seconds = 1;
            drain(&mut rx);

            let outcome = engine.tick();

            assert_eq!(outcome, TickOutcome::Completed);
            let state = engine.snapshot();
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.running);

            let events = drain(&mut rx);
            assert_eq!(completions(&events), 1);
            assert_eq!(
                events.last(),
                Some(&TimerEvent::Completed {
                    mode: Mode::Work,
                    session_count: 1
                })
            );
        }

        #[test]
        fn test_no_completion_after_zero() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            engine.state_mut().remaining_seconds = 1;
            engine.tick();
            drain(&mut rx);

            for _ in 0..5 {
                assert_eq!(engine.tick(), TickOutcome::Idle);
            }

            assert_eq!(engine.snapshot().remaining_seconds, 0);
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_tick_while_paused_is_noop() {
            let (mut engine, mut rx) = create_engine();
            engine.state_mut().remaining_seconds = 600;
            let before = engine.snapshot();

            let outcome = engine.tick();

            assert_eq!(outcome, TickOutcome::Idle);
            assert_eq!(engine.snapshot(), before);
            assert!(drain(&mut rx).is_empty());
        }

        #[test]
        fn test_completion_reports_break_mode() {
            let (mut engine, mut rx) = create_engine();
            engine.switch_mode(Mode::ShortBreak);
            engine.start();
            for _ in 0..300 {
                engine.tick();
            }

            let events = drain(&mut rx);
            assert!(events.contains(&TimerEvent::Completed {
                mode: Mode::ShortBreak,
                session_count: 1
            }));
        }

        #[test]
        fn test_full_work_session() {
            let (mut engine, mut rx) = create_engine();
            engine.start();
            drain(&mut rx);

            let mut completed_on = None;
            for n in 1..=1500 {
                if engine.tick() == TickOutcome::Completed {
                    assert!(completed_on.is_none(), "completed twice");
                    completed_on = Some(n);
                }
            }

            assert_eq!(completed_on, Some(1500));
            let state = engine.snapshot();
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.running);
            assert_eq!(completions(&drain(&mut rx)), 1);
        }

        #[test]
        fn test_remaining_stays_in_bounds() {
            let (mut engine, _rx) = create_engine();
            engine.switch_mode(Mode::ShortBreak);
            engine.start();

            for _ in 0..400 {
                engine.tick();
                let state = engine.snapshot();
                assert!(state.remaining_seconds <= state.total_seconds());
                if state.running {
                    assert!(state.remaining_seconds > 0);
                }
            }
        }

        #[test]
        fn test_tick_without_receiver_does_not_panic() {
            let (mut engine, rx) = create_engine();
            drop(rx);

            engine.start();
            engine.state_mut().remaining_seconds = 1;

            assert_eq!(engine.tick(), TickOutcome::Completed);
        }
    }
}
