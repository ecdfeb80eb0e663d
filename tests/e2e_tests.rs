//! End-to-end tests for complete Pomodoro cycles.
//!
//! Time is paused, so a 25-minute work session takes milliseconds:
//! - Full work session driven by the real ticker
//! - Work, break, work cycles and the session counter
//! - Exactly one completion sound per finished countdown
//! - Pause and resume across many simulated seconds

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use rene::daemon::{self, Session};
use rene::engine::{PomodoroEngine, TickOutcome, TimerEvent};
use rene::sound::MockNotificationSound;
use rene::types::{Mode, TimerPhase};

// ============================================================================
// Test Helpers
// ============================================================================

/// A session whose events feed the completion sound dispatcher.
fn create_session_with_sound() -> (Session, Arc<MockNotificationSound>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sound = Arc::new(MockNotificationSound::new());
    let dispatcher = tokio::spawn(daemon::dispatch_events(rx, sound.clone()));
    (Session::new(PomodoroEngine::new(tx)), sound, dispatcher)
}

/// Lets the simulated clock run for `secs` seconds, then lets other tasks
/// drain.
async fn advance(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    tokio::time::sleep(Duration::from_millis(1)).await;
}

// ============================================================================
// TC: Full work session
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_work_session_completes_with_one_sound() {
    let (mut session, sound, _dispatcher) = create_session_with_sound();

    session.start().await;
    advance(1499).await;

    let almost = session.snapshot().await;
    assert!(almost.running);
    assert_eq!(almost.remaining_seconds, 1);
    assert_eq!(sound.play_count(), 0);

    advance(1).await;

    let done = session.snapshot().await;
    assert!(!done.running);
    assert_eq!(done.remaining_seconds, 0);
    assert_eq!(done.phase(), TimerPhase::Completed);
    assert_eq!(sound.play_count(), 1);
    assert!(!session.is_ticking());

    // Nothing else fires once the countdown is over
    advance(120).await;
    assert_eq!(sound.play_count(), 1);
    assert_eq!(session.snapshot().await.remaining_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_after_completion_needs_reset() {
    let (mut session, sound, _dispatcher) = create_session_with_sound();

    session.switch_mode(Mode::ShortBreak).await;
    session.start().await;
    advance(300).await;
    assert_eq!(sound.play_count(), 1);

    let state = session.start().await;
    assert!(!state.running);
    assert!(!session.is_ticking());

    session.reset().await;
    let state = session.start().await;
    assert!(state.running);
    assert_eq!(state.remaining_seconds, 300);
}

// ============================================================================
// TC: Pomodoro cycles
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_work_break_cycles_count_sessions() {
    let (mut session, sound, _dispatcher) = create_session_with_sound();

    for cycle in 1..=4u32 {
        let state = session.snapshot().await;
        assert_eq!(state.mode, Mode::Work);
        assert_eq!(state.session_count, cycle);

        session.start().await;
        advance(u64::from(Mode::Work.duration_seconds())).await;

        let brk = if cycle == 4 {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        };
        session.switch_mode(brk).await;
        session.start().await;
        advance(u64::from(brk.duration_seconds())).await;

        session.switch_mode(Mode::Work).await;
    }

    assert_eq!(sound.play_count(), 8);
    assert_eq!(session.snapshot().await.session_count, 5);
}

// ============================================================================
// TC: Pause and resume
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_countdown() {
    let (mut session, sound, _dispatcher) = create_session_with_sound();

    session.start().await;
    advance(600).await;
    let paused = session.pause().await;
    assert_eq!(paused.remaining_seconds, 900);

    advance(3600).await;
    assert_eq!(session.snapshot().await.remaining_seconds, 900);
    assert_eq!(sound.play_count(), 0);

    session.toggle().await;
    advance(900).await;

    let done = session.snapshot().await;
    assert_eq!(done.remaining_seconds, 0);
    assert_eq!(sound.play_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_toggles_never_double_tick() {
    let (mut session, _sound, _dispatcher) = create_session_with_sound();

    for _ in 0..10 {
        session.toggle().await;
        session.toggle().await;
    }
    session.start().await;
    session.start().await;
    advance(10).await;

    assert_eq!(session.snapshot().await.remaining_seconds, 1490);
}

// ============================================================================
// TC: Engine only, driven by hand
// ============================================================================

#[test]
fn test_engine_full_cycle_by_hand() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = PomodoroEngine::new(tx);

    engine.start();
    let mut outcomes = Vec::new();
    for _ in 0..1500 {
        outcomes.push(engine.tick());
    }

    assert_eq!(outcomes.last(), Some(&TickOutcome::Completed));
    assert!(outcomes[..1499]
        .iter()
        .all(|o| matches!(o, TickOutcome::Counted { .. })));
    assert_eq!(engine.tick(), TickOutcome::Idle);

    let mut completed = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, TimerEvent::Completed { .. }) {
            completed += 1;
        }
    }
    assert_eq!(completed, 1);
}
