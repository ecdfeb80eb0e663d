//! Core data types for the Pomodoro timer.
//!
//! This module defines the data structures used for:
//! - The fixed mode table (work / short break / long break)
//! - The engine snapshot and its presentation helpers
//! - The opaque track value handed in by the music widget
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

// ============================================================================
// Mode
// ============================================================================

/// Fixed configuration for a timer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSpec {
    /// Countdown length in seconds
    pub duration_seconds: u32,
    /// Human-readable label
    pub label: &'static str,
    /// Accent color used by renderers
    pub color: &'static str,
}

const WORK: ModeSpec = ModeSpec {
    duration_seconds: 25 * 60,
    label: "Work",
    color: "#e74c3c",
};

const SHORT_BREAK: ModeSpec = ModeSpec {
    duration_seconds: 5 * 60,
    label: "Short Break",
    color: "#27ae60",
};

const LONG_BREAK: ModeSpec = ModeSpec {
    duration_seconds: 15 * 60,
    label: "Long Break",
    color: "#3498db",
};

/// The three Pomodoro modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Focused work session
    #[default]
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break
    LongBreak,
}

impl Mode {
    /// All modes, in display order.
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortBreak, Mode::LongBreak];

    /// Returns the fixed configuration of this mode.
    pub const fn spec(self) -> &'static ModeSpec {
        match self {
            Mode::Work => &WORK,
            Mode::ShortBreak => &SHORT_BREAK,
            Mode::LongBreak => &LONG_BREAK,
        }
    }

    /// Returns the countdown length of this mode in seconds.
    pub const fn duration_seconds(self) -> u32 {
        self.spec().duration_seconds
    }

    pub const fn label(self) -> &'static str {
        self.spec().label
    }

    pub const fn color(self) -> &'static str {
        self.spec().color
    }

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        !matches!(self, Mode::Work)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TimerPhase
// ============================================================================

/// Phase derived from a snapshot, used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Not counting down, time left on the clock
    Idle,
    /// Counting down
    Running,
    /// Reached zero; needs a reset or a mode switch
    Completed,
}

// ============================================================================
// TimerState
// ============================================================================

/// Snapshot of the engine's countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Seconds left in the current countdown
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Whether the countdown is being decremented
    pub running: bool,
    /// Current mode
    pub mode: Mode,
    /// Number of work sessions started
    #[serde(rename = "sessionCount")]
    pub session_count: u32,
}

impl TimerState {
    /// Initial state: paused at the start of the first work session.
    pub fn new() -> Self {
        Self {
            remaining_seconds: Mode::Work.duration_seconds(),
            running: false,
            mode: Mode::Work,
            session_count: 1,
        }
    }

    /// Full length of the current mode in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.mode.duration_seconds()
    }

    /// Whole minutes left.
    pub fn minutes(&self) -> u32 {
        self.remaining_seconds / 60
    }

    /// Seconds left past the whole minutes.
    pub fn seconds(&self) -> u32 {
        self.remaining_seconds % 60
    }

    /// Share of the current mode already elapsed, from 0.0 to 100.0.
    pub fn progress_percent(&self) -> f64 {
        let total = f64::from(self.total_seconds());
        let elapsed = total - f64::from(self.remaining_seconds);
        elapsed / total * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    /// Derives the rendering phase.
    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_seconds == 0 {
            TimerPhase::Completed
        } else {
            TimerPhase::Idle
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Track
// ============================================================================

/// Opaque track value reported by the music widget.
///
/// The timer never looks inside; it only stores the latest value and hands
/// it back to whoever asks for the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Track(serde_json::Value);

impl Track {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Best-effort `name` (and `artist`) for terminal display.
    pub fn display_name(&self) -> Option<String> {
        let name = self.0.get("name")?.as_str()?;
        match self.0.get("artist").and_then(|a| a.as_str()) {
            Some(artist) => Some(format!("{} - {}", name, artist)),
            None => Some(name.to_string()),
        }
    }
}

impl From<serde_json::Value> for Track {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Start (or continue) the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Pause if running, otherwise start
    Toggle,
    /// Restore the full duration of the current mode
    Reset,
    /// Switch to another mode
    SwitchMode {
        /// Target mode
        mode: Mode,
    },
    /// Query the current status
    Status,
    /// Replace the current track (null clears it)
    TrackChange {
        #[serde(default)]
        track: Option<Track>,
    },
}

impl IpcRequest {
    /// Whether applying the request twice leaves the same state as once.
    ///
    /// Only `toggle` flips state relative to what it finds.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, IpcRequest::Toggle)
    }
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Whether the countdown is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Work sessions started
    #[serde(rename = "sessionCount", skip_serializing_if = "Option::is_none")]
    pub session_count: Option<u32>,
    /// Current track, as last reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
}

impl ResponseData {
    /// Creates response data from a timer snapshot and the current track.
    pub fn from_timer_state(state: &TimerState, track: Option<&Track>) -> Self {
        Self {
            mode: Some(state.mode),
            running: Some(state.running),
            remaining_seconds: Some(state.remaining_seconds),
            session_count: Some(state.session_count),
            track: track.cloned(),
        }
    }

    /// Rebuilds the snapshot if every timer field is present.
    pub fn timer_state(&self) -> Option<TimerState> {
        Some(TimerState {
            remaining_seconds: self.remaining_seconds?,
            running: self.running?,
            mode: self.mode?,
            session_count: self.session_count?,
        })
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

// ============================================================================
// Tests
// ============================================================================
