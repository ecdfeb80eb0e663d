//! rene, a Pomodoro timer.
//!
//! This library provides:
//! - The countdown engine with its session and completion rules
//! - A daemon hosting the engine behind a Unix socket
//! - The CLI client and its output formatting
//! - Completion sound playback
//! - Configuration and shared type definitions

pub mod cli;
pub mod config;
pub mod daemon;
pub mod engine;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{ConfigError, DaemonConfig, SoundConfig};
pub use engine::{PomodoroEngine, TickOutcome, TimerEvent};
pub use types::{
    IpcRequest, IpcResponse, Mode, ModeSpec, ResponseData, TimerPhase, TimerState, Track,
};

// Re-export sound types
pub use sound::{
    MockNotificationSound, MockSoundPlayer, NotificationSound, RodioSoundPlayer, SoundError,
    SoundPlayer, SoundSource, SoundWorker,
};
