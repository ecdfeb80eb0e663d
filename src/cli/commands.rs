//! Command definitions for the rene CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{Mode, Track};

// ============================================================================
// CLI Structure
// ============================================================================

/// rene - a Pomodoro timer daemon and its remote control
#[derive(Parser, Debug)]
#[command(
    name = "rene",
    version,
    about = "Pomodoro timer daemon and CLI",
    long_about = "A Pomodoro timer that runs as a small daemon.\n\
                  Work for 25 minutes, break for 5 or 15, and drive it all from the terminal.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path (defaults to ~/.rene/rene.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start or continue the countdown
    Start,

    /// Pause the countdown
    Pause,

    /// Pause if running, otherwise start
    Toggle,

    /// Restore the full duration of the current mode
    Reset,

    /// Switch to another mode (stops the countdown)
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Show current timer status
    Status,

    /// Report the track currently playing (JSON), or clear it
    Track(TrackArgs),

    /// Run the timer daemon in the foreground
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Timer mode as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Work => Mode::Work,
            ModeArg::ShortBreak => Mode::ShortBreak,
            ModeArg::LongBreak => Mode::LongBreak,
        }
    }
}

// ============================================================================
// Track Command Arguments
// ============================================================================

/// Arguments for the track command
#[derive(Args, Debug, Clone)]
pub struct TrackArgs {
    /// Track as a JSON object, e.g. '{"name":"Weightless","artist":"Marconi Union"}'
    #[arg(value_parser = parse_track, required_unless_present = "clear", conflicts_with = "clear")]
    pub track: Option<Track>,

    /// Clear the current track
    #[arg(long)]
    pub clear: bool,
}

impl TrackArgs {
    /// The track to send; `None` clears it.
    pub fn into_track(self) -> Option<Track> {
        if self.clear {
            None
        } else {
            self.track
        }
    }
}

// ============================================================================
// Daemon Command Arguments
// ============================================================================

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// Config file (defaults to ~/.rene/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Maximum accepted size of a track argument, in bytes.
const MAX_TRACK_LEN: usize = 2048;

/// Parses a track argument.
///
/// - Must be valid JSON
/// - Must not exceed 2048 bytes, so the request fits the daemon's limit
fn parse_track(s: &str) -> Result<Track, String> {
    if s.len() > MAX_TRACK_LEN {
        return Err(format!("track must be at most {} bytes", MAX_TRACK_LEN));
    }
    serde_json::from_str::<serde_json::Value>(s)
        .map(Track::new)
        .map_err(|e| format!("track must be valid JSON: {}", e))
}

// ============================================================================
// Tests
// ============================================================================
