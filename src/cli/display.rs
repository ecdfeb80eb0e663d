//! Display utilities for the rene CLI.
//!
//! Each `render_*` function builds the text for one command's output and
//! the matching `show_*` prints it.

use crate::types::{IpcResponse, TimerPhase, TimerState};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the outcome of a timer command (start, pause, reset, ...).
    pub fn show_command_result(response: &IpcResponse) {
        println!("{}", Self::render_command_result(response));
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        println!("{}", Self::render_status(response));
    }

    /// Shows the outcome of a track update.
    pub fn show_track_result(response: &IpcResponse) {
        println!("{}", Self::render_track_result(response));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    pub fn render_command_result(response: &IpcResponse) -> String {
        let mut out = format!("{} {}", Self::marker(response), response.message);

        let state = response.data.as_ref().and_then(|d| d.timer_state());
        if let Some(state) = state {
            out.push_str(&format!(
                "\n  {}: {} remaining",
                state.mode,
                state.formatted()
            ));
        }
        out
    }

    pub fn render_status(response: &IpcResponse) -> String {
        let Some(data) = &response.data else {
            return "No timer data from the daemon".to_string();
        };
        let Some(state) = data.timer_state() else {
            return "No timer data from the daemon".to_string();
        };

        let mut lines = vec![
            "Pomodoro status".to_string(),
            "───────────────".to_string(),
            format!("Mode:      {}", state.mode),
            format!("State:     {}", Self::phase_label(&state)),
            format!(
                "Remaining: {} ({:.0}% done)",
                state.formatted(),
                state.progress_percent()
            ),
            format!("Session:   #{}", state.session_count),
        ];

        if let Some(track) = &data.track {
            let name = track
                .display_name()
                .unwrap_or_else(|| track.as_value().to_string());
            lines.push(format!("Track:     {}", name));
        }

        lines.join("\n")
    }

    pub fn render_track_result(response: &IpcResponse) -> String {
        let track = response.data.as_ref().and_then(|d| d.track.as_ref());
        match track.and_then(|t| t.display_name()) {
            Some(name) => format!("{} {}: {}", Self::marker(response), response.message, name),
            None => format!("{} {}", Self::marker(response), response.message),
        }
    }

    fn marker(response: &IpcResponse) -> &'static str {
        let running = response.data.as_ref().and_then(|d| d.running);
        match running {
            Some(true) => ">",
            Some(false) => "||",
            None => "*",
        }
    }

    fn phase_label(state: &TimerState) -> &'static str {
        match state.phase() {
            TimerPhase::Running => "running",
            TimerPhase::Completed if state.mode.is_break() => "done, back to work",
            TimerPhase::Completed => "done, time for a break",
            TimerPhase::Idle if state.remaining_seconds == state.total_seconds() => "ready",
            TimerPhase::Idle => "paused",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
