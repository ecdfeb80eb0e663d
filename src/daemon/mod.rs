//! Daemon side of the Pomodoro timer.
//!
//! This module hosts the engine as a long-running process:
//! - `ticker`: the once-per-second tick source
//! - `session`: engine + ticker + current track
//! - `ipc`: Unix socket server and request dispatch
//!
//! [`run`] wires them together and plays the completion sound whenever the
//! engine reports a finished countdown.

pub mod ipc;
pub mod session;
pub mod ticker;

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, trace, warn};

use crate::engine::{PomodoroEngine, TimerEvent};
use crate::sound::NotificationSound;

pub use ipc::{serve_connection, IpcError, IpcServer, RequestHandler};
pub use session::Session;
pub use ticker::{Ticker, TICK_PERIOD};

/// Runs the daemon on `socket_path` until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub async fn run(socket_path: &Path, sound: Arc<dyn NotificationSound>) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let session = Session::new(PomodoroEngine::new(event_tx));
    let handler = RequestHandler::new(Arc::new(Mutex::new(session)));

    let server = IpcServer::new(socket_path)?;
    let events = tokio::spawn(dispatch_events(event_rx, sound));

    info!("Daemon started (pid {})", std::process::id());
    let result = serve(&server, handler, shutdown_signal()).await;

    events.abort();
    info!("Daemon stopped");
    result
}

/// Accepts connections until `shutdown` resolves, serving each one on its
/// own task.
///
/// # Errors
///
/// Currently never fails; accept errors are logged and skipped.
pub async fn serve<F>(server: &IpcServer, handler: RequestHandler, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown requested");
                return Ok(());
            }
            accepted = server.accept() => match accepted {
                Ok(stream) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        serve_connection(stream, &handler).await;
                    });
                }
                Err(e) => warn!("Failed to accept connection: {:#}", e),
            },
        }
    }
}

/// Consumes engine events, playing `sound` once per completed countdown.
///
/// Returns when every sender is gone.
pub async fn dispatch_events(
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    sound: Arc<dyn NotificationSound>,
) {
    while let Some(event) = events.recv().await {
        match event {
            TimerEvent::Completed {
                mode,
                session_count,
            } => {
                info!(mode = mode.as_str(), session = session_count, "{} finished", mode);
                sound.play();
            }
            TimerEvent::Tick { remaining_seconds } => trace!(remaining_seconds, "tick"),
            other => debug!(?other, "timer event"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

// ============================================================================
// Tests
// ============================================================================
