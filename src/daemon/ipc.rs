//! IPC server for the daemon.
//!
//! One JSON request per connection over a Unix domain socket:
//! - [`IpcServer`] binds the socket and moves bytes
//! - [`RequestHandler`] turns requests into [`Session`] commands
//! - [`serve_connection`] glues the two together for one client

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::types::{IpcRequest, IpcResponse, Mode, ResponseData, TimerState};

use super::session::Session;

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
pub const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to bind socket: {0}")]
    BindError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Failed to read request: {0}")]
    ReadError(String),

    #[error("Failed to write response: {0}")]
    WriteError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,

    #[error("Connection closed by peer")]
    ConnectionClosed,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix domain socket listener that cleans up its socket file on drop.
#[derive(Debug)]
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Binds a new server to `socket_path`.
    ///
    /// A stale socket file is removed first and the parent directory is
    /// created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .map_err(|e| IpcError::BindError(format!("{}: {}", socket_path.display(), e)))?;

        info!("Listening on {}", socket_path.display());

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .map_err(|e| IpcError::ConnectionError(e.to_string()))?;
        Ok(stream)
    }

    /// Reads and parses one request, giving up after five seconds.
    ///
    /// # Errors
    ///
    /// Returns an error on timeout, on a closed or oversized request, or if
    /// the payload is not a valid request.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            return Err(IpcError::ConnectionClosed.into());
        }
        if n == MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge.into());
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .map_err(|e| IpcError::SerializationError(e.to_string()))?;

        Ok(request)
    }

    /// Serializes and writes a response.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response)
            .map_err(|e| IpcError::SerializationError(e.to_string()))?;

        stream
            .write_all(&json)
            .await
            .map_err(|e| IpcError::WriteError(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| IpcError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Serves a single client: read one request, answer it, close.
///
/// A request that cannot be read or parsed gets an error response when the
/// stream is still writable.
pub async fn serve_connection(mut stream: UnixStream, handler: &RequestHandler) {
    let response = match IpcServer::receive_request(&mut stream).await {
        Ok(request) => {
            debug!(?request, "request received");
            handler.handle(request).await
        }
        Err(e) => {
            warn!("Rejected request: {:#}", e);
            IpcResponse::error(format!("Invalid request: {}", e))
        }
    };

    if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
        debug!("Failed to send response: {:#}", e);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Dispatches IPC requests to the shared [`Session`].
#[derive(Debug, Clone)]
pub struct RequestHandler {
    session: Arc<Mutex<Session>>,
}

impl RequestHandler {
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }

    /// Handles an IPC request and returns the response for it.
    ///
    /// Commands that do not apply in the current state are accepted and
    /// leave the state unchanged; the response always carries the resulting
    /// snapshot.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        let mut session = self.session.lock().await;

        let (message, state) = match request {
            IpcRequest::Start => {
                let state = session.start().await;
                (start_message(&state), state)
            }
            IpcRequest::Pause => ("Timer paused".to_string(), session.pause().await),
            IpcRequest::Toggle => {
                let state = session.toggle().await;
                let message = if state.running {
                    "Timer started".to_string()
                } else {
                    "Timer paused".to_string()
                };
                (message, state)
            }
            IpcRequest::Reset => ("Timer reset".to_string(), session.reset().await),
            IpcRequest::SwitchMode { mode } => {
                let state = session.switch_mode(mode).await;
                (switch_message(mode, &state), state)
            }
            IpcRequest::Status => (String::new(), session.snapshot().await),
            IpcRequest::TrackChange { track } => {
                let message = if track.is_some() {
                    "Track updated"
                } else {
                    "Track cleared"
                };
                session.set_track(track);
                (message.to_string(), session.snapshot().await)
            }
        };

        IpcResponse::success(
            message,
            Some(ResponseData::from_timer_state(&state, session.track())),
        )
    }
}

fn start_message(state: &TimerState) -> String {
    if state.running {
        "Timer started".to_string()
    } else {
        "Countdown finished; reset or switch mode to start again".to_string()
    }
}

fn switch_message(mode: Mode, state: &TimerState) -> String {
    if mode == Mode::Work {
        format!("Switched to {} (session {})", mode, state.session_count)
    } else {
        format!("Switched to {}", mode)
    }
}

// ============================================================================
// Tests
// ============================================================================
