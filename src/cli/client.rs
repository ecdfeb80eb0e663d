//! IPC client for talking to the rene daemon.
//!
//! This module provides:
//! - Unix domain socket client
//! - One method per daemon command
//! - Connection retry logic
//! - Timeout handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::warn;

use crate::config;
use crate::types::{IpcRequest, IpcResponse, Mode, Track};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum attempts per request
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
#[derive(Debug, Clone)]
pub struct IpcClient {
    socket_path: PathBuf,
    timeout: Duration,
    retry_delay: Duration,
}

impl IpcClient {
    /// Creates a client for the default socket, `~/.rene/rene.sock`.
    pub fn new() -> Result<Self> {
        Ok(Self::with_socket_path(config::default_socket_path()?))
    }

    /// Creates a client for a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }

    /// Overrides the base retry delay.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub async fn start(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Start).await
    }

    pub async fn pause(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Pause).await
    }

    pub async fn toggle(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Toggle).await
    }

    pub async fn reset(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Reset).await
    }

    pub async fn switch_mode(&self, mode: Mode) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::SwitchMode { mode })
            .await
    }

    /// Sends a status query to the daemon.
    pub async fn status(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Status).await
    }

    /// Reports the current track; `None` clears it.
    pub async fn track_change(&self, track: Option<Track>) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TrackChange { track })
            .await
    }

    /// Sends a request, retrying transport failures with a linear backoff.
    ///
    /// Once the request bytes have been written, only idempotent requests
    /// are retried; the daemon may already have applied the others. An error
    /// response from the daemon is returned as an error right away.
    async fn send_request_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            let error = match self.send_request(request).await {
                Ok(response) if response.is_error() => {
                    anyhow::bail!("{}", response.message);
                }
                Ok(response) => return Ok(response),
                Err(SendFailure::Sent(e)) if !request.is_idempotent() => {
                    return Err(e.context(
                        "No answer from the daemon; the command may have been applied, \
                         check 'rene status'",
                    ));
                }
                Err(SendFailure::NotSent(e) | SendFailure::Sent(e)) => e,
            };

            warn!("Request failed (attempt {}/{}): {:#}", attempt, MAX_RETRIES, error);
            last_error = Some(error);

            if attempt < MAX_RETRIES {
                tokio::time::sleep(self.retry_delay * attempt).await;
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("request was never sent")))
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &IpcRequest) -> Result<IpcResponse, SendFailure> {
        let request_json = serde_json::to_vec(request)
            .context("Failed to serialize request")
            .map_err(SendFailure::NotSent)?;

        let stream = self.connect().await.map_err(SendFailure::NotSent)?;

        Self::exchange(stream, &request_json)
            .await
            .map_err(SendFailure::Sent)
    }

    async fn connect(&self) -> Result<UnixStream> {
        timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .with_context(|| {
                format!(
                    "Cannot reach the daemon at {}; start it with 'rene daemon'",
                    self.socket_path.display()
                )
            })
    }

    /// Writes the request and reads the single response.
    async fn exchange(mut stream: UnixStream, request_json: &[u8]) -> Result<IpcResponse> {
        let io_timeout = Duration::from_secs(IO_TIMEOUT_SECS);

        timeout(io_timeout, stream.write_all(request_json))
            .await
            .context("Write timed out")?
            .context("Failed to send request")?;

        timeout(io_timeout, stream.flush())
            .await
            .context("Flush timed out")?
            .context("Failed to flush request")?;

        // Signal end of request
        stream
            .shutdown()
            .await
            .context("Failed to shut down write side")?;

        let mut buffer = vec![0u8; MAX_RESPONSE_SIZE];
        let n = timeout(io_timeout, stream.read(&mut buffer))
            .await
            .context("Read timed out")?
            .context("Failed to receive response")?;

        if n == 0 {
            anyhow::bail!("The daemon closed the connection without answering");
        }

        let response: IpcResponse =
            serde_json::from_slice(&buffer[..n]).context("Failed to parse response")?;

        Ok(response)
    }
}

/// How far a failed attempt got.
#[derive(Debug)]
enum SendFailure {
    /// Nothing reached the daemon.
    NotSent(anyhow::Error),
    /// The request was written; the daemon may have acted on it.
    Sent(anyhow::Error),
}

// ============================================================================
// Tests
// ============================================================================
