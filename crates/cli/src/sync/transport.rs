// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Transport abstraction for daemon communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real Unix-socket connections for production
//! - Mock transports for unit testing

use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

use kz_core::protocol::{Request, Response};
use kz_ipc::framing;

/// Error type for transport operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport trait for request/response communication with the daemon.
pub trait Transport: Send {
    /// Send a request and wait for its response.
    fn call(&mut self, request: &Request) -> TransportResult<Response>;

    /// Send a request without waiting for a response. Used on shutdown
    /// paths where the answer no longer matters.
    fn notify(&mut self, request: &Request) -> TransportResult<()>;
}

/// Unix-socket transport dialing the daemon once per request.
pub struct UnixTransport {
    socket_path: PathBuf,
    timeout: Duration,
}

impl UnixTransport {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        UnixTransport {
            socket_path: socket_path.into(),
            timeout: Duration::from_secs(5),
        }
    }

    fn connect(&self) -> TransportResult<UnixStream> {
        let stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(stream)
    }
}

impl Transport for UnixTransport {
    fn call(&mut self, request: &Request) -> TransportResult<Response> {
        let mut stream = self.connect()?;
        framing::write_message(&mut stream, request)
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        framing::read_message(&mut stream).map_err(|e| TransportError::ReceiveFailed(e.to_string()))
    }

    fn notify(&mut self, request: &Request) -> TransportResult<()> {
        let mut stream = self.connect()?;
        framing::write_message(&mut stream, request)
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}
