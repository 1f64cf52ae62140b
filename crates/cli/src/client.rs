// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! One-shot IPC client for the kibitzd daemon.
//!
//! Each request dials the socket, sends one framed request, and reads
//! one framed response. Connections are not reused; the daemon keeps no
//! per-connection state, so this keeps the client trivially correct
//! under concurrent use.

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kz_core::protocol::{Action, Request, Response, RoomSummary};
use kz_ipc::framing;

use crate::error::{Error, Result};

/// Connection timeout for daemon communication.
const TIMEOUT_SECS: u64 = 5;

/// A one-shot client for the daemon socket.
pub struct RoomClient {
    socket_path: PathBuf,
}

impl RoomClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        RoomClient {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request and receive its response.
    pub fn call(&self, request: &Request) -> Result<Response> {
        let mut stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| Error::Daemon(format!("failed to connect to daemon: {}", e)))?;
        stream
            .set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set read timeout: {}", e)))?;
        stream
            .set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS)))
            .map_err(|e| Error::Daemon(format!("failed to set write timeout: {}", e)))?;

        framing::write_message(&mut stream, request)
            .map_err(|e| Error::Daemon(format!("failed to send request: {}", e)))?;
        framing::read_message(&mut stream)
            .map_err(|e| Error::Daemon(format!("failed to read response: {}", e)))
    }

    /// Send a request and lift protocol errors into [`Error::Server`].
    pub fn call_ok(&self, request: &Request) -> Result<Response> {
        match self.call(request)? {
            Response::Error { error } => Err(Error::Server(error)),
            response => Ok(response),
        }
    }

    /// Enumerate all rooms known to the daemon.
    pub fn list(&self) -> Result<Vec<RoomSummary>> {
        let request = Request {
            // The envelope requires a room; "*" is conventional for list.
            room: "*".to_string(),
            client_id: None,
            action: Action::List,
        };
        match self.call_ok(&request)? {
            Response::Rooms { rooms } => Ok(rooms),
            other => Err(Error::Daemon(format!("unexpected response: {:?}", other))),
        }
    }
}
