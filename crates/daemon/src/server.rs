// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Unix-socket server: one accept loop, one thread per connection.
//!
//! Each connection carries any number of framed requests; the server
//! answers every frame with exactly one framed response and keeps the
//! connection open until the peer closes it or a read times out. All
//! room state lives in the store, so connection threads share nothing
//! but the service.

use std::fs;
use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kz_core::protocol::Response;
use kz_core::{RoomService, RoomStore};
use kz_ipc::{decode_request, framing};

/// Per-connection read/write timeout.
const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for starting a room daemon.
pub struct ServerConfig {
    /// Where the listening socket is created.
    pub socket_path: PathBuf,
    /// Directory holding the room documents.
    pub rooms_dir: PathBuf,
}

/// Handle returned by [`start`] to control the running server.
pub struct ServerHandle {
    socket_path: PathBuf,
    keep_running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ServerHandle {
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Signal the server to stop and wait for the accept loop to exit.
    pub fn stop(mut self) {
        self.keep_running.store(false, Ordering::SeqCst);
        // The accept loop blocks in accept(); poke it awake.
        let _ = UnixStream::connect(&self.socket_path);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        let _ = fs::remove_file(&self.socket_path);
    }

    /// Block until the accept loop exits on its own.
    pub fn wait(mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
        let _ = fs::remove_file(&self.socket_path);
    }
}

/// Bind the socket and start serving on a background thread.
pub fn start(config: ServerConfig) -> io::Result<ServerHandle> {
    let store = RoomStore::open(&config.rooms_dir).map_err(io::Error::other)?;
    let service = Arc::new(RoomService::new(store));

    // Remove stale socket if it exists
    let _ = fs::remove_file(&config.socket_path);
    let listener = UnixListener::bind(&config.socket_path)?;

    let keep_running = Arc::new(AtomicBool::new(true));
    let keep_running_accept = keep_running.clone();
    let thread = thread::spawn(move || {
        accept_loop(listener, service, keep_running_accept);
    });

    tracing::info!("listening on {}", config.socket_path.display());

    Ok(ServerHandle {
        socket_path: config.socket_path,
        keep_running,
        thread: Some(thread),
    })
}

fn accept_loop(
    listener: UnixListener,
    service: Arc<RoomService>,
    keep_running: Arc<AtomicBool>,
) {
    for stream in listener.incoming() {
        if !keep_running.load(Ordering::SeqCst) {
            break;
        }
        match stream {
            Ok(stream) => {
                let service = Arc::clone(&service);
                thread::spawn(move || serve_connection(stream, &service));
            }
            Err(e) => {
                tracing::warn!("failed to accept connection: {}", e);
            }
        }
    }
}

/// Answer framed requests on one connection until EOF or timeout.
fn serve_connection(mut stream: UnixStream, service: &RoomService) {
    let _ = stream.set_read_timeout(Some(IO_TIMEOUT));
    let _ = stream.set_write_timeout(Some(IO_TIMEOUT));

    loop {
        let body = match framing::read_frame(&mut stream) {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return,
            Err(e) => {
                tracing::warn!("failed to read request: {}", e);
                return;
            }
        };
        let response = handle_frame(service, &body);
        if framing::write_message(&mut stream, &response).is_err() {
            return;
        }
    }
}

/// Decode, dispatch, and map failures onto the wire error taxonomy.
fn handle_frame(service: &RoomService, body: &[u8]) -> Response {
    let req = match decode_request(body) {
        Ok(req) => req,
        Err(code) => {
            tracing::debug!("rejected request envelope: {}", code);
            return Response::Error { error: code };
        }
    };
    tracing::debug!(room = %req.room, action = req.action.name(), "request");
    match service.handle(&req) {
        Ok(response) => response,
        Err(e) if e.is_infrastructure() => {
            tracing::warn!(room = %req.room, action = req.action.name(), "storage failure: {}", e);
            Response::Error { error: e.code() }
        }
        Err(e) => {
            tracing::debug!(room = %req.room, action = req.action.name(), "rejected: {}", e);
            Response::Error { error: e.code() }
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
