// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Shared harness for end-to-end specs: an in-process daemon on a
//! temporary socket with its own room store.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use kibitzd::{start, ServerConfig, ServerHandle};

pub struct TestServer {
    // Held for its Drop; the daemon's store lives inside it.
    _dir: tempfile::TempDir,
    socket_path: PathBuf,
    handle: Option<ServerHandle>,
}

impl TestServer {
    pub fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("daemon.sock");
        let handle = start(ServerConfig {
            socket_path: socket_path.clone(),
            rooms_dir: dir.path().join("rooms"),
        })
        .unwrap();
        TestServer {
            _dir: dir,
            socket_path,
            handle: Some(handle),
        }
    }

    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }
}
