// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! User configuration management.
//!
//! Configuration is stored in `<config dir>/kibitz/config.toml` and
//! includes:
//! - `socket`: Path to the daemon socket (defaults to the state dir)
//! - `poll_interval_ms`: Polling cadence for watch sessions
//! - `name`: Display name announced when joining a room

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const CONFIG_DIR_NAME: &str = "kibitz";
const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_DIR_NAME: &str = "kibitz";
const SOCKET_NAME: &str = "daemon.sock";

fn default_poll_interval_ms() -> u64 {
    1000
}

/// User configuration loaded from `config.toml`. Every field is
/// optional; a missing file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Path to the daemon socket.
    pub socket: Option<PathBuf>,
    /// Polling cadence for watch sessions, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Display name announced when joining a room.
    pub name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            socket: None,
            poll_interval_ms: default_poll_interval_ms(),
            name: None,
        }
    }
}

impl Config {
    /// Load the configuration from the default location. A missing file
    /// is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// The socket to dial: the configured one, or the daemon's default.
    pub fn socket_path(&self) -> PathBuf {
        self.socket.clone().unwrap_or_else(default_socket_path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Where `Config::load` looks for the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// The daemon's default socket path, mirroring its state-dir layout.
pub fn default_socket_path() -> PathBuf {
    let state = if let Some(dir) = dirs::state_dir() {
        dir.join(STATE_DIR_NAME)
    } else {
        dirs::home_dir()
            .map(|h| h.join(".local/state").join(STATE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".local/state").join(STATE_DIR_NAME))
    };
    state.join(SOCKET_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
