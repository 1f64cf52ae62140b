// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Error types for client operations.

use kz_core::protocol::ErrorCode;
use thiserror::Error;

/// All possible errors that can occur on the client side.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to reach or talk to the daemon.
    #[error("daemon error: {0}")]
    Daemon(String),

    /// The daemon answered with a protocol error.
    #[error("server error: {0}")]
    Server(ErrorCode),

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
