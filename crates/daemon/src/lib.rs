// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! kibitzd - The kibitz room daemon.
//!
//! Owns the flat-file room store and listens on a Unix socket for
//! framed JSON requests from `kibitz` clients. The server itself lives
//! in [`server`] so tests can run a daemon in-process.

pub mod server;

pub use server::{start, ServerConfig, ServerHandle};
