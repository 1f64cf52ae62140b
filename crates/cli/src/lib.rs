// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! kzrs - Client library for the kibitz room daemon.
//!
//! This crate provides the client side of the room synchronization
//! engine behind the `kibitz` CLI tool.
//!
//! # Main Components
//!
//! - [`RoomClient`] - One-shot request/response client over the daemon socket
//! - [`sync::SyncClient`] - Polling replication client that turns room
//!   snapshots into a stream of [`sync::RoomEvent`]s
//! - [`Config`] - User configuration (socket path, poll interval, display name)
//! - [`Error`] - Error types for all operations

mod cli;
mod commands;

pub mod client;
pub mod config;
pub mod error;
pub mod ident;
pub mod sync;

pub use cli::{Cli, Command};
pub use client::RoomClient;
pub use commands::run;
pub use config::Config;
pub use error::{Error, Result};
