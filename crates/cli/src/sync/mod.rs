// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Room replication for watch sessions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Client    │────►│  Transport  │────►│   kibitzd   │
//! │ (SyncClient)│◄────│   (trait)   │◄────│   daemon    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼ mpsc::Sender<RoomEvent>
//! ```
//!
//! The client polls `state` with its revision cursor, diffs each
//! snapshot against length bookmarks, and emits one [`RoomEvent`] per
//! observed change. The transport is a trait so tests can script the
//! daemon side.

mod client;
mod transport;

pub use client::{RoomEvent, SyncClient, SyncConfig, SyncError};
pub use transport::{Transport, TransportError, TransportResult, UnixTransport};

#[cfg(test)]
mod test_helpers;


#[cfg(test)]
mod transport_tests;
