// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! kz-core: Shared library for the kibitz room synchronization engine
//!
//! This crate provides the room data model, the file-backed room store,
//! the action dispatch service, and the wire protocol types used by both
//! the `kibitz` client and the `kibitzd` daemon.

pub mod clock;
pub mod error;
pub mod protocol;
pub mod room;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use protocol::{Action, ErrorCode, Request, Response, RoomSummary};
pub use room::{GameResult, Offer, OfferKind, Room, Score, SeatAssignment, Seats, Side};
pub use service::RoomService;
pub use store::RoomStore;
