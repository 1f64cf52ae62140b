// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Wire protocol for client-daemon room actions.
//!
//! The protocol is a single request/response endpoint: every request
//! carries an `action` discriminator plus the room it targets; every
//! response is one of a fixed set of tagged shapes. Keeping both sides
//! as tagged enums makes the action set and the error taxonomy
//! exhaustive at compile time.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::room::{
    ChatEntry, GameResult, GiftEntry, MoveEntry, Offer, Score, SeatAssignment, Seats,
};

/// Every action tag the daemon understands, in wire form.
pub const ACTION_NAMES: &[&str] = &[
    "create",
    "join",
    "leave",
    "move",
    "offer",
    "accept_offer",
    "chat",
    "name",
    "gift",
    "state",
    "list",
];

/// Request envelope: the room being targeted, the caller's self-chosen
/// client id, and the action with its fields.
///
/// Action-specific fields are optional at this layer; the service
/// validates them so that, for example, a missing `kind` yields
/// `bad_offer` rather than a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(flatten)]
    pub action: Action,
}

/// The action discriminator and per-action fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Create,
    Join,
    Leave,
    Move {
        #[serde(default)]
        from: Option<String>,
        #[serde(default)]
        to: Option<String>,
        #[serde(default)]
        fen: Option<String>,
    },
    Offer {
        #[serde(default)]
        kind: Option<String>,
    },
    AcceptOffer,
    Chat {
        #[serde(default)]
        text: Option<String>,
    },
    Name {
        #[serde(default)]
        name: Option<String>,
    },
    Gift {
        #[serde(default)]
        gift: Option<String>,
    },
    State {
        #[serde(default)]
        since: u64,
    },
    List,
}

impl Action {
    /// The wire tag, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Join => "join",
            Action::Leave => "leave",
            Action::Move { .. } => "move",
            Action::Offer { .. } => "offer",
            Action::AcceptOffer => "accept_offer",
            Action::Chat { .. } => "chat",
            Action::Name { .. } => "name",
            Action::Gift { .. } => "gift",
            Action::State { .. } => "state",
            Action::List => "list",
        }
    }
}

/// The collection-bearing subset of a room returned by join and by
/// create-on-existing, and embedded in the full state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomView {
    pub rev: u64,
    pub fen: Option<String>,
    pub history: Vec<MoveEntry>,
    pub chat: Vec<ChatEntry>,
    pub gifts: Vec<GiftEntry>,
    pub players: Seats,
    pub names: BTreeMap<String, String>,
}

/// Everything `state` returns when the caller's cursor is behind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateSnapshot {
    #[serde(flatten)]
    pub view: RoomView,
    pub result: Option<GameResult>,
    pub offer: Option<Offer>,
    pub score: Score,
    pub game: u32,
    pub initial_time_ms: u64,
}

/// Per-room summary returned by `list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomSummary {
    pub id: String,
    pub rev: u64,
    pub updated_at: DateTime<Utc>,
    pub has_fen: bool,
}

/// Response sent from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// A fresh room was created; seat w was assigned when a client id
    /// was supplied.
    Created { side: SeatAssignment, rev: u64 },
    /// Create hit an existing room: its snapshot, with no mutation.
    Exists(RoomView),
    /// Join result with the assigned side and the room snapshot. The
    /// rematch counter rides along so late joiners can track game
    /// boundaries from their first snapshot.
    Joined {
        side: SeatAssignment,
        game: u32,
        #[serde(flatten)]
        view: RoomView,
    },
    /// Leave acknowledged; `deleted` reports whether the room was
    /// removed entirely.
    Left { deleted: bool },
    /// A state-changing action landed at this revision.
    Acked { rev: u64 },
    /// The caller's cursor is current; no payload.
    Noop { rev: u64 },
    /// Full room state for a cursor that is behind.
    Snapshot(StateSnapshot),
    /// Room enumeration.
    Rooms { rooms: Vec<RoomSummary> },
    /// Terminal failure for this request.
    Error { error: ErrorCode },
}

impl Response {
    /// The boolean success flag of the protocol.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Response::Error { .. })
    }
}

/// Closed error taxonomy, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MissingAction,
    MissingRoom,
    MissingMoveData,
    RoomNotFound,
    BadOffer,
    NoOffer,
    Empty,
    EmptyName,
    EmptyGift,
    UnknownAction,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingAction => "missing_action",
            ErrorCode::MissingRoom => "missing_room",
            ErrorCode::MissingMoveData => "missing_move_data",
            ErrorCode::RoomNotFound => "room_not_found",
            ErrorCode::BadOffer => "bad_offer",
            ErrorCode::NoOffer => "no_offer",
            ErrorCode::Empty => "empty",
            ErrorCode::EmptyName => "empty_name",
            ErrorCode::EmptyGift => "empty_gift",
            ErrorCode::UnknownAction => "unknown_action",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
