// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! The room document and its supporting types.
//!
//! A [`Room`] is the persistent unit of shared game state: one document
//! per room id, carrying the opaque board position, the append-only
//! history/chat/gift collections, seat assignments, and the negotiation
//! state. The board position string is stored and relayed without any
//! interpretation; legality belongs to the rules engine on the client.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default clock budget for a fresh room, in milliseconds.
pub const DEFAULT_INITIAL_TIME_MS: u64 = 300_000;

/// Display names are truncated to this many characters.
pub const MAX_NAME_CHARS: usize = 40;

/// One of the two player roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::White => "w",
            Side::Black => "b",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a joining client was given: a seat, or spectator standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatAssignment {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
    #[serde(rename = "s")]
    Spectator,
}

impl SeatAssignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatAssignment::White => "w",
            SeatAssignment::Black => "b",
            SeatAssignment::Spectator => "s",
        }
    }
}

impl fmt::Display for SeatAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a pending proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    Draw,
    Resign,
    Rematch,
}

impl OfferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferKind::Draw => "draw",
            OfferKind::Resign => "resign",
            OfferKind::Rematch => "rematch",
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OfferKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "draw" => Ok(OfferKind::Draw),
            "resign" => Ok(OfferKind::Resign),
            "rematch" => Ok(OfferKind::Rematch),
            _ => Err(Error::BadOffer(s.to_string())),
        }
    }
}

/// Final result of one game within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }

    /// The result awarded when `winner` wins by resignation.
    pub fn win_for(winner: Side) -> GameResult {
        match winner {
            Side::White => GameResult::WhiteWins,
            Side::Black => GameResult::BlackWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One move appended to the room history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveEntry {
    pub from: String,
    pub to: String,
    pub by: Option<String>,
    pub t: DateTime<Utc>,
}

/// One chat line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatEntry {
    pub by: Option<String>,
    pub text: String,
    pub t: DateTime<Utc>,
}

/// One gift sent into the room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GiftEntry {
    pub gift: String,
    pub by: Option<String>,
    pub t: DateTime<Utc>,
}

/// The singleton pending proposal awaiting acceptance.
///
/// A new offer silently replaces an unaccepted one; there is no reject
/// or expiry transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub kind: OfferKind,
    pub by: Option<String>,
    pub t: DateTime<Utc>,
}

/// Seat occupancy: at most one client id per seat.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Seats {
    pub w: Option<String>,
    pub b: Option<String>,
}

impl Seats {
    pub fn both_empty(&self) -> bool {
        self.w.is_none() && self.b.is_none()
    }

    /// Clear any seat held by the given client id.
    pub fn vacate(&mut self, client_id: &str) {
        if self.w.as_deref() == Some(client_id) {
            self.w = None;
        }
        if self.b.as_deref() == Some(client_id) {
            self.b = None;
        }
    }
}

/// Cumulative score across rematches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub w: u32,
    pub b: u32,
}

impl Score {
    pub fn award(&mut self, winner: Side) {
        match winner {
            Side::White => self.w += 1,
            Side::Black => self.b += 1,
        }
    }
}

/// Persistent unit of shared game state, keyed by sanitized room id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Monotonic revision; doubles as the client polling cursor.
    pub rev: u64,
    /// Opaque board-position string; never validated here.
    pub fen: Option<String>,
    pub history: Vec<MoveEntry>,
    pub chat: Vec<ChatEntry>,
    #[serde(default)]
    pub gifts: Vec<GiftEntry>,
    pub players: Seats,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// Privileged for deletion: the room dies when its creator leaves.
    pub creator: Option<String>,
    pub initial_time_ms: u64,
    pub result: Option<GameResult>,
    pub offer: Option<Offer>,
    pub score: Score,
    /// Rematch counter, starting at 1.
    pub game: u32,
}

impl Room {
    /// A fresh room: rev 1, empty collections, both seats free.
    pub fn new(id: &str, creator: Option<String>, now: DateTime<Utc>) -> Self {
        Room {
            id: id.to_string(),
            created_at: now,
            updated_at: now,
            rev: 1,
            fen: None,
            history: Vec::new(),
            chat: Vec::new(),
            gifts: Vec::new(),
            players: Seats::default(),
            names: BTreeMap::new(),
            creator,
            initial_time_ms: DEFAULT_INITIAL_TIME_MS,
            result: None,
            offer: None,
            score: Score::default(),
            game: 1,
        }
    }

    /// Advance the revision by exactly one and touch `updated_at`.
    ///
    /// Called by every state-changing action; join/leave touch
    /// `updated_at` directly without bumping.
    pub fn bump(&mut self, now: DateTime<Utc>) {
        self.rev += 1;
        self.updated_at = now;
    }
}

#[cfg(test)]
#[path = "room_tests.rs"]
mod tests;
