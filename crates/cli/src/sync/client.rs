// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Polling replication client.
//!
//! [`SyncClient`] joins one room and turns the daemon's snapshots into
//! a stream of [`RoomEvent`]s. Replication is cursor-based: every poll
//! sends `state { since: rev }`, and a returned snapshot is diffed
//! against three length bookmarks (history, chat, gifts). Entries the
//! client authored itself are not re-emitted (echo suppression), since
//! the caller already observed them when it sent them.
//!
//! A failed or non-success poll skips the tick and tries again on the
//! next one; the cursor makes missed ticks harmless because the next
//! snapshot carries everything since the last applied revision.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Duration;

use kz_core::protocol::{Action, ErrorCode, Request, Response, StateSnapshot};
use kz_core::room::{GameResult, OfferKind, Score, SeatAssignment, Seats};

use super::transport::{Transport, TransportError};

/// Error type for sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The daemon answered with a protocol error.
    #[error("server error: {0}")]
    Server(ErrorCode),

    /// The daemon answered with a shape the action never produces.
    #[error("unexpected response: {0:?}")]
    Unexpected(Response),

    /// The event receiver went away.
    #[error("event channel closed")]
    ChannelClosed,
}

/// Configuration for a sync session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Polling cadence for [`SyncClient::run`].
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// One observed change in the watched room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Our own seat, reported once on create/join.
    Assigned { side: SeatAssignment },
    /// The full board position, reported when joining a room mid-game.
    State { fen: String },
    /// A move made by another client.
    Move {
        from: String,
        to: String,
        fen: Option<String>,
    },
    /// A chat line from another client.
    Chat { by: Option<String>, text: String },
    /// A gift sent by another client.
    Gift { by: Option<String>, gift: String },
    /// The full display-name map.
    Names(BTreeMap<String, String>),
    /// The full seat occupancy.
    Players(Seats),
    /// A proposal is pending.
    Offer {
        kind: OfferKind,
        by: Option<String>,
    },
    /// The pending proposal went away (accepted or superseded).
    OfferCleared,
    /// The game has a result.
    Result(GameResult),
    /// The cumulative score across rematches.
    Score(Score),
}

/// Replicates one room over a [`Transport`], emitting [`RoomEvent`]s.
pub struct SyncClient<T: Transport> {
    transport: T,
    events: Sender<RoomEvent>,
    config: SyncConfig,
    client_id: String,
    room: String,
    rev: u64,
    history_len: usize,
    chat_len: usize,
    gifts_len: usize,
    /// Last seen game counter; 0 until a join or snapshot reports one.
    game: u32,
    offer_pending: bool,
    left: bool,
}

impl<T: Transport> SyncClient<T> {
    pub fn new(
        transport: T,
        room: impl Into<String>,
        client_id: impl Into<String>,
        events: Sender<RoomEvent>,
    ) -> Self {
        SyncClient {
            transport,
            events,
            config: SyncConfig::default(),
            client_id: client_id.into(),
            room: room.into(),
            rev: 0,
            history_len: 0,
            chat_len: 0,
            gifts_len: 0,
            game: 0,
            offer_pending: false,
            left: false,
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    fn request(&self, action: Action) -> Request {
        Request {
            room: self.room.clone(),
            client_id: Some(self.client_id.clone()),
            action,
        }
    }

    fn emit(&self, event: RoomEvent) -> Result<(), SyncError> {
        self.events.send(event).map_err(|_| SyncError::ChannelClosed)
    }

    /// Create the room and take seat w. When the room already exists
    /// this falls through to [`join`](Self::join) so seat assignment
    /// stays correct.
    pub fn create(&mut self) -> Result<SeatAssignment, SyncError> {
        match self.transport.call(&self.request(Action::Create))? {
            Response::Created { side, rev } => {
                self.rev = rev;
                self.emit(RoomEvent::Assigned { side })?;
                Ok(side)
            }
            Response::Exists(_) => self.join(),
            Response::Error { error } => Err(SyncError::Server(error)),
            other => Err(SyncError::Unexpected(other)),
        }
    }

    /// Join the room, priming the cursor and bookmarks from the reply.
    pub fn join(&mut self) -> Result<SeatAssignment, SyncError> {
        match self.transport.call(&self.request(Action::Join))? {
            Response::Joined { side, game, view } => {
                self.rev = view.rev;
                self.game = game;
                self.history_len = view.history.len();
                self.chat_len = view.chat.len();
                self.gifts_len = view.gifts.len();
                self.emit(RoomEvent::Assigned { side })?;
                if let Some(fen) = view.fen {
                    self.emit(RoomEvent::State { fen })?;
                }
                self.emit(RoomEvent::Players(view.players))?;
                self.emit(RoomEvent::Names(view.names))?;
                Ok(side)
            }
            Response::Error { error } => Err(SyncError::Server(error)),
            other => Err(SyncError::Unexpected(other)),
        }
    }

    fn acked(&mut self, action: Action) -> Result<u64, SyncError> {
        match self.transport.call(&self.request(action))? {
            Response::Acked { rev } => {
                // Our own write; the next poll sees rev as current and
                // noops instead of echoing it back.
                self.rev = rev;
                Ok(rev)
            }
            Response::Error { error } => Err(SyncError::Server(error)),
            other => Err(SyncError::Unexpected(other)),
        }
    }

    pub fn send_move(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        fen: impl Into<String>,
    ) -> Result<u64, SyncError> {
        self.acked(Action::Move {
            from: Some(from.into()),
            to: Some(to.into()),
            fen: Some(fen.into()),
        })
    }

    pub fn send_chat(&mut self, text: impl Into<String>) -> Result<u64, SyncError> {
        self.acked(Action::Chat {
            text: Some(text.into()),
        })
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<u64, SyncError> {
        self.acked(Action::Name {
            name: Some(name.into()),
        })
    }

    pub fn send_gift(&mut self, gift: impl Into<String>) -> Result<u64, SyncError> {
        self.acked(Action::Gift {
            gift: Some(gift.into()),
        })
    }

    pub fn offer(&mut self, kind: OfferKind) -> Result<u64, SyncError> {
        self.acked(Action::Offer {
            kind: Some(kind.as_str().to_string()),
        })
    }

    pub fn accept_offer(&mut self) -> Result<u64, SyncError> {
        self.acked(Action::AcceptOffer)
    }

    /// Leave the room and wait for the reply. Returns whether the room
    /// was deleted.
    pub fn leave(&mut self) -> Result<bool, SyncError> {
        let result = match self.transport.call(&self.request(Action::Leave))? {
            Response::Left { deleted } => Ok(deleted),
            Response::Error { error } => Err(SyncError::Server(error)),
            other => Err(SyncError::Unexpected(other)),
        };
        self.left = true;
        result
    }

    /// Best-effort leave for shutdown paths: write the request, never
    /// read the response, surface no error.
    pub fn leave_detached(&mut self) {
        if self.left {
            return;
        }
        self.left = true;
        let _ = self.transport.notify(&self.request(Action::Leave));
    }

    /// One poll of the room. Returns whether a snapshot was applied.
    ///
    /// Transport failures and protocol errors skip the tick; the cursor
    /// guarantees the next successful poll carries everything missed.
    pub fn poll_once(&mut self) -> Result<bool, SyncError> {
        let request = Request {
            room: self.room.clone(),
            client_id: None,
            action: Action::State { since: self.rev },
        };
        match self.transport.call(&request) {
            Ok(Response::Snapshot(snapshot)) => {
                self.apply_snapshot(snapshot)?;
                Ok(true)
            }
            Ok(Response::Noop { .. }) => Ok(false),
            Ok(Response::Error { error }) => {
                tracing::debug!(room = %self.room, "poll rejected: {}", error);
                Ok(false)
            }
            Ok(other) => Err(SyncError::Unexpected(other)),
            Err(e) => {
                tracing::debug!(room = %self.room, "poll failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Diff a snapshot against the bookmarks and emit events.
    fn apply_snapshot(&mut self, snapshot: StateSnapshot) -> Result<(), SyncError> {
        // A rematch truncates history on the server; reset the bookmark
        // when the game counter moves so the new game diffs from zero.
        if self.game != 0 && snapshot.game != self.game {
            self.history_len = 0;
        }
        self.game = snapshot.game;

        // A collection shorter than its bookmark means the server state
        // was rebuilt under us; fall back to its current length.
        let view = snapshot.view;
        self.history_len = self.history_len.min(view.history.len());
        self.chat_len = self.chat_len.min(view.chat.len());
        self.gifts_len = self.gifts_len.min(view.gifts.len());

        for entry in &view.history[self.history_len..] {
            if entry.by.as_deref() != Some(self.client_id.as_str()) {
                self.emit(RoomEvent::Move {
                    from: entry.from.clone(),
                    to: entry.to.clone(),
                    fen: view.fen.clone(),
                })?;
            }
        }
        self.history_len = view.history.len();

        for entry in &view.chat[self.chat_len..] {
            if entry.by.as_deref() != Some(self.client_id.as_str()) {
                self.emit(RoomEvent::Chat {
                    by: entry.by.clone(),
                    text: entry.text.clone(),
                })?;
            }
        }
        self.chat_len = view.chat.len();

        for entry in &view.gifts[self.gifts_len..] {
            if entry.by.as_deref() != Some(self.client_id.as_str()) {
                self.emit(RoomEvent::Gift {
                    by: entry.by.clone(),
                    gift: entry.gift.clone(),
                })?;
            }
        }
        self.gifts_len = view.gifts.len();

        self.emit(RoomEvent::Players(view.players))?;
        self.emit(RoomEvent::Names(view.names))?;
        self.emit(RoomEvent::Score(snapshot.score))?;

        match snapshot.offer {
            Some(offer) => {
                self.offer_pending = true;
                self.emit(RoomEvent::Offer {
                    kind: offer.kind,
                    by: offer.by,
                })?;
            }
            None if self.offer_pending => {
                self.offer_pending = false;
                self.emit(RoomEvent::OfferCleared)?;
            }
            None => {}
        }

        if let Some(result) = snapshot.result {
            self.emit(RoomEvent::Result(result))?;
        }

        self.rev = view.rev;
        Ok(())
    }

    /// Sequential polling loop: sleep, poll, repeat until `stop` is set
    /// or the event receiver goes away. At most one poll is ever in
    /// flight.
    pub fn run(&mut self, stop: &AtomicBool) {
        while !stop.load(Ordering::SeqCst) {
            std::thread::sleep(self.config.poll_interval);
            if stop.load(Ordering::SeqCst) {
                break;
            }
            match self.poll_once() {
                Ok(_) => {}
                Err(SyncError::ChannelClosed) => break,
                Err(e) => {
                    tracing::debug!(room = %self.room, "poll error: {}", e);
                }
            }
        }
    }
}

impl<T: Transport> Drop for SyncClient<T> {
    fn drop(&mut self) {
        self.leave_detached();
    }
}
