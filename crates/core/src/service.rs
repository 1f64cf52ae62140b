// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Action handlers for the room service.
//!
//! [`RoomService`] is a stateless dispatcher over [`RoomStore`]: each
//! handler validates its fields, then runs as a single atomic
//! read-modify-write transaction against the store. Holding the room
//! lock across the whole handler is what prevents two racing writers
//! from both reading revision N and writing N+1.

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::protocol::{Action, Request, Response, RoomView, StateSnapshot};
use crate::room::{
    ChatEntry, GameResult, GiftEntry, MoveEntry, Offer, OfferKind, Room, SeatAssignment, Side,
    MAX_NAME_CHARS,
};
use crate::store::{Commit, RoomStore};

/// Stateless action dispatcher over a room store.
pub struct RoomService<C: Clock = SystemClock> {
    store: RoomStore,
    clock: C,
}

impl RoomService<SystemClock> {
    pub fn new(store: RoomStore) -> Self {
        RoomService {
            store,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> RoomService<C> {
    /// A service with an injected clock, for deterministic tests.
    pub fn with_clock(store: RoomStore, clock: C) -> Self {
        RoomService { store, clock }
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// Dispatch a decoded request to its handler.
    pub fn handle(&self, req: &Request) -> Result<Response> {
        let room = req.room.as_str();
        let client_id = req.client_id.as_deref();
        match &req.action {
            Action::Create => self.create(room, client_id),
            Action::Join => self.join(room, client_id),
            Action::Leave => self.leave(room, client_id),
            Action::Move { from, to, fen } => self.append_move(
                room,
                client_id,
                from.as_deref(),
                to.as_deref(),
                fen.as_deref(),
            ),
            Action::Offer { kind } => self.offer(room, client_id, kind.as_deref()),
            Action::AcceptOffer => self.accept_offer(room),
            Action::Chat { text } => self.chat(room, client_id, text.as_deref()),
            Action::Name { name } => self.set_name(room, client_id, name.as_deref()),
            Action::Gift { gift } => self.gift(room, client_id, gift.as_deref()),
            Action::State { since } => self.state(room, *since),
            Action::List => self.list(),
        }
    }

    /// Create a room, or report the existing one without mutating it.
    fn create(&self, room_id: &str, client_id: Option<&str>) -> Result<Response> {
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            if let Some(room) = existing {
                return Ok((Commit::Keep, Response::Exists(view_of(&room))));
            }
            let mut room = Room::new(room_id, client_id.map(str::to_owned), now);
            if let Some(id) = client_id {
                room.players.w = Some(id.to_string());
            }
            let rev = room.rev;
            Ok((
                Commit::Write(room),
                Response::Created {
                    side: SeatAssignment::White,
                    rev,
                },
            ))
        })
    }

    /// Join a room, auto-creating it when absent. Seats are handed out
    /// in order: w, then b, then spectator standing.
    fn join(&self, room_id: &str, client_id: Option<&str>) -> Result<Response> {
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let mut room = existing
                .unwrap_or_else(|| Room::new(room_id, client_id.map(str::to_owned), now));
            let mut side = SeatAssignment::Spectator;
            if let Some(id) = client_id {
                if room.players.w.is_none() {
                    room.players.w = Some(id.to_string());
                    side = SeatAssignment::White;
                } else if room.players.b.is_none() {
                    room.players.b = Some(id.to_string());
                    side = SeatAssignment::Black;
                }
            }
            room.updated_at = now;
            let game = room.game;
            let view = view_of(&room);
            Ok((Commit::Write(room), Response::Joined { side, game, view }))
        })
    }

    /// Vacate any seat held by the caller. The room is deleted outright
    /// when the creator leaves (privacy), or when both seats end up
    /// empty; a missing room or client id is a successful no-op.
    fn leave(&self, room_id: &str, client_id: Option<&str>) -> Result<Response> {
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let (Some(mut room), Some(id)) = (existing, client_id) else {
                return Ok((Commit::Keep, Response::Left { deleted: false }));
            };
            room.players.vacate(id);
            room.updated_at = now;
            if room.creator.as_deref() == Some(id) {
                return Ok((Commit::Delete, Response::Left { deleted: true }));
            }
            if room.players.both_empty() {
                return Ok((Commit::Delete, Response::Left { deleted: true }));
            }
            Ok((Commit::Write(room), Response::Left { deleted: false }))
        })
    }

    fn append_move(
        &self,
        room_id: &str,
        client_id: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        fen: Option<&str>,
    ) -> Result<Response> {
        let (Some(from), Some(to), Some(fen)) = (
            from.filter(|s| !s.is_empty()),
            to.filter(|s| !s.is_empty()),
            fen.filter(|s| !s.is_empty()),
        ) else {
            return Err(Error::MissingMoveData);
        };
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let Some(mut room) = existing else {
                return Err(Error::RoomNotFound);
            };
            room.history.push(MoveEntry {
                from: from.to_string(),
                to: to.to_string(),
                by: client_id.map(str::to_owned),
                t: now,
            });
            room.fen = Some(fen.to_string());
            room.bump(now);
            let rev = room.rev;
            Ok((Commit::Write(room), Response::Acked { rev }))
        })
    }

    /// Replace the pending proposal; a new offer silently supersedes an
    /// unaccepted one.
    fn offer(&self, room_id: &str, client_id: Option<&str>, kind: Option<&str>) -> Result<Response> {
        let kind: OfferKind = kind.unwrap_or_default().parse()?;
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let Some(mut room) = existing else {
                return Err(Error::RoomNotFound);
            };
            room.offer = Some(Offer {
                kind,
                by: client_id.map(str::to_owned),
                t: now,
            });
            room.bump(now);
            let rev = room.rev;
            Ok((Commit::Write(room), Response::Acked { rev }))
        })
    }

    /// Resolve the pending proposal. Draw sets the result; resign awards
    /// the opposite seat and the score; rematch starts the next game.
    fn accept_offer(&self, room_id: &str) -> Result<Response> {
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let Some(mut room) = existing else {
                return Err(Error::NoOffer);
            };
            let Some(offer) = room.offer.take() else {
                return Err(Error::NoOffer);
            };
            match offer.kind {
                OfferKind::Draw => {
                    room.result = Some(GameResult::Draw);
                }
                OfferKind::Resign => {
                    // Winner is the seat opposite the offerer. There is no
                    // session binding, so a caller asserting a seated id
                    // resigns that seat; an offerer matching neither seat
                    // awards white.
                    let winner = if room.players.w == offer.by {
                        Side::Black
                    } else {
                        Side::White
                    };
                    room.result = Some(GameResult::win_for(winner));
                    room.score.award(winner);
                }
                OfferKind::Rematch => {
                    room.game += 1;
                    room.history.clear();
                    room.fen = None;
                    room.result = None;
                }
            }
            room.bump(now);
            let rev = room.rev;
            Ok((Commit::Write(room), Response::Acked { rev }))
        })
    }

    fn chat(&self, room_id: &str, client_id: Option<&str>, text: Option<&str>) -> Result<Response> {
        let text = text.unwrap_or_default().trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let Some(mut room) = existing else {
                return Err(Error::RoomNotFound);
            };
            room.chat.push(ChatEntry {
                by: client_id.map(str::to_owned),
                text: text.to_string(),
                t: now,
            });
            room.bump(now);
            let rev = room.rev;
            Ok((Commit::Write(room), Response::Acked { rev }))
        })
    }

    fn set_name(
        &self,
        room_id: &str,
        client_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Response> {
        let name = name.unwrap_or_default().trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        let name: String = name.chars().take(MAX_NAME_CHARS).collect();
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let Some(mut room) = existing else {
                return Err(Error::RoomNotFound);
            };
            room.names
                .insert(client_id.unwrap_or_default().to_string(), name);
            room.bump(now);
            let rev = room.rev;
            Ok((Commit::Write(room), Response::Acked { rev }))
        })
    }

    fn gift(&self, room_id: &str, client_id: Option<&str>, gift: Option<&str>) -> Result<Response> {
        let gift = gift.unwrap_or_default().trim();
        if gift.is_empty() {
            return Err(Error::EmptyGift);
        }
        let now = self.clock.now();
        self.store.update(room_id, |existing| {
            let Some(mut room) = existing else {
                return Err(Error::RoomNotFound);
            };
            room.gifts.push(GiftEntry {
                gift: gift.to_string(),
                by: client_id.map(str::to_owned),
                t: now,
            });
            room.bump(now);
            let rev = room.rev;
            Ok((Commit::Write(room), Response::Acked { rev }))
        })
    }

    /// Read-only poll: a caller whose cursor is current gets a bare
    /// `noop` instead of the snapshot.
    fn state(&self, room_id: &str, since: u64) -> Result<Response> {
        let Some(room) = self.store.read(room_id)? else {
            return Err(Error::RoomNotFound);
        };
        if since > 0 && room.rev <= since {
            return Ok(Response::Noop { rev: room.rev });
        }
        Ok(Response::Snapshot(snapshot_of(&room)))
    }

    fn list(&self) -> Result<Response> {
        Ok(Response::Rooms {
            rooms: self.store.list()?,
        })
    }
}

fn view_of(room: &Room) -> RoomView {
    RoomView {
        rev: room.rev,
        fen: room.fen.clone(),
        history: room.history.clone(),
        chat: room.chat.clone(),
        gifts: room.gifts.clone(),
        players: room.players.clone(),
        names: room.names.clone(),
    }
}

fn snapshot_of(room: &Room) -> StateSnapshot {
    StateSnapshot {
        view: view_of(room),
        result: room.result,
        offer: room.offer.clone(),
        score: room.score,
        game: room.game,
        initial_time_ms: room.initial_time_ms,
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
