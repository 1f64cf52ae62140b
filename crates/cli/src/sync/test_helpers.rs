// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use kz_core::protocol::{Request, Response, RoomView, StateSnapshot};
use kz_core::room::{ChatEntry, GiftEntry, MoveEntry, Score, Seats};

use super::transport::{Transport, TransportError, TransportResult};

#[derive(Default)]
struct Inner {
    replies: VecDeque<TransportResult<Response>>,
    sent: Vec<Request>,
    notified: Vec<Request>,
}

/// Scripted transport: replies are queued up front, every request is
/// recorded. Clones share the same script and log.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: TransportResult<Response>) {
        self.inner.lock().unwrap().replies.push_back(reply);
    }

    pub fn sent(&self) -> Vec<Request> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn notified(&self) -> Vec<Request> {
        self.inner.lock().unwrap().notified.clone()
    }
}

impl Transport for MockTransport {
    fn call(&mut self, request: &Request) -> TransportResult<Response> {
        let mut inner = self.inner.lock().unwrap();
        inner.sent.push(request.clone());
        inner
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ReceiveFailed("no scripted reply".into())))
    }

    fn notify(&mut self, request: &Request) -> TransportResult<()> {
        self.inner.lock().unwrap().notified.push(request.clone());
        Ok(())
    }
}

pub fn t(secs: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(i64::from(secs))
}

pub fn move_entry(from: &str, to: &str, by: &str) -> MoveEntry {
    MoveEntry {
        from: from.to_string(),
        to: to.to_string(),
        by: Some(by.to_string()),
        t: t(0),
    }
}

pub fn chat_entry(by: &str, text: &str) -> ChatEntry {
    ChatEntry {
        by: Some(by.to_string()),
        text: text.to_string(),
        t: t(0),
    }
}

pub fn gift_entry(by: &str, gift: &str) -> GiftEntry {
    GiftEntry {
        gift: gift.to_string(),
        by: Some(by.to_string()),
        t: t(0),
    }
}

/// An empty room view at the given revision.
pub fn view(rev: u64) -> RoomView {
    RoomView {
        rev,
        fen: None,
        history: Vec::new(),
        chat: Vec::new(),
        gifts: Vec::new(),
        players: Seats::default(),
        names: BTreeMap::new(),
    }
}

/// A snapshot wrapping the given view, game 1, nothing pending.
pub fn snapshot(view: RoomView) -> StateSnapshot {
    StateSnapshot {
        view,
        result: None,
        offer: None,
        score: Score::default(),
        game: 1,
        initial_time_ms: 300_000,
    }
}
