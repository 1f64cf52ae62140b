// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Full two-player session against a real daemon over a real socket.

#![allow(clippy::unwrap_used)]

use std::sync::mpsc::{self, Receiver};

use kzrs::sync::{RoomEvent, SyncClient, UnixTransport};
use kzrs::RoomClient;
use kz_core::room::{GameResult, OfferKind, SeatAssignment};
use specs::TestServer;

fn client(
    server: &TestServer,
    room: &str,
    id: &str,
) -> (SyncClient<UnixTransport>, Receiver<RoomEvent>) {
    let (tx, rx) = mpsc::channel();
    let client = SyncClient::new(UnixTransport::new(server.socket_path()), room, id, tx);
    (client, rx)
}

fn drain(rx: &Receiver<RoomEvent>) -> Vec<RoomEvent> {
    rx.try_iter().collect()
}

#[test]
fn two_players_see_each_other() {
    let server = TestServer::start();
    let (mut alice, alice_rx) = client(&server, "match-1", "ida");
    let (mut bob, bob_rx) = client(&server, "match-1", "idb");

    assert_eq!(alice.create().unwrap(), SeatAssignment::White);
    assert_eq!(bob.join().unwrap(), SeatAssignment::Black);
    drain(&alice_rx);
    drain(&bob_rx);

    // Alice announces a name and plays the first move.
    alice.set_name("Alice").unwrap();
    alice.send_move("e2", "e4", "FEN-e4").unwrap();

    assert!(bob.poll_once().unwrap());
    let events = drain(&bob_rx);
    assert!(events.contains(&RoomEvent::Move {
        from: "e2".into(),
        to: "e4".into(),
        fen: Some("FEN-e4".into()),
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, RoomEvent::Names(names) if names.get("ida").map(String::as_str) == Some("Alice"))));

    // Alice's own writes advanced her cursor; her poll noops instead
    // of echoing them back.
    assert!(!alice.poll_once().unwrap());
    assert!(drain(&alice_rx).is_empty());
}

#[test]
fn draw_negotiation_end_to_end() {
    let server = TestServer::start();
    let (mut alice, alice_rx) = client(&server, "match-2", "ida");
    let (mut bob, bob_rx) = client(&server, "match-2", "idb");

    alice.create().unwrap();
    bob.join().unwrap();
    alice.send_move("e2", "e4", "FEN-e4").unwrap();
    bob.poll_once().unwrap();
    drain(&alice_rx);
    drain(&bob_rx);

    // Bob proposes a draw; Alice observes and accepts.
    bob.offer(OfferKind::Draw).unwrap();
    assert!(alice.poll_once().unwrap());
    assert!(drain(&alice_rx).iter().any(|e| matches!(
        e,
        RoomEvent::Offer {
            kind: OfferKind::Draw,
            ..
        }
    )));
    alice.accept_offer().unwrap();

    // Bob sees the result on his next poll.
    assert!(bob.poll_once().unwrap());
    assert!(drain(&bob_rx)
        .iter()
        .any(|e| matches!(e, RoomEvent::Result(GameResult::Draw))));

    // The next revision shows Alice the offer is gone.
    bob.send_chat("gg").unwrap();
    assert!(alice.poll_once().unwrap());
    let events = drain(&alice_rx);
    assert!(events.iter().any(|e| matches!(e, RoomEvent::OfferCleared)));
    assert!(events.contains(&RoomEvent::Chat {
        by: Some("idb".into()),
        text: "gg".into(),
    }));
}

#[test]
fn rematch_restarts_replication_cleanly() {
    let server = TestServer::start();
    let (mut alice, _alice_rx) = client(&server, "match-3", "ida");
    let (mut bob, bob_rx) = client(&server, "match-3", "idb");

    alice.create().unwrap();
    bob.join().unwrap();
    alice.send_move("e2", "e4", "FEN-e4").unwrap();
    bob.poll_once().unwrap();
    drain(&bob_rx);

    bob.offer(OfferKind::Rematch).unwrap();
    alice.accept_offer().unwrap();
    alice.send_move("d2", "d4", "FEN-d4").unwrap();

    // Bob's bookmark was ahead of the truncated history; the game
    // counter resets it and only the new game's move comes through.
    assert!(bob.poll_once().unwrap());
    let moves: Vec<_> = drain(&bob_rx)
        .into_iter()
        .filter(|e| matches!(e, RoomEvent::Move { .. }))
        .collect();
    assert_eq!(
        moves,
        vec![RoomEvent::Move {
            from: "d2".into(),
            to: "d4".into(),
            fen: Some("FEN-d4".into()),
        }]
    );
}

#[test]
fn leave_semantics_through_the_daemon() {
    let server = TestServer::start();
    let rooms = RoomClient::new(server.socket_path());
    let (mut alice, _alice_rx) = client(&server, "match-4", "ida");
    let (mut bob, _bob_rx) = client(&server, "match-4", "idb");

    alice.create().unwrap();
    bob.join().unwrap();
    assert_eq!(rooms.list().unwrap().len(), 1);

    // A non-creator leaving keeps the room alive.
    assert!(!bob.leave().unwrap());
    assert_eq!(rooms.list().unwrap().len(), 1);

    // The creator leaving deletes it.
    assert!(alice.leave().unwrap());
    assert!(rooms.list().unwrap().is_empty());
}
