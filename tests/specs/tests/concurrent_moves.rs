// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Concurrent writers through the daemon: no update may be lost.

#![allow(clippy::unwrap_used)]

use std::thread;

use kz_core::protocol::{Action, Request, Response};
use kzrs::RoomClient;
use specs::TestServer;

#[test]
fn racing_moves_both_land() {
    let server = TestServer::start();
    let socket = server.socket_path();

    let create = Request {
        room: "race".into(),
        client_id: Some("ida".into()),
        action: Action::Create,
    };
    RoomClient::new(socket.clone()).call_ok(&create).unwrap();

    let mut handles = Vec::new();
    for (id, from, to) in [("ida", "e2", "e4"), ("idb", "e7", "e5")] {
        let socket = socket.clone();
        handles.push(thread::spawn(move || {
            let request = Request {
                room: "race".into(),
                client_id: Some(id.into()),
                action: Action::Move {
                    from: Some(from.into()),
                    to: Some(to.into()),
                    fen: Some("FEN".into()),
                },
            };
            RoomClient::new(socket).call_ok(&request).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let state = Request {
        room: "race".into(),
        client_id: None,
        action: Action::State { since: 0 },
    };
    let response = RoomClient::new(socket).call_ok(&state).unwrap();
    let Response::Snapshot(snapshot) = response else {
        panic!("expected snapshot, got {:?}", response);
    };
    assert_eq!(snapshot.view.history.len(), 2);
    assert_eq!(snapshot.view.rev, 3);
}
