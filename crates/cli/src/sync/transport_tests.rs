// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

#![allow(clippy::unwrap_used)]

use std::os::unix::net::UnixListener;
use std::thread;

use kz_core::protocol::{Action, Request, Response};
use kz_ipc::framing;

use super::transport::{Transport, TransportError, UnixTransport};

fn request() -> Request {
    Request {
        room: "r1".into(),
        client_id: Some("me".into()),
        action: Action::State { since: 3 },
    }
}

#[test]
fn call_round_trips_one_framed_request() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("t.sock");
    let listener = UnixListener::bind(&socket).unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let req: Request = framing::read_message(&mut stream).unwrap();
        assert_eq!(req.action, Action::State { since: 3 });
        framing::write_message(&mut stream, &Response::Noop { rev: 3 }).unwrap();
    });

    let mut transport = UnixTransport::new(&socket);
    let resp = transport.call(&request()).unwrap();
    assert_eq!(resp, Response::Noop { rev: 3 });
    server.join().unwrap();
}

#[test]
fn notify_writes_without_reading() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("t.sock");
    let listener = UnixListener::bind(&socket).unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let req: Request = framing::read_message(&mut stream).unwrap();
        assert_eq!(req.room, "r1");
        // Deliberately answer nothing.
    });

    let mut transport = UnixTransport::new(&socket);
    transport.notify(&request()).unwrap();
    server.join().unwrap();
}

#[test]
fn missing_socket_is_a_connection_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut transport = UnixTransport::new(dir.path().join("absent.sock"));
    let err = transport.call(&request()).unwrap_err();
    assert!(matches!(err, TransportError::ConnectionFailed(_)));
}
