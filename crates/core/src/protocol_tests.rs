// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

#[test]
fn request_wire_shape() {
    let req = Request {
        room: "r1".into(),
        client_id: Some("alice".into()),
        action: Action::Move {
            from: Some("e2".into()),
            to: Some("e4".into()),
            fen: Some("FEN1".into()),
        },
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(
        value,
        json!({
            "room": "r1",
            "client_id": "alice",
            "action": "move",
            "from": "e2",
            "to": "e4",
            "fen": "FEN1"
        })
    );
}

#[test]
fn request_round_trips() {
    let req = Request {
        room: "r1".into(),
        client_id: None,
        action: Action::State { since: 7 },
    };
    let json = serde_json::to_string(&req).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}

#[test]
fn action_tags_are_snake_case() {
    let req = Request {
        room: "r1".into(),
        client_id: None,
        action: Action::AcceptOffer,
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["action"], "accept_offer");
}

#[test]
fn move_fields_default_to_none() {
    // Fields the caller omitted decode as None for the service to report.
    let req: Request =
        serde_json::from_value(json!({"room": "r1", "action": "move", "from": "e2"})).unwrap();
    match req.action {
        Action::Move { from, to, fen } => {
            assert_eq!(from.as_deref(), Some("e2"));
            assert!(to.is_none());
            assert!(fen.is_none());
        }
        other => panic!("unexpected action: {:?}", other),
    }
}

#[test]
fn every_action_name_is_listed() {
    let actions = [
        Action::Create,
        Action::Join,
        Action::Leave,
        Action::Move {
            from: None,
            to: None,
            fen: None,
        },
        Action::Offer { kind: None },
        Action::AcceptOffer,
        Action::Chat { text: None },
        Action::Name { name: None },
        Action::Gift { gift: None },
        Action::State { since: 0 },
        Action::List,
    ];
    assert_eq!(actions.len(), ACTION_NAMES.len());
    for action in &actions {
        assert!(ACTION_NAMES.contains(&action.name()));
    }
}

#[test]
fn response_tags_and_flags() {
    let acked = Response::Acked { rev: 4 };
    let value = serde_json::to_value(&acked).unwrap();
    assert_eq!(value, json!({"type": "acked", "rev": 4}));
    assert!(acked.is_ok());

    let err = Response::Error {
        error: ErrorCode::NoOffer,
    };
    let value = serde_json::to_value(&err).unwrap();
    assert_eq!(value, json!({"type": "error", "error": "no_offer"}));
    assert!(!err.is_ok());
}

#[test]
fn snapshot_flattens_the_view() {
    let snap = Response::Snapshot(StateSnapshot {
        view: RoomView {
            rev: 9,
            fen: Some("FEN9".into()),
            history: vec![],
            chat: vec![],
            gifts: vec![],
            players: Seats::default(),
            names: BTreeMap::new(),
        },
        result: None,
        offer: None,
        score: Score { w: 1, b: 0 },
        game: 2,
        initial_time_ms: 300_000,
    });
    let value = serde_json::to_value(&snap).unwrap();
    assert_eq!(value["type"], "snapshot");
    // view fields sit at the top level, not nested
    assert_eq!(value["rev"], 9);
    assert_eq!(value["fen"], "FEN9");
    assert_eq!(value["game"], 2);

    let back: Response = serde_json::from_value(value).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn error_codes_round_trip_as_snake_case() {
    for (code, wire) in [
        (ErrorCode::MissingAction, "missing_action"),
        (ErrorCode::MissingRoom, "missing_room"),
        (ErrorCode::MissingMoveData, "missing_move_data"),
        (ErrorCode::RoomNotFound, "room_not_found"),
        (ErrorCode::BadOffer, "bad_offer"),
        (ErrorCode::NoOffer, "no_offer"),
        (ErrorCode::Empty, "empty"),
        (ErrorCode::EmptyName, "empty_name"),
        (ErrorCode::EmptyGift, "empty_gift"),
        (ErrorCode::UnknownAction, "unknown_action"),
    ] {
        assert_eq!(code.as_str(), wire);
        assert_eq!(
            serde_json::to_string(&code).unwrap(),
            format!("\"{}\"", wire)
        );
    }
}
