// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn server_errors_carry_the_wire_code() {
    let e = Error::Server(ErrorCode::BadOffer);
    assert_eq!(e.to_string(), "server error: bad_offer");
}

#[test]
fn io_errors_convert() {
    let e: Error = std::io::Error::other("socket gone").into();
    assert!(matches!(e, Error::Io(_)));
    assert!(e.to_string().contains("socket gone"));
}
