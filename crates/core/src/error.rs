// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Error types for kz-core operations.

use thiserror::Error;

use crate::protocol::ErrorCode;

/// All possible errors that can occur in kz-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("room not found")]
    RoomNotFound,

    #[error("missing move data: from, to and fen are all required")]
    MissingMoveData,

    #[error("bad offer kind: '{0}'\n  hint: valid kinds are: draw, resign, rematch")]
    BadOffer(String),

    #[error("no pending offer to accept")]
    NoOffer,

    #[error("chat text is empty")]
    EmptyText,

    #[error("display name is empty")]
    EmptyName,

    #[error("gift is empty")]
    EmptyGift,

    #[error("timed out waiting for room lock: {0}")]
    LockTimeout(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The wire code this error maps to.
    ///
    /// Infrastructure failures (I/O, serialization, lock timeout) collapse
    /// to `room_not_found` on the wire, matching the store's absent-read
    /// semantics; the daemon logs the underlying cause before replying.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::RoomNotFound => ErrorCode::RoomNotFound,
            Error::MissingMoveData => ErrorCode::MissingMoveData,
            Error::BadOffer(_) => ErrorCode::BadOffer,
            Error::NoOffer => ErrorCode::NoOffer,
            Error::EmptyText => ErrorCode::Empty,
            Error::EmptyName => ErrorCode::EmptyName,
            Error::EmptyGift => ErrorCode::EmptyGift,
            Error::LockTimeout(_) | Error::Io(_) | Error::Json(_) => ErrorCode::RoomNotFound,
        }
    }

    /// True for failures of the storage layer rather than the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Error::LockTimeout(_) | Error::Io(_) | Error::Json(_)
        )
    }
}

/// A specialized Result type for kz-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
