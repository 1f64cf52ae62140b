// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

//! Shared IPC plumbing for client-daemon communication.
//!
//! This crate carries the envelope-level request validation and the
//! framing protocol used between the `kibitz` client and the `kibitzd`
//! daemon. Messages are serialized as JSON with length-prefixed
//! framing; the protocol types themselves live in `kz_core::protocol`.

use serde_json::Value;

pub use kz_core::protocol::{Request, Response};

use kz_core::protocol::{ErrorCode, ACTION_NAMES};

/// Validate and decode one request body.
///
/// Envelope errors are reported in a fixed order so a caller that omits
/// everything hears about the action first: `missing_action`, then
/// `missing_room`, then `unknown_action`. A body that is not a JSON
/// object decodes like one with no fields.
pub fn decode_request(bytes: &[u8]) -> Result<Request, ErrorCode> {
    let value: Value = serde_json::from_slice(bytes).unwrap_or(Value::Null);
    let action = value.get("action").and_then(Value::as_str).unwrap_or("");
    if action.is_empty() {
        return Err(ErrorCode::MissingAction);
    }
    let room = value.get("room").and_then(Value::as_str).unwrap_or("");
    if room.is_empty() {
        return Err(ErrorCode::MissingRoom);
    }
    if !ACTION_NAMES.contains(&action) {
        return Err(ErrorCode::UnknownAction);
    }
    // Per-action fields are all optional, so this only fails on a field
    // of the wrong JSON type.
    serde_json::from_value(value).map_err(|_| ErrorCode::UnknownAction)
}

/// IPC message framing.
///
/// Messages are framed as:
/// - 4 bytes: message length (big-endian u32)
/// - N bytes: JSON-encoded message
pub mod framing {
    use std::io::{Read, Write};

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Maximum message size (1MB) to prevent malformed messages from causing hangs.
    const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

    /// Write a serializable message to the given writer.
    pub fn write_message<W: Write, T: Serialize>(
        writer: &mut W,
        message: &T,
    ) -> std::io::Result<()> {
        let json = serde_json::to_vec(message)
            .map_err(|e| std::io::Error::other(format!("serialize error: {}", e)))?;
        let len =
            u32::try_from(json.len()).map_err(|_| std::io::Error::other("message too large"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&json)?;
        writer.flush()?;
        Ok(())
    }

    /// Read one raw frame body from the given reader.
    ///
    /// The daemon reads frames raw so envelope validation can answer
    /// with a protocol error instead of an I/O failure.
    pub fn read_frame<R: Read>(reader: &mut R) -> std::io::Result<Vec<u8>> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(std::io::Error::other(format!(
                "message too large: {} bytes (max {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a deserializable message from the given reader.
    pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> std::io::Result<T> {
        let buf = read_frame(reader)?;
        serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::other(format!("deserialize error: {}", e)))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
