// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Kibitz Contributors

use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

/// Generate a client id for this process.
/// Format: first 8 hex chars of SHA256(pid + startup nanos). The id is
/// self-chosen and only needs to be stable for the session and unlikely
/// to collide within one room.
pub fn generate_client_id() -> String {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let input = format!("{}:{}", pid, nanos);
    let hash = Sha256::digest(input.as_bytes());
    hex::encode(&hash[..4]) // First 8 hex chars (4 bytes)
}

#[cfg(test)]
#[path = "ident_tests.rs"]
mod tests;
