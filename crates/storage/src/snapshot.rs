// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session snapshot for planned restarts
//!
//! Serializes every non-idle reservation session so an embedder can carry
//! in-flight selections across a restart. This is not crash recovery: a
//! lost snapshot only loses UI selections, the booking rows in the store
//! remain the durable truth.

use serde::{Deserialize, Serialize};
use stays_core::{Session, UserId};
use std::collections::HashMap;
use thiserror::Error;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    sessions: Vec<Session>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

/// Serialize every non-idle session into a snapshot blob
pub fn save(sessions: &HashMap<UserId, Session>) -> Result<Vec<u8>, SnapshotError> {
    let mut live: Vec<Session> = sessions
        .values()
        .filter(|s| !s.is_idle())
        .cloned()
        .collect();
    live.sort_by_key(|s| s.user_id.0);
    let file = SnapshotFile {
        version: SNAPSHOT_VERSION,
        sessions: live,
    };
    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Reconstruct the session map from a snapshot blob
pub fn restore(blob: &[u8]) -> Result<HashMap<UserId, Session>, SnapshotError> {
    let file: SnapshotFile = serde_json::from_slice(blob)?;
    if file.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(file.version));
    }
    Ok(file
        .sessions
        .into_iter()
        .map(|s| (s.user_id, s))
        .collect())
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
