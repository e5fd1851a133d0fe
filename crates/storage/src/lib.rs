// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! stays-storage: Persistence for the stays booking engine
//!
//! This crate provides:
//! - The booking record store: the single shared mutable table, with
//!   serialized read-check-write transactions and JSON write-through
//! - The session snapshot codec used around planned restarts

pub mod snapshot;
pub mod store;

pub use snapshot::SnapshotError;
pub use store::{BookingStore, StorageError, Tx};
