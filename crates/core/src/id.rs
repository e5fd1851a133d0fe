// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Booking id generation

use crate::booking::BookingId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Mints identifiers for new bookings
pub trait IdGen: Clone + Send + Sync {
    fn mint(&self) -> BookingId;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn mint(&self) -> BookingId {
        BookingId(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for testing
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("booking")
    }
}

impl IdGen for SequentialIdGen {
    fn mint(&self) -> BookingId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        BookingId(format!("{}-{}", self.prefix, n))
    }
}
