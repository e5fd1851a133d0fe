// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Booking records and their status lifecycle
//!
//! A booking tracks one user's attempt to reserve a date range on a
//! resource. `Pending` is a soft hold: a calendar selection not yet sent
//! to payment, invisible to everyone but its owner. `AwaitingPayment` and
//! `Confirmed` are hard holds and count toward the overlap invariant: for
//! any resource, hard-hold intervals must be pairwise non-overlapping.

use crate::clock::Clock;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a booking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BookingId {
    fn from(s: String) -> Self {
        BookingId(s)
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        BookingId(s.to_string())
    }
}

/// Identifier of a bookable resource, owned by the catalog collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub i64);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a booking user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Calendar selection not yet sent to payment; does not reserve the range
    Pending,
    /// Invoice issued; the range is a hard hold until paid or reclaimed
    AwaitingPayment,
    /// Payment captured
    Confirmed,
    /// Terminated by the user, an abort, or a rejected authorization
    Cancelled,
    /// Reclaimed by the cleanup sweep; no refund
    Expired,
}

impl BookingStatus {
    /// Hard holds count toward the overlap invariant
    pub fn is_hard_hold(&self) -> bool {
        matches!(self, BookingStatus::AwaitingPayment | BookingStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Expired)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::AwaitingPayment => "awaiting_payment",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
        };
        write!(f, "{}", name)
    }
}

/// A booking attempt on a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    /// Store-assigned insertion sequence; tie-breaks equal `created_at`
    pub seq: u64,
    pub resource_id: ResourceId,
    pub user_id: UserId,
    pub check_in: NaiveDate,
    /// Exclusive: the night before `check_out` is the last one occupied
    pub check_out: NaiveDate,
    pub status: BookingStatus,
    /// Invoice total computed at creation time
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Create a new booking in the Pending state
    pub fn new(
        id: impl Into<BookingId>,
        resource_id: ResourceId,
        user_id: UserId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        amount: f64,
        clock: &impl Clock,
    ) -> Self {
        Booking {
            id: id.into(),
            seq: 0,
            resource_id,
            user_id,
            check_in,
            check_out,
            status: BookingStatus::Pending,
            amount,
            created_at: clock.now(),
            confirmed_at: None,
        }
    }

    /// Number of nights covered, `check_out` being exclusive
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Whether this booking's interval intersects `[check_in, check_out)`
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && check_in < self.check_out
    }

    /// Whether `day` falls inside this booking's interval
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }

    /// Hold precedence for the oldest-hold-wins tie-break
    pub fn hold_order(&self) -> (DateTime<Utc>, u64) {
        (self.created_at, self.seq)
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
