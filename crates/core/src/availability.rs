// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Availability index over booking records
//!
//! Occupancy is always computed on demand from the current booking set for
//! a resource. Only hard holds (`AwaitingPayment`, `Confirmed`) occupy
//! dates; `Pending` selections are invisible here. Before mapping any
//! dates, the hard-hold set is checked pairwise: overlapping hard holds
//! are an invariant violation that must be reported, never repaired.

use crate::booking::{Booking, BookingId, BookingStatus, ResourceId, UserId};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Calendar status of a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    Free,
    /// Awaiting payment by the querying user
    HeldBySelf,
    /// Awaiting payment by someone else
    HeldByOther,
    Confirmed,
}

/// Two hard holds occupy the same dates; never expected, never auto-corrected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("overlapping hard holds on resource {resource_id}: {first} and {second}")]
pub struct InvariantViolation {
    pub resource_id: ResourceId,
    pub first: BookingId,
    pub second: BookingId,
}

/// A calendar month, normalized to its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Month { first })
    }

    /// The month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Month {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// The following month, for calendar navigation
    pub fn next(&self) -> Month {
        Month {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// The preceding month, for calendar navigation
    pub fn prev(&self) -> Month {
        Month {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Every date of the month in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let (year, month) = (self.year(), self.month());
        self.first
            .iter_days()
            .take_while(move |d| d.year() == year && d.month() == month)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Hard-hold bookings with the pairwise overlap invariant checked
fn hard_holds(bookings: &[Booking]) -> Result<Vec<&Booking>, InvariantViolation> {
    let holds: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.status.is_hard_hold())
        .collect();
    for (i, a) in holds.iter().enumerate() {
        for b in &holds[i + 1..] {
            if a.overlaps(b.check_in, b.check_out) {
                return Err(InvariantViolation {
                    resource_id: a.resource_id,
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
    }
    Ok(holds)
}

fn status_for(booking: &Booking, user_id: UserId) -> DayStatus {
    match booking.status {
        BookingStatus::Confirmed => DayStatus::Confirmed,
        _ if booking.user_id == user_id => DayStatus::HeldBySelf,
        _ => DayStatus::HeldByOther,
    }
}

/// Day-by-day occupancy of one month from the perspective of `user_id`
pub fn occupancy(
    bookings: &[Booking],
    month: Month,
    user_id: UserId,
) -> Result<BTreeMap<NaiveDate, DayStatus>, InvariantViolation> {
    let holds = hard_holds(bookings)?;
    let mut days = BTreeMap::new();
    for day in month.days() {
        let status = holds
            .iter()
            .find(|b| b.covers(day))
            .map(|b| status_for(b, user_id))
            .unwrap_or(DayStatus::Free);
        days.insert(day, status);
    }
    Ok(days)
}

/// Status of one date, used by the check-in guard
pub fn day_status(
    bookings: &[Booking],
    day: NaiveDate,
    user_id: UserId,
) -> Result<DayStatus, InvariantViolation> {
    let holds = hard_holds(bookings)?;
    Ok(holds
        .iter()
        .find(|b| b.covers(day))
        .map(|b| status_for(b, user_id))
        .unwrap_or(DayStatus::Free))
}

/// Whether `[check_in, check_out)` is clear of hard holds
pub fn is_range_free(
    bookings: &[Booking],
    check_in: NaiveDate,
    check_out: NaiveDate,
    excluding: Option<&BookingId>,
) -> bool {
    bookings
        .iter()
        .filter(|b| b.status.is_hard_hold())
        .filter(|b| excluding != Some(&b.id))
        .all(|b| !b.overlaps(check_in, check_out))
}

#[cfg(test)]
#[path = "availability_tests.rs"]
mod tests;
