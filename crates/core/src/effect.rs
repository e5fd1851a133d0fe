// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events emitted by the booking flow

use crate::booking::{BookingId, ResourceId, UserId};
use chrono::NaiveDate;

/// Side effects requested by state transitions, executed by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit an event for other components to observe
    Emit(Event),
    /// Send a notice to a user
    NotifyUser { user_id: UserId, notice: Notice },
    /// Send a notice to the managers channel
    NotifyManagers { notice: Notice },
}

/// Events emitted by the booking flow
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Event {
    // Selection events
    ResourceSelected {
        user_id: UserId,
        resource_id: ResourceId,
    },
    CheckInPicked {
        user_id: UserId,
        resource_id: ResourceId,
        date: NaiveDate,
    },
    CheckOutPicked {
        user_id: UserId,
        resource_id: ResourceId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    SelectionAborted {
        user_id: UserId,
    },

    // Booking events
    BookingCreated {
        id: BookingId,
        resource_id: ResourceId,
        user_id: UserId,
    },
    InvoiceIssued {
        id: BookingId,
        amount: f64,
    },
    BookingConfirmed {
        id: BookingId,
    },
    AuthorizationRejected {
        id: BookingId,
        reason: String,
    },
    BookingCancelled {
        id: BookingId,
        refund: f64,
    },
    BookingExpired {
        id: BookingId,
    },
}

impl Event {
    /// Get the event name for pattern matching
    /// Format: "category:action"
    pub fn name(&self) -> String {
        match self {
            Event::ResourceSelected { .. } => "selection:resource".to_string(),
            Event::CheckInPicked { .. } => "selection:check_in".to_string(),
            Event::CheckOutPicked { .. } => "selection:check_out".to_string(),
            Event::SelectionAborted { .. } => "selection:aborted".to_string(),

            Event::BookingCreated { .. } => "booking:created".to_string(),
            Event::InvoiceIssued { .. } => "booking:invoice".to_string(),
            Event::BookingConfirmed { .. } => "booking:confirmed".to_string(),
            Event::AuthorizationRejected { .. } => "booking:rejected".to_string(),
            Event::BookingCancelled { .. } => "booking:cancelled".to_string(),
            Event::BookingExpired { .. } => "booking:expired".to_string(),
        }
    }
}

/// Semantic notification payloads; wording and localization belong to the
/// messenger collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    BookingConfirmed {
        booking_id: BookingId,
        resource_id: ResourceId,
        user_id: UserId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        amount: f64,
    },
    BookingCancelled {
        booking_id: BookingId,
        resource_id: ResourceId,
        user_id: UserId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        amount: f64,
        refund: f64,
    },
    AuthorizationRejected {
        booking_id: BookingId,
        reason: String,
    },
    BookingExpired {
        booking_id: BookingId,
    },
    InvariantViolation {
        resource_id: ResourceId,
        first: BookingId,
        second: BookingId,
    },
}
