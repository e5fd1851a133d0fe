// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation session state machine
//!
//! One session per user tracks the in-progress selection: which resource
//! was chosen, which dates were picked, and whether a soft hold already
//! exists for the range. The machine is pure and only enforces phase
//! legality; calendar and store guards live in the engine, which drives
//! the machine after its checks pass.
//!
//! Sessions are created on first touch and reset to `Idle` on every
//! terminal transition (invoice issued, cancellation, expiry).

use crate::booking::{BookingId, ResourceId, UserId};
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a session currently is in the selection flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No selection in flight
    Idle,
    /// Looking at the resource list
    Browsing,
    /// Resource chosen, waiting for a check-in date
    PickingCheckIn { resource_id: ResourceId },
    /// Check-in chosen, waiting for a check-out date
    PickingCheckOut {
        resource_id: ResourceId,
        check_in: NaiveDate,
    },
    /// Soft hold created, waiting for the user to request the invoice
    AwaitingInvoiceResponse {
        resource_id: ResourceId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        booking_id: BookingId,
    },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Browsing => "browsing",
            Phase::PickingCheckIn { .. } => "picking_check_in",
            Phase::PickingCheckOut { .. } => "picking_check_out",
            Phase::AwaitingInvoiceResponse { .. } => "awaiting_invoice_response",
        }
    }
}

/// Inputs driving session transitions
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// User opened the resource list
    Browse,
    /// User chose a resource, restarting any selection in progress
    SelectResource { resource_id: ResourceId },
    /// User picked a check-in date (already validated against the calendar)
    PickCheckIn { date: NaiveDate },
    /// User picked a check-out date and a soft hold was created for the range
    PickCheckOut {
        date: NaiveDate,
        booking_id: BookingId,
    },
    /// Invoice dispatched for the held range
    InvoiceIssued,
    /// User backed out of the selection
    Abort,
}

impl SessionInput {
    pub fn name(&self) -> &'static str {
        match self {
            SessionInput::Browse => "browse",
            SessionInput::SelectResource { .. } => "select_resource",
            SessionInput::PickCheckIn { .. } => "pick_check_in",
            SessionInput::PickCheckOut { .. } => "pick_check_out",
            SessionInput::InvoiceIssued => "invoice_issued",
            SessionInput::Abort => "abort",
        }
    }
}

/// Input arrived in a phase that does not accept it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{input} is not valid while {phase}; restart the selection")]
pub struct InvalidTransition {
    pub phase: &'static str,
    pub input: &'static str,
}

/// A user's reservation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub phase: Phase,
    /// When the current selection flow began; stale sessions are swept
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session in the Browsing state
    pub fn new(user_id: UserId, clock: &impl Clock) -> Self {
        Session {
            user_id,
            phase: Phase::Browsing,
            started_at: clock.now(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// The resource the session is currently working with, if any
    pub fn resource_id(&self) -> Option<ResourceId> {
        match &self.phase {
            Phase::Idle | Phase::Browsing => None,
            Phase::PickingCheckIn { resource_id }
            | Phase::PickingCheckOut { resource_id, .. }
            | Phase::AwaitingInvoiceResponse { resource_id, .. } => Some(*resource_id),
        }
    }

    /// The soft-hold booking the session references, if any
    pub fn booking_id(&self) -> Option<&BookingId> {
        match &self.phase {
            Phase::AwaitingInvoiceResponse { booking_id, .. } => Some(booking_id),
            _ => None,
        }
    }

    /// Terminal teardown; accepted from every phase
    pub fn reset(&self) -> Session {
        Session {
            phase: Phase::Idle,
            ..self.clone()
        }
    }

    /// Pure state transition function
    pub fn transition(
        &self,
        input: SessionInput,
        clock: &impl Clock,
    ) -> Result<(Session, Vec<Effect>), InvalidTransition> {
        let invalid = |input: &SessionInput| InvalidTransition {
            phase: self.phase.name(),
            input: input.name(),
        };

        match input {
            SessionInput::Browse => match self.phase {
                // A live soft hold must be aborted or confirmed first
                Phase::AwaitingInvoiceResponse { .. } => Err(invalid(&input)),
                _ => Ok((
                    Session {
                        phase: Phase::Browsing,
                        started_at: clock.now(),
                        ..self.clone()
                    },
                    vec![],
                )),
            },

            SessionInput::SelectResource { resource_id } => Ok((
                Session {
                    phase: Phase::PickingCheckIn { resource_id },
                    started_at: clock.now(),
                    ..self.clone()
                },
                vec![Effect::Emit(Event::ResourceSelected {
                    user_id: self.user_id,
                    resource_id,
                })],
            )),

            SessionInput::PickCheckIn { date } => match self.phase {
                Phase::PickingCheckIn { resource_id } => Ok((
                    Session {
                        phase: Phase::PickingCheckOut {
                            resource_id,
                            check_in: date,
                        },
                        ..self.clone()
                    },
                    vec![Effect::Emit(Event::CheckInPicked {
                        user_id: self.user_id,
                        resource_id,
                        date,
                    })],
                )),
                _ => Err(invalid(&input)),
            },

            SessionInput::PickCheckOut {
                date,
                ref booking_id,
            } => match self.phase {
                Phase::PickingCheckOut {
                    resource_id,
                    check_in,
                } => Ok((
                    Session {
                        phase: Phase::AwaitingInvoiceResponse {
                            resource_id,
                            check_in,
                            check_out: date,
                            booking_id: booking_id.clone(),
                        },
                        ..self.clone()
                    },
                    vec![Effect::Emit(Event::CheckOutPicked {
                        user_id: self.user_id,
                        resource_id,
                        check_in,
                        check_out: date,
                    })],
                )),
                _ => Err(invalid(&input)),
            },

            SessionInput::InvoiceIssued => match self.phase {
                Phase::AwaitingInvoiceResponse { .. } => Ok((self.reset(), vec![])),
                _ => Err(invalid(&input)),
            },

            SessionInput::Abort => match self.phase {
                Phase::PickingCheckIn { .. }
                | Phase::PickingCheckOut { .. }
                | Phase::AwaitingInvoiceResponse { .. } => Ok((
                    Session {
                        phase: Phase::Browsing,
                        ..self.clone()
                    },
                    vec![Effect::Emit(Event::SelectionAborted {
                        user_id: self.user_id,
                    })],
                )),
                _ => Err(invalid(&input)),
            },
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
