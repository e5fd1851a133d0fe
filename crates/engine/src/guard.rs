// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payment guard: the atomic pre-checkout authorization
//!
//! Called by the payment collaborator before funds move. Everything
//! upstream of this point is best-effort; this re-check is mandatory
//! because time passes between invoice issuance and the provider's
//! callback, during which another user may have confirmed first.

use crate::engine::Engine;
use crate::error::EngineError;
use stays_core::adapters::{InvoiceIssuer, Messenger, ResourceCatalog};
use stays_core::booking::{BookingId, BookingStatus};
use stays_core::clock::Clock;
use stays_core::effect::{Effect, Event, Notice};
use stays_core::id::IdGen;
use stays_storage::StorageError;

/// Outcome of a pre-checkout authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Capture the funds; the booking is confirmed
    Accept,
    /// Do not capture; the booking is cancelled
    Reject(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The booking is not awaiting payment (expired, cancelled, or never invoiced)
    NotPayable,
    /// An older hold or a confirmed booking occupies part of the range
    RangeTaken,
    /// No such booking
    Unknown,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            RejectReason::NotPayable => "booking is not awaiting payment",
            RejectReason::RangeTaken => "range was taken by an earlier hold",
            RejectReason::Unknown => "unknown booking",
        };
        write!(f, "{}", reason)
    }
}

impl<K, G, C, M, I> Engine<K, G, C, M, I>
where
    K: Clock,
    G: IdGen,
    C: ResourceCatalog,
    M: Messenger,
    I: InvoiceIssuer,
{
    /// Validate and settle a pre-checkout callback
    ///
    /// Runs as one serialized transaction: re-reads the booking, re-checks
    /// the range against other confirmed bookings and older hard holds
    /// (oldest hold wins), and either confirms the booking or cancels it.
    /// Safe to call again for the same booking: a settled booking returns
    /// its settled outcome.
    pub async fn authorize_payment(
        &self,
        booking_id: &BookingId,
    ) -> Result<Authorization, EngineError> {
        let now = self.clock().now();
        let (authorization, effects) = self.store().transaction::<_, EngineError>(|tx| {
            let booking = match tx.get(booking_id) {
                Ok(b) => b.clone(),
                Err(StorageError::NotFound(_)) => {
                    return Ok((Authorization::Reject(RejectReason::Unknown), vec![]))
                }
                Err(e) => return Err(e.into()),
            };

            match booking.status {
                BookingStatus::Confirmed => return Ok((Authorization::Accept, vec![])),
                BookingStatus::Pending | BookingStatus::Cancelled | BookingStatus::Expired => {
                    return Ok((Authorization::Reject(RejectReason::NotPayable), vec![]))
                }
                BookingStatus::AwaitingPayment => {}
            }

            let conflict = tx.for_resource(booking.resource_id).iter().any(|other| {
                other.id != booking.id
                    && other.overlaps(booking.check_in, booking.check_out)
                    && match other.status {
                        BookingStatus::Confirmed => true,
                        BookingStatus::AwaitingPayment => other.hold_order() < booking.hold_order(),
                        _ => false,
                    }
            });

            if conflict {
                tx.cancel(&booking.id)?;
                let reason = RejectReason::RangeTaken;
                let effects = vec![
                    Effect::Emit(Event::AuthorizationRejected {
                        id: booking.id.clone(),
                        reason: reason.to_string(),
                    }),
                    Effect::NotifyUser {
                        user_id: booking.user_id,
                        notice: Notice::AuthorizationRejected {
                            booking_id: booking.id.clone(),
                            reason: reason.to_string(),
                        },
                    },
                ];
                Ok((Authorization::Reject(reason), effects))
            } else {
                let confirmed = tx.confirm(&booking.id, now)?;
                let notice = Notice::BookingConfirmed {
                    booking_id: confirmed.id.clone(),
                    resource_id: confirmed.resource_id,
                    user_id: confirmed.user_id,
                    check_in: confirmed.check_in,
                    check_out: confirmed.check_out,
                    amount: confirmed.amount,
                };
                let effects = vec![
                    Effect::Emit(Event::BookingConfirmed {
                        id: confirmed.id.clone(),
                    }),
                    Effect::NotifyManagers {
                        notice: notice.clone(),
                    },
                    Effect::NotifyUser {
                        user_id: confirmed.user_id,
                        notice,
                    },
                ];
                Ok((Authorization::Accept, effects))
            }
        })?;

        self.execute(effects).await?;
        match &authorization {
            Authorization::Accept => {
                tracing::info!(booking = %booking_id, "payment authorized, booking confirmed");
            }
            Authorization::Reject(reason) => {
                tracing::warn!(booking = %booking_id, %reason, "payment rejected");
            }
        }
        Ok(authorization)
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
