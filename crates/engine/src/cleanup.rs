// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cleanup sweep and scheduler for abandoned reservations
//!
//! The sweep is the only mechanism that reclaims holds left behind by
//! users who abandon the flow before paying; without it, stale
//! AwaitingPayment rows would block legitimate future bookings forever.

use crate::engine::Engine;
use crate::error::EngineError;
use stays_core::adapters::{InvoiceIssuer, Messenger, ResourceCatalog};
use stays_core::booking::{Booking, BookingId, BookingStatus, UserId};
use stays_core::clock::Clock;
use stays_core::effect::{Effect, Event, Notice};
use stays_core::id::IdGen;
use stays_storage::StorageError;
use std::sync::Arc;
use std::time::Duration;

/// Summary of one cleanup sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub expired_bookings: Vec<BookingId>,
    pub reset_sessions: Vec<UserId>,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.expired_bookings.is_empty() && self.reset_sessions.is_empty()
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
    /// Expire unpaid bookings older than the staleness threshold and reset
    /// the sessions left behind by them
    ///
    /// Idempotent: a second sweep over the same data changes nothing. Runs
    /// as its own transaction, never inside an in-flight authorization.
    pub async fn run_cleanup(&self) -> Result<CleanupReport, EngineError> {
        // An unrepresentable threshold expires nothing rather than panicking
        let cutoff = chrono::Duration::from_std(self.config().staleness_threshold)
            .ok()
            .and_then(|age| self.clock().now().checked_sub_signed(age))
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);

        let expired: Vec<Booking> = self.store().transaction::<_, StorageError>(|tx| {
            let stale: Vec<BookingId> = tx
                .all()
                .filter(|b| {
                    matches!(
                        b.status,
                        BookingStatus::Pending | BookingStatus::AwaitingPayment
                    ) && b.created_at < cutoff
                })
                .map(|b| b.id.clone())
                .collect();
            stale.iter().map(|id| tx.expire(id)).collect()
        })?;

        let mut reset_sessions = Vec::new();
        let mut effects = Vec::new();
        {
            let mut sessions = self.lock_sessions();
            for session in sessions.values_mut() {
                if session.is_idle() {
                    continue;
                }
                let holds_expired_booking = session
                    .booking_id()
                    .map(|id| expired.iter().any(|b| &b.id == id))
                    .unwrap_or(false);
                let abandoned_selection =
                    session.booking_id().is_none() && session.started_at < cutoff;
                if holds_expired_booking || abandoned_selection {
                    *session = session.reset();
                    reset_sessions.push(session.user_id);
                }
            }
        }

        for booking in &expired {
            tracing::debug!(booking = %booking.id, resource = %booking.resource_id, "expired stale booking");
            effects.push(Effect::Emit(Event::BookingExpired {
                id: booking.id.clone(),
            }));
            effects.push(Effect::NotifyUser {
                user_id: booking.user_id,
                notice: Notice::BookingExpired {
                    booking_id: booking.id.clone(),
                },
            });
        }
        self.execute(effects).await?;

        Ok(CleanupReport {
            expired_bookings: expired.into_iter().map(|b| b.id).collect(),
            reset_sessions,
        })
    }
}

/// Runs the cleanup sweep on a fixed interval
pub struct CleanupScheduler<K, G, C, M, I> {
    engine: Arc<Engine<K, G, C, M, I>>,
    interval: Duration,
}

impl<K, G, C, M, I> CleanupScheduler<K, G, C, M, I>
where
    K: Clock,
    G: IdGen,
    C: ResourceCatalog,
    M: Messenger,
    I: InvoiceIssuer,
{
    pub fn new(engine: Arc<Engine<K, G, C, M, I>>) -> Self {
        let interval = engine.config().cleanup_interval;
        Self { engine, interval }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sweep once per interval until dropped
    ///
    /// A failed sweep is logged and retried on the next tick; a single
    /// missed sweep is not user-visible.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; consume it so the first sweep
        // waits a full interval.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match self.engine.run_cleanup().await {
                Ok(report) if !report.is_empty() => {
                    tracing::info!(
                        expired = report.expired_bookings.len(),
                        reset = report.reset_sessions.len(),
                        "cleanup sweep"
                    );
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%error, "cleanup sweep failed; retrying next tick");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
