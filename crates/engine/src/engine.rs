// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The booking engine: session map, selection flow, and booking operations

use crate::error::EngineError;
use chrono::NaiveDate;
use stays_core::adapters::{CatalogError, InvoiceIssuer, Messenger, ResourceCatalog, ResourceInfo};
use stays_core::availability::{self, DayStatus, Month};
use stays_core::booking::{Booking, BookingId, BookingStatus, ResourceId, UserId};
use stays_core::clock::Clock;
use stays_core::config::EngineConfig;
use stays_core::effect::{Effect, Event, Notice};
use stays_core::id::IdGen;
use stays_core::session::{Phase, Session, SessionInput};
use stays_storage::{snapshot, BookingStore, StorageError};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// The booking engine
///
/// Reservation sessions are independent per user; the booking store is the
/// single shared mutable resource behind them.
pub struct Engine<K, G, C, M, I> {
    store: Arc<BookingStore>,
    sessions: Mutex<HashMap<UserId, Session>>,
    catalog: C,
    messenger: M,
    invoicer: I,
    clock: K,
    ids: G,
    config: EngineConfig,
}

fn map_catalog(error: CatalogError) -> EngineError {
    match error {
        CatalogError::NotFound(id) => EngineError::ResourceNotFound(id),
        other => EngineError::Catalog(other),
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
    pub fn new(
        store: Arc<BookingStore>,
        catalog: C,
        messenger: M,
        invoicer: I,
        clock: K,
        ids: G,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
            catalog,
            messenger,
            invoicer,
            clock,
            ids,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &BookingStore {
        &self.store
    }

    pub(crate) fn clock(&self) -> &K {
        &self.clock
    }

    pub(crate) fn messenger(&self) -> &M {
        &self.messenger
    }

    pub(crate) fn lock_sessions(&self) -> MutexGuard<'_, HashMap<UserId, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current session for a user, created on first touch
    fn session(&self, user_id: UserId) -> Session {
        self.lock_sessions()
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id, &self.clock))
            .clone()
    }

    fn commit_session(&self, session: Session) {
        self.lock_sessions().insert(session.user_id, session);
    }

    /// Current phase of a user's session; `Idle` if none exists yet
    pub fn phase(&self, user_id: UserId) -> Phase {
        self.lock_sessions()
            .get(&user_id)
            .map(|s| s.phase.clone())
            .unwrap_or(Phase::Idle)
    }

    /// Cancel the soft hold a session references, tolerating holds the
    /// sweep already reclaimed
    fn discard_soft_hold(&self, session: &Session) -> Result<(), EngineError> {
        if let Some(booking_id) = session.booking_id() {
            match self.store.cancel(booking_id) {
                Ok(_) | Err(StorageError::IllegalTransition { .. }) => {}
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Open the resource list: one catalog page, session moves to Browsing
    pub async fn browse_resources(
        &self,
        user_id: UserId,
        page: usize,
    ) -> Result<Vec<ResourceInfo>, EngineError> {
        let resources = self
            .catalog
            .list_page(page, self.config.page_size)
            .await
            .map_err(map_catalog)?;
        let current = self.session(user_id);
        let (next, effects) = current.transition(SessionInput::Browse, &self.clock)?;
        self.commit_session(next);
        self.execute(effects).await?;
        Ok(resources)
    }

    /// Choose a resource to book, restarting any selection in progress
    pub async fn select_resource(
        &self,
        user_id: UserId,
        resource_id: ResourceId,
    ) -> Result<ResourceInfo, EngineError> {
        let info = self.catalog.lookup(resource_id).await.map_err(map_catalog)?;
        let current = self.session(user_id);
        self.discard_soft_hold(&current)?;
        let (next, effects) =
            current.transition(SessionInput::SelectResource { resource_id }, &self.clock)?;
        self.commit_session(next);
        self.execute(effects).await?;
        Ok(info)
    }

    /// Pick the check-in date
    ///
    /// The date must be today or later and read as Free or HeldBySelf on
    /// the calendar. A rejected date leaves the session unchanged.
    pub async fn pick_check_in(&self, user_id: UserId, date: NaiveDate) -> Result<(), EngineError> {
        let current = self.session(user_id);
        let (next, effects) =
            current.transition(SessionInput::PickCheckIn { date }, &self.clock)?;

        if date < self.clock.today() {
            return Err(EngineError::InvalidDate { date });
        }
        let resource_id = match next.phase {
            Phase::PickingCheckOut { resource_id, .. } => resource_id,
            // transition() only moves PickingCheckIn -> PickingCheckOut
            _ => return Err(EngineError::InvalidDate { date }),
        };
        let bookings = self.store.for_resource(resource_id);
        let status = self
            .check_invariant(availability::day_status(&bookings, date, user_id))
            .await?;
        match status {
            DayStatus::Free | DayStatus::HeldBySelf => {}
            DayStatus::HeldByOther | DayStatus::Confirmed => {
                return Err(EngineError::RangeUnavailable {
                    resource_id,
                    check_in: date,
                    check_out: date.succ_opt().unwrap_or(date),
                });
            }
        }

        self.commit_session(next);
        self.execute(effects).await?;
        Ok(())
    }

    /// Pick the check-out date, creating the soft hold for the range
    ///
    /// Fails with `RangeUnavailable` when another hold now occupies part of
    /// the span; the session stays in PickingCheckOut so the user can try a
    /// different range.
    pub async fn pick_check_out(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> Result<Booking, EngineError> {
        let current = self.session(user_id);
        let (resource_id, check_in) = match &current.phase {
            Phase::PickingCheckOut {
                resource_id,
                check_in,
            } => (*resource_id, *check_in),
            _ => {
                return Err(stays_core::session::InvalidTransition {
                    phase: current.phase.name(),
                    input: "pick_check_out",
                }
                .into())
            }
        };
        if date <= check_in {
            return Err(EngineError::InvalidDate { date });
        }

        let info = self.catalog.lookup(resource_id).await.map_err(map_catalog)?;
        let bookings = self.store.for_resource(resource_id);
        if !availability::is_range_free(&bookings, check_in, date, None) {
            return Err(EngineError::RangeUnavailable {
                resource_id,
                check_in,
                check_out: date,
            });
        }

        let nights = (date - check_in).num_days();
        let amount = nights as f64 * info.price;
        let booking = Booking::new(
            self.ids.mint(),
            resource_id,
            user_id,
            check_in,
            date,
            amount,
            &self.clock,
        );
        let stored = self.store.insert(booking)?;

        let (next, mut effects) = match current.transition(
            SessionInput::PickCheckOut {
                date,
                booking_id: stored.id.clone(),
            },
            &self.clock,
        ) {
            Ok(out) => out,
            Err(e) => {
                // The session moved under us; the fresh soft hold is orphaned
                self.store.cancel(&stored.id)?;
                return Err(e.into());
            }
        };
        effects.push(Effect::Emit(Event::BookingCreated {
            id: stored.id.clone(),
            resource_id,
            user_id,
        }));
        self.commit_session(next);
        self.execute(effects).await?;
        Ok(stored)
    }

    /// Issue the invoice for the held range
    ///
    /// Promotes the soft hold to AwaitingPayment (the hard hold) and then
    /// dispatches the invoice; a failed dispatch cancels the booking and
    /// resets the session. On success the session is torn down to Idle, so
    /// a second call cannot issue a second invoice.
    pub async fn confirm_selection(&self, user_id: UserId) -> Result<Booking, EngineError> {
        let current = self.session(user_id);
        let booking_id = match current.booking_id() {
            Some(id) => id.clone(),
            None => {
                return Err(stays_core::session::InvalidTransition {
                    phase: current.phase.name(),
                    input: "confirm_selection",
                }
                .into())
            }
        };

        let promoted = self.store.promote(&booking_id)?;
        match self
            .invoicer
            .issue(&promoted.id, promoted.user_id, promoted.amount)
            .await
        {
            Ok(()) => {
                let (next, mut effects) =
                    current.transition(SessionInput::InvoiceIssued, &self.clock)?;
                effects.push(Effect::Emit(Event::InvoiceIssued {
                    id: promoted.id.clone(),
                    amount: promoted.amount,
                }));
                self.commit_session(next);
                self.execute(effects).await?;
                tracing::info!(
                    booking = %promoted.id,
                    resource = %promoted.resource_id,
                    amount = promoted.amount,
                    "invoice issued, range is now held"
                );
                Ok(promoted)
            }
            Err(error) => {
                self.store.cancel(&booking_id)?;
                self.commit_session(current.reset());
                tracing::warn!(booking = %booking_id, %error, "invoice dispatch failed");
                Err(error.into())
            }
        }
    }

    /// Back out of the selection, discarding any soft hold
    pub async fn abort_selection(&self, user_id: UserId) -> Result<(), EngineError> {
        let current = self.session(user_id);
        let (next, effects) = current.transition(SessionInput::Abort, &self.clock)?;
        self.discard_soft_hold(&current)?;
        self.commit_session(next);
        self.execute(effects).await?;
        Ok(())
    }

    /// Cancel a confirmed future booking, returning the refund amount
    pub async fn cancel_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> Result<f64, EngineError> {
        let today = self.clock.today();
        let cancelled = self.store.transaction::<_, EngineError>(|tx| {
            let booking = tx
                .get(&booking_id)
                .map_err(|e| match e {
                    StorageError::NotFound(id) => EngineError::BookingNotFound(id),
                    other => other.into(),
                })?
                .clone();
            if booking.user_id != user_id
                || booking.status != BookingStatus::Confirmed
                || booking.check_in <= today
            {
                return Err(EngineError::NotCancellable(booking_id.clone()));
            }
            Ok(tx.cancel(&booking_id)?)
        })?;

        let refund = cancelled.amount * self.config.refund_fraction;
        let notice = Notice::BookingCancelled {
            booking_id: cancelled.id.clone(),
            resource_id: cancelled.resource_id,
            user_id: cancelled.user_id,
            check_in: cancelled.check_in,
            check_out: cancelled.check_out,
            amount: cancelled.amount,
            refund,
        };
        self.execute(vec![
            Effect::Emit(Event::BookingCancelled {
                id: cancelled.id.clone(),
                refund,
            }),
            Effect::NotifyManagers {
                notice: notice.clone(),
            },
            Effect::NotifyUser { user_id, notice },
        ])
        .await?;
        tracing::info!(booking = %cancelled.id, refund, "booking cancelled by user");
        Ok(refund)
    }

    /// The user's confirmed bookings that have not ended yet, newest first
    pub fn user_bookings(&self, user_id: UserId) -> Vec<Booking> {
        let today = self.clock.today();
        self.store
            .for_user(user_id)
            .into_iter()
            .filter(|b| b.status == BookingStatus::Confirmed && b.check_out > today)
            .collect()
    }

    /// Day-by-day occupancy of one month, from the user's perspective
    pub async fn render_calendar(
        &self,
        resource_id: ResourceId,
        month: Month,
        user_id: UserId,
    ) -> Result<BTreeMap<NaiveDate, DayStatus>, EngineError> {
        self.catalog.lookup(resource_id).await.map_err(map_catalog)?;
        let bookings = self.store.for_resource(resource_id);
        self.check_invariant(availability::occupancy(&bookings, month, user_id))
            .await
    }

    /// Serialize every in-flight session for a planned restart
    pub fn save_state(&self) -> Result<Vec<u8>, EngineError> {
        let sessions = self.lock_sessions();
        Ok(snapshot::save(&sessions)?)
    }

    /// Restore sessions saved by [`Engine::save_state`]
    pub fn restore_state(&self, blob: &[u8]) -> Result<(), EngineError> {
        let restored = snapshot::restore(blob)?;
        let count = restored.len();
        self.lock_sessions().extend(restored);
        tracing::info!(count, "restored reservation sessions");
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
