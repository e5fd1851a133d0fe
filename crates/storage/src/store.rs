// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Booking record store
//!
//! The single shared mutable table of booking attempts. Every mutation
//! that can affect the overlap invariant runs under one mutex via
//! [`BookingStore::transaction`], so a read-check-write executed inside a
//! transaction closure is serializable with respect to every other one.
//! The closure operates on a draft copy of the table; nothing is visible
//! or persisted until the closure returns `Ok`.
//!
//! Records are written through to `<base>/bookings/<id>.json` so that
//! bookings survive restarts; the in-flight session state does not live
//! here (see the snapshot module).

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use stays_core::{Booking, BookingId, BookingStatus, ResourceId, UserId};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("booking not found: {0}")]
    NotFound(BookingId),
    #[error("booking {id} is {from}, cannot become {to}")]
    IllegalTransition {
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("duplicate booking id: {0}")]
    DuplicateId(BookingId),
}

#[derive(Debug, Clone, Default)]
struct Table {
    bookings: HashMap<BookingId, Booking>,
    next_seq: u64,
}

/// Booking record store with JSON write-through persistence
pub struct BookingStore {
    inner: Mutex<Table>,
    base_path: Option<PathBuf>,
}

impl BookingStore {
    /// Open a store at the given path, replaying any persisted bookings
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        let dir = base_path.join("bookings");
        fs::create_dir_all(&dir)?;

        let mut table = Table::default();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let booking: Booking = read_json(&path)?;
                table.next_seq = table.next_seq.max(booking.seq + 1);
                table.bookings.insert(booking.id.clone(), booking);
            }
        }

        Ok(Self {
            inner: Mutex::new(table),
            base_path: Some(base_path),
        })
    }

    /// An unpersisted store for testing and embedding
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Table::default()),
            base_path: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, booking: &Booking) -> Result<(), StorageError> {
        if let Some(base) = &self.base_path {
            let dir = base.join("bookings");
            fs::create_dir_all(&dir)?;
            let json = serde_json::to_string_pretty(booking)?;
            fs::write(dir.join(format!("{}.json", booking.id)), json)?;
        }
        Ok(())
    }

    /// Run a serialized read-check-write against the table
    ///
    /// Mutations made through the [`Tx`] view are committed and persisted
    /// only when the closure returns `Ok`; on `Err` the draft is dropped.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut Tx<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let mut guard = self.lock();
        let mut draft = guard.clone();
        let mut dirty = Vec::new();
        let out = f(&mut Tx {
            table: &mut draft,
            dirty: &mut dirty,
        })?;
        for id in &dirty {
            if let Some(booking) = draft.bookings.get(id) {
                self.persist(booking).map_err(E::from)?;
            }
        }
        *guard = draft;
        Ok(out)
    }

    /// Insert a new booking, assigning its sequence number
    pub fn insert(&self, booking: Booking) -> Result<Booking, StorageError> {
        self.transaction(|tx| tx.insert(booking))
    }

    /// Load a booking by id
    pub fn get(&self, id: &BookingId) -> Result<Booking, StorageError> {
        self.lock()
            .bookings
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }

    /// All bookings for a resource, in hold order
    pub fn for_resource(&self, resource_id: ResourceId) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .lock()
            .bookings
            .values()
            .filter(|b| b.resource_id == resource_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.hold_order());
        bookings
    }

    /// All bookings owned by a user, newest check-in first
    pub fn for_user(&self, user_id: UserId) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .lock()
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.check_in.cmp(&a.check_in));
        bookings
    }

    /// Promote a soft hold to a hard hold (Pending -> AwaitingPayment)
    pub fn promote(&self, id: &BookingId) -> Result<Booking, StorageError> {
        self.transaction(|tx| tx.promote(id))
    }

    /// Cancel a booking (Pending/AwaitingPayment/Confirmed -> Cancelled)
    pub fn cancel(&self, id: &BookingId) -> Result<Booking, StorageError> {
        self.transaction(|tx| tx.cancel(id))
    }
}

/// Transactional view over the booking table
pub struct Tx<'a> {
    table: &'a mut Table,
    dirty: &'a mut Vec<BookingId>,
}

impl Tx<'_> {
    pub fn get(&self, id: &BookingId) -> Result<&Booking, StorageError> {
        self.table
            .bookings
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }

    pub fn all(&self) -> impl Iterator<Item = &Booking> {
        self.table.bookings.values()
    }

    pub fn for_resource(&self, resource_id: ResourceId) -> Vec<&Booking> {
        let mut bookings: Vec<&Booking> = self
            .table
            .bookings
            .values()
            .filter(|b| b.resource_id == resource_id)
            .collect();
        bookings.sort_by_key(|b| b.hold_order());
        bookings
    }

    pub fn insert(&mut self, mut booking: Booking) -> Result<Booking, StorageError> {
        if self.table.bookings.contains_key(&booking.id) {
            return Err(StorageError::DuplicateId(booking.id));
        }
        booking.seq = self.table.next_seq;
        self.table.next_seq += 1;
        self.dirty.push(booking.id.clone());
        self.table.bookings.insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    pub fn promote(&mut self, id: &BookingId) -> Result<Booking, StorageError> {
        self.set_status(id, &[BookingStatus::Pending], BookingStatus::AwaitingPayment, None)
    }

    pub fn confirm(&mut self, id: &BookingId, at: DateTime<Utc>) -> Result<Booking, StorageError> {
        self.set_status(
            id,
            &[BookingStatus::AwaitingPayment],
            BookingStatus::Confirmed,
            Some(at),
        )
    }

    pub fn cancel(&mut self, id: &BookingId) -> Result<Booking, StorageError> {
        self.set_status(
            id,
            &[
                BookingStatus::Pending,
                BookingStatus::AwaitingPayment,
                BookingStatus::Confirmed,
            ],
            BookingStatus::Cancelled,
            None,
        )
    }

    pub fn expire(&mut self, id: &BookingId) -> Result<Booking, StorageError> {
        self.set_status(
            id,
            &[BookingStatus::Pending, BookingStatus::AwaitingPayment],
            BookingStatus::Expired,
            None,
        )
    }

    fn set_status(
        &mut self,
        id: &BookingId,
        legal_from: &[BookingStatus],
        to: BookingStatus,
        confirmed_at: Option<DateTime<Utc>>,
    ) -> Result<Booking, StorageError> {
        let booking = self
            .table
            .bookings
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(id.clone()))?;
        if !legal_from.contains(&booking.status) {
            return Err(StorageError::IllegalTransition {
                id: id.clone(),
                from: booking.status,
                to,
            });
        }
        booking.status = to;
        if confirmed_at.is_some() {
            booking.confirmed_at = confirmed_at;
        }
        self.dirty.push(id.clone());
        Ok(booking.clone())
    }
}

fn read_json<T: DeserializeOwned>(path: &std::path::Path) -> Result<T, StorageError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
