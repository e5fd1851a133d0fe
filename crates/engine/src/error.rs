// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the booking engine

use chrono::NaiveDate;
use stays_core::adapters::{CatalogError, InvoiceError, NotifyError};
use stays_core::availability::InvariantViolation;
use stays_core::booking::{BookingId, ResourceId};
use stays_core::session::InvalidTransition;
use stays_storage::{SnapshotError, StorageError};
use thiserror::Error;

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Illegal call for the session's current phase; the caller should ask
    /// the user to restart the selection
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// The picked date does not form a bookable range; the session is
    /// unchanged and the step can be retried
    #[error("invalid date {date} for this step")]
    InvalidDate { date: NaiveDate },
    /// The requested range conflicts with an existing hold; recoverable
    #[error("range {check_in}..{check_out} on resource {resource_id} is unavailable")]
    RangeUnavailable {
        resource_id: ResourceId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),
    /// Cancellation is limited to confirmed bookings that have not started
    #[error("booking {0} cannot be cancelled")]
    NotCancellable(BookingId),
    /// Fatal for the resource: overlapping hard holds observed on read
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("invoice error: {0}")]
    Invoice(#[from] InvoiceError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
}
