// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use async_trait::async_trait;
use stays_core::{Messenger, Notice, NotifyError, UserId};
use tracing::Instrument;

/// Wrapper that adds tracing to any Messenger
#[derive(Clone)]
pub struct TracedMessenger<M> {
    inner: M,
}

impl<M> TracedMessenger<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

fn notice_kind(notice: &Notice) -> &'static str {
    match notice {
        Notice::BookingConfirmed { .. } => "booking_confirmed",
        Notice::BookingCancelled { .. } => "booking_cancelled",
        Notice::AuthorizationRejected { .. } => "authorization_rejected",
        Notice::BookingExpired { .. } => "booking_expired",
        Notice::InvariantViolation { .. } => "invariant_violation",
    }
}

#[async_trait]
impl<M: Messenger> Messenger for TracedMessenger<M> {
    async fn notify_user(&self, user_id: UserId, notice: &Notice) -> Result<(), NotifyError> {
        let span = tracing::info_span!("notify.user", user = %user_id, kind = notice_kind(notice));
        async {
            let result = self.inner.notify_user(user_id, notice).await;
            match &result {
                Ok(()) => tracing::debug!("delivered"),
                Err(e) => tracing::error!(error = %e, "delivery failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn notify_managers(&self, notice: &Notice) -> Result<(), NotifyError> {
        let span = tracing::info_span!("notify.managers", kind = notice_kind(notice));
        async {
            let result = self.inner.notify_managers(notice).await;
            match &result {
                Ok(()) => tracing::debug!("delivered"),
                Err(e) => tracing::error!(error = %e, "delivery failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
