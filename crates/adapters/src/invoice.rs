// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake invoice issuer for testing

use async_trait::async_trait;
use stays_core::{BookingId, InvoiceError, InvoiceIssuer, UserId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded invoice dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceCall {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub amount: f64,
}

/// Fake invoice issuer with controllable dispatch failures
#[derive(Clone, Default)]
pub struct FakeInvoicer {
    calls: Arc<Mutex<Vec<InvoiceCall>>>,
    fail_next: Arc<AtomicBool>,
}

impl FakeInvoicer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next dispatch fail
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Get all successfully dispatched invoices
    pub fn issued(&self) -> Vec<InvoiceCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl InvoiceIssuer for FakeInvoicer {
    async fn issue(
        &self,
        booking_id: &BookingId,
        user_id: UserId,
        amount: f64,
    ) -> Result<(), InvoiceError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(InvoiceError::Dispatch("injected failure".to_string()));
        }
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(InvoiceCall {
                booking_id: booking_id.clone(),
                user_id,
                amount,
            });
        Ok(())
    }
}
