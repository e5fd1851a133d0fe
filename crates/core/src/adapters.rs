// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions for external collaborators
//!
//! The engine consumes these three collaborators: the resource catalog
//! (existence and pricing), the messenger (user and managers-channel
//! notifications), and the invoice issuer (the payment provider's
//! invoice primitive, whose pre-checkout callback later drives the
//! payment guard).

use crate::booking::{BookingId, ResourceId, UserId};
use crate::effect::Notice;
use async_trait::async_trait;
use thiserror::Error;

// =============================================================================
// Resource Catalog
// =============================================================================

/// A bookable resource as the catalog reports it
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInfo {
    pub id: ResourceId,
    /// Price per night
    pub price: f64,
}

/// Errors from catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("resource not found: {0}")]
    NotFound(ResourceId),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the resource catalog collaborator
#[async_trait]
pub trait ResourceCatalog: Clone + Send + Sync + 'static {
    /// Look up a resource by id
    async fn lookup(&self, id: ResourceId) -> Result<ResourceInfo, CatalogError>;

    /// One page of the active resource listing, 1-indexed
    async fn list_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<ResourceInfo>, CatalogError>;
}

// =============================================================================
// Messenger
// =============================================================================

/// Errors from message delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Adapter for the outbound messaging collaborator
#[async_trait]
pub trait Messenger: Clone + Send + Sync + 'static {
    /// Notify a single user
    async fn notify_user(&self, user_id: UserId, notice: &Notice) -> Result<(), NotifyError>;

    /// Notify the managers channel
    async fn notify_managers(&self, notice: &Notice) -> Result<(), NotifyError>;
}

// =============================================================================
// Invoice Issuer
// =============================================================================

/// Errors from invoice dispatch
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invoice dispatch failed: {0}")]
    Dispatch(String),
}

/// Adapter for the payment collaborator's invoice primitive
#[async_trait]
pub trait InvoiceIssuer: Clone + Send + Sync + 'static {
    /// Issue an invoice; the provider later calls back for pre-checkout
    /// authorization carrying the booking id
    async fn issue(
        &self,
        booking_id: &BookingId,
        user_id: UserId,
        amount: f64,
    ) -> Result<(), InvoiceError>;
}
