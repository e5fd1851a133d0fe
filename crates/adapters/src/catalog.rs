// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake resource catalog for testing

use async_trait::async_trait;
use stays_core::{CatalogError, ResourceCatalog, ResourceId, ResourceInfo};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory resource catalog
#[derive(Clone, Default)]
pub struct FakeCatalog {
    resources: Arc<Mutex<BTreeMap<i64, ResourceInfo>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource with a nightly price
    pub fn add(&self, id: ResourceId, price: f64) {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.0, ResourceInfo { id, price });
    }

    /// Remove a resource, simulating deletion by the admin collaborator
    pub fn remove(&self, id: ResourceId) {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id.0);
    }
}

#[async_trait]
impl ResourceCatalog for FakeCatalog {
    async fn lookup(&self, id: ResourceId) -> Result<ResourceInfo, CatalogError> {
        self.resources
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id.0)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<ResourceInfo>, CatalogError> {
        let resources = self.resources.lock().unwrap_or_else(|e| e.into_inner());
        let page = page.max(1);
        Ok(resources
            .values()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
