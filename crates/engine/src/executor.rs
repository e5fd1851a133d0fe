// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect execution through collaborator adapters

use crate::engine::Engine;
use crate::error::EngineError;
use stays_core::adapters::{InvoiceIssuer, Messenger, ResourceCatalog};
use stays_core::availability::InvariantViolation;
use stays_core::clock::Clock;
use stays_core::effect::{Effect, Notice};
use stays_core::id::IdGen;

impl<K, G, C, M, I> Engine<K, G, C, M, I>
where
    K: Clock,
    G: IdGen,
    C: ResourceCatalog,
    M: Messenger,
    I: InvoiceIssuer,
{
    /// Execute effects requested by state transitions
    pub(crate) async fn execute(&self, effects: Vec<Effect>) -> Result<(), EngineError> {
        for effect in effects {
            match effect {
                Effect::Emit(event) => {
                    tracing::debug!(event = %event.name(), "event");
                }
                Effect::NotifyUser { user_id, notice } => {
                    self.messenger().notify_user(user_id, &notice).await?;
                }
                Effect::NotifyManagers { notice } => {
                    self.messenger().notify_managers(&notice).await?;
                }
            }
        }
        Ok(())
    }

    /// Surface an invariant violation to operators before failing the read
    ///
    /// Never auto-corrects: the overlapping rows stay in the store for
    /// inspection and the resource keeps erroring until resolved.
    pub(crate) async fn check_invariant<T>(
        &self,
        result: Result<T, InvariantViolation>,
    ) -> Result<T, EngineError> {
        match result {
            Ok(value) => Ok(value),
            Err(violation) => {
                tracing::error!(
                    resource = %violation.resource_id,
                    first = %violation.first,
                    second = %violation.second,
                    "overlapping hard holds detected"
                );
                let notice = Notice::InvariantViolation {
                    resource_id: violation.resource_id,
                    first: violation.first.clone(),
                    second: violation.second.clone(),
                };
                self.messenger().notify_managers(&notice).await?;
                Err(violation.into())
            }
        }
    }
}
