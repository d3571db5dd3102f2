//! Geo service: runs store operations and notifies connected clients.

use crate::domain::{EntityKind, MutationEvent, NewRecord, Record, RecordPatch, Subject};
use crate::error::ApiError;
use crate::persistence::EntityStore;

use super::Notifier;

/// Orchestration layer for all entity operations.
///
/// Every mutation method follows the same pattern: run the store call to
/// completion, broadcast the outcome, return the result. Update and delete
/// attempts are announced whether or not they apply, so clients see every
/// write attempt.
#[derive(Debug, Clone)]
pub struct GeoService {
    store: EntityStore,
    notifier: Notifier,
}

impl GeoService {
    /// Creates a new `GeoService`.
    #[must_use]
    pub fn new(store: EntityStore, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Lists one page of records.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(
        &self,
        kind: EntityKind,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Record>, ApiError> {
        self.store.list(kind, skip, limit).await
    }

    /// Fetches one record.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Record>, ApiError> {
        self.store.get(kind, id).await
    }

    /// Creates a record and announces it.
    ///
    /// Rejected creates are not announced.
    ///
    /// # Errors
    ///
    /// Propagates store failures and constraint violations.
    pub async fn create(&self, kind: EntityKind, input: NewRecord) -> Result<Record, ApiError> {
        let record = self.store.create(kind, input).await?;
        tracing::info!(%kind, id = record.id, name = %record.name, "record created");

        self.notifier
            .notify(MutationEvent::Created, kind, Subject::Name(record.name.clone()))
            .await;
        Ok(record)
    }

    /// Applies a partial update and announces the outcome.
    ///
    /// # Errors
    ///
    /// Propagates store failures and constraint violations, after
    /// announcing the failed attempt.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: i64,
        patch: RecordPatch,
    ) -> Result<Option<Record>, ApiError> {
        let outcome = self.store.update(kind, id, patch).await;

        match &outcome {
            Ok(Some(record)) => {
                tracing::info!(%kind, id, name = %record.name, "record updated");
                self.notifier
                    .notify(MutationEvent::Updated, kind, Subject::Name(record.name.clone()))
                    .await;
            }
            Ok(None) => {
                tracing::info!(%kind, id, "update target not found");
                self.notifier
                    .notify(MutationEvent::UpdateFailed, kind, Subject::Id(id))
                    .await;
            }
            Err(err) => {
                tracing::warn!(%kind, id, error = %err, "update rejected");
                self.notifier
                    .notify(MutationEvent::UpdateFailed, kind, Subject::Id(id))
                    .await;
            }
        }
        outcome
    }

    /// Deletes a record and announces the outcome.
    ///
    /// # Errors
    ///
    /// Propagates store failures and constraint violations, after
    /// announcing the failed attempt.
    pub async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool, ApiError> {
        let outcome = self.store.delete(kind, id).await;

        let event = match &outcome {
            Ok(true) => {
                tracing::info!(%kind, id, "record deleted");
                MutationEvent::Deleted
            }
            Ok(false) => {
                tracing::info!(%kind, id, "delete target not found");
                MutationEvent::DeleteFailed
            }
            Err(err) => {
                tracing::warn!(%kind, id, error = %err, "delete rejected");
                MutationEvent::DeleteFailed
            }
        };
        self.notifier.notify(event, kind, Subject::Id(id)).await;
        outcome
    }
}
