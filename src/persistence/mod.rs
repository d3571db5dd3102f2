//! Persistence layer: the entity store behind the REST handlers.
//!
//! [`EntityStore`] is a closed set of back ends. The in-process store is
//! the default and what the tests run against; the PostgreSQL store is
//! selected with `PERSISTENCE_ENABLED=true`. Both enforce the same rules:
//! unique country and city names, existing parent references, and no
//! deletion of a parent that still has children.

pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use crate::domain::{EntityKind, NewRecord, Record, RecordPatch};
use crate::error::ApiError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// CRUD over the three entity kinds.
///
/// Every operation completes before returning; the caller notifies
/// connected clients only afterwards.
#[derive(Debug, Clone)]
pub enum EntityStore {
    /// In-process store.
    Memory(Arc<MemoryStore>),
    /// PostgreSQL store.
    Postgres(PostgresStore),
}

impl EntityStore {
    /// Creates an empty in-process store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::Memory(Arc::new(MemoryStore::new()))
    }

    /// Returns up to `limit` records after skipping `skip`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn list(
        &self,
        kind: EntityKind,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Record>, ApiError> {
        match self {
            Self::Memory(store) => Ok(store.list(kind, skip, limit).await),
            Self::Postgres(store) => store.list(kind, skip, limit).await,
        }
    }

    /// Fetches one record by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Record>, ApiError> {
        match self {
            Self::Memory(store) => Ok(store.get(kind, id).await),
            Self::Postgres(store) => store.get(kind, id).await,
        }
    }

    /// Inserts a record, assigning its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] on a duplicate unique name,
    /// [`ApiError::InvalidReference`] on a missing parent, and
    /// [`ApiError::Persistence`] on database failure.
    pub async fn create(&self, kind: EntityKind, input: NewRecord) -> Result<Record, ApiError> {
        match self {
            Self::Memory(store) => store.create(kind, input).await,
            Self::Postgres(store) => store.create(kind, input).await,
        }
    }

    /// Applies the present fields of `patch`. Returns `None` if no record
    /// has that id.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub async fn update(
        &self,
        kind: EntityKind,
        id: i64,
        patch: RecordPatch,
    ) -> Result<Option<Record>, ApiError> {
        match self {
            Self::Memory(store) => store.update(kind, id, patch).await,
            Self::Postgres(store) => store.update(kind, id, patch).await,
        }
    }

    /// Removes a record. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] if other records still reference it,
    /// and [`ApiError::Persistence`] on database failure.
    pub async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool, ApiError> {
        match self {
            Self::Memory(store) => store.delete(kind, id).await,
            Self::Postgres(store) => store.delete(kind, id).await,
        }
    }

    /// Short back-end label for logs and the health endpoint.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}
