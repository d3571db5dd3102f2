//! PostgreSQL implementation of the entity store.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{
    RecordRow, duplicate_name, has_dependents, missing_parent, parent_required, record_from_row,
    select_columns,
};
use crate::config::DatabaseConfig;
use crate::domain::{EntityKind, NewRecord, Record, RecordPatch};
use crate::error::ApiError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] if the database is unreachable or
    /// a migration fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        tracing::info!(max_connections = config.max_connections, "database pool ready");
        Ok(Self::new(pool))
    }

    /// See [`super::EntityStore::list`].
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
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id OFFSET $1 LIMIT $2",
            select_columns(kind),
            kind.table()
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(i64::try_from(skip).unwrap_or(i64::MAX))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| record_from_row(kind, row))
            .collect())
    }

    /// See [`super::EntityStore::get`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Persistence`] on database failure.
    pub async fn get(&self, kind: EntityKind, id: i64) -> Result<Option<Record>, ApiError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_columns(kind),
            kind.table()
        );
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| record_from_row(kind, row)))
    }

    /// See [`super::EntityStore::create`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on constraint violations or database failure.
    pub async fn create(&self, kind: EntityKind, input: NewRecord) -> Result<Record, ApiError> {
        let row = match kind.parent_column() {
            Some(column) => {
                let parent_id = input.parent_id.ok_or_else(|| parent_required(kind))?;
                let sql = format!(
                    "INSERT INTO {} (name, {column}) VALUES ($1, $2) RETURNING {}",
                    kind.table(),
                    select_columns(kind)
                );
                sqlx::query_as::<_, RecordRow>(&sql)
                    .bind(&input.name)
                    .bind(parent_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| write_error(e, kind, &input.name, Some(parent_id)))?
            }
            None => {
                let sql = format!(
                    "INSERT INTO {} (name) VALUES ($1) RETURNING {}",
                    kind.table(),
                    select_columns(kind)
                );
                sqlx::query_as::<_, RecordRow>(&sql)
                    .bind(&input.name)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| write_error(e, kind, &input.name, None))?
            }
        };

        Ok(record_from_row(kind, row))
    }

    /// See [`super::EntityStore::update`].
    ///
    /// Absent fields are kept via `COALESCE` so the whole patch is one
    /// statement.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on constraint violations or database failure.
    pub async fn update(
        &self,
        kind: EntityKind,
        id: i64,
        patch: RecordPatch,
    ) -> Result<Option<Record>, ApiError> {
        let parent_assignment = kind
            .parent_column()
            .map(|column| format!(", {column} = COALESCE($3, {column})"))
            .unwrap_or_default();
        let sql = format!(
            "UPDATE {} SET name = COALESCE($2, name){parent_assignment}, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            kind.table(),
            select_columns(kind)
        );

        let mut query = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .bind(patch.name.as_deref());
        if kind.parent_column().is_some() {
            query = query.bind(patch.parent_id);
        }

        let name = patch.name.as_deref().unwrap_or_default();
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, kind, name, patch.parent_id))?;

        Ok(row.map(|row| record_from_row(kind, row)))
    }

    /// See [`super::EntityStore::delete`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] if children still reference the record.
    pub async fn delete(&self, kind: EntityKind, id: i64) -> Result<bool, ApiError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match constraint_code(&e).as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => has_dependents(kind, id),
                _ => ApiError::from(e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn constraint_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

/// Maps insert/update failures onto the same errors the in-process store
/// reports.
fn write_error(err: sqlx::Error, kind: EntityKind, name: &str, parent_id: Option<i64>) -> ApiError {
    match (constraint_code(&err).as_deref(), parent_id) {
        (Some(UNIQUE_VIOLATION), _) => duplicate_name(kind, name),
        (Some(FOREIGN_KEY_VIOLATION), Some(parent_id)) => missing_parent(kind, parent_id),
        _ => ApiError::from(err),
    }
}
