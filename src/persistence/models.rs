//! Row shape shared by the three tables and the constraint messages both
//! back ends report.

use chrono::{DateTime, Utc};

use crate::domain::{EntityKind, Record};
use crate::error::ApiError;

/// `(id, name, parent_id, created_at, updated_at)` as selected from any of
/// the tables. Countries select `NULL` for `parent_id`.
pub type RecordRow = (i64, String, Option<i64>, DateTime<Utc>, DateTime<Utc>);

/// Converts a selected row into a [`Record`] of the given kind.
#[must_use]
pub fn record_from_row(kind: EntityKind, row: RecordRow) -> Record {
    let (id, name, parent_id, created_at, updated_at) = row;
    Record {
        kind,
        id,
        name,
        parent_id,
        created_at,
        updated_at,
    }
}

/// Column list producing a [`RecordRow`] for `kind`.
#[must_use]
pub fn select_columns(kind: EntityKind) -> String {
    let parent = kind.parent_column().unwrap_or("NULL::BIGINT");
    format!("id, name, {parent} AS parent_id, created_at, updated_at")
}

/// A unique name is already taken.
#[must_use]
pub fn duplicate_name(kind: EntityKind, name: &str) -> ApiError {
    ApiError::Conflict(format!("{kind} {name} already exists"))
}

/// A parent reference points nowhere.
#[must_use]
pub fn missing_parent(kind: EntityKind, parent_id: i64) -> ApiError {
    match kind.parent() {
        Some(parent) => ApiError::InvalidReference(format!("{parent} {parent_id} does not exist")),
        None => ApiError::Internal(format!("{kind} has no parent")),
    }
}

/// A parent reference is required but absent.
#[must_use]
pub fn parent_required(kind: EntityKind) -> ApiError {
    let column = kind.parent_column().unwrap_or("parent_id");
    ApiError::InvalidRequest(format!("{column} is required for {kind}"))
}

/// The record still has children.
#[must_use]
pub fn has_dependents(kind: EntityKind, id: i64) -> ApiError {
    let children = kind.child().map_or("records", EntityKind::table);
    ApiError::Conflict(format!("{kind} {id} still has dependent {children}"))
}
