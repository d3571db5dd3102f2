//! Shared DTO types used across all entity endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

/// Longest accepted entity name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Number of records to skip. Defaults to 0.
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of records to return (at most 100). Defaults to 10.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const MAX_LIMIT: u64 = 100;

fn default_limit() -> u64 {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    /// Caps `limit` at 100. Zero stays zero and yields an empty page.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            skip: self.skip,
            limit: self.limit.min(MAX_LIMIT),
        }
    }
}

/// Plain message body, used for deletions and lookups that miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// `"<kind> <id> not found"`.
    #[must_use]
    pub fn not_found(kind: impl std::fmt::Display, id: i64) -> Self {
        Self {
            message: format!("{kind} {id} not found"),
        }
    }

    /// `"<kind> deleted"`.
    #[must_use]
    pub fn deleted(kind: impl std::fmt::Display) -> Self {
        Self {
            message: format!("{kind} deleted"),
        }
    }
}

/// Either the requested entity or a not-found message, both with `200`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EntityOrMessage<T> {
    /// The entity.
    Entity(T),
    /// Explanation of why there is no entity.
    Message(MessageResponse),
}

/// Rejects blank or overlong names.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] describing the problem.
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::InvalidRequest(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates an optional replacement name.
///
/// # Errors
///
/// Same as [`validate_name`].
pub fn validate_optional_name(name: Option<&str>) -> Result<(), ApiError> {
    name.map_or(Ok(()), validate_name)
}
