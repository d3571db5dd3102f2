//! Request and response bodies for countries, cities and streets.
//!
//! Create bodies require every field; update bodies make every field
//! optional, and an absent or `null` field leaves the stored value alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::{validate_name, validate_optional_name};
use crate::domain::{NewRecord, Record, RecordPatch};
use crate::error::ApiError;

// ── Country ─────────────────────────────────────────────────────────────

/// Request body for `POST /country`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CountryCreate {
    /// Country name, unique.
    pub name: String,
}

/// Request body for `PATCH /country/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CountryUpdate {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Country as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountryResponse {
    /// Country id.
    pub id: i64,
    /// Country name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CountryCreate {
    /// Validates and converts into a store input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a blank or overlong name.
    pub fn into_new_record(self) -> Result<NewRecord, ApiError> {
        validate_name(&self.name)?;
        Ok(NewRecord {
            name: self.name,
            parent_id: None,
        })
    }
}

impl CountryUpdate {
    /// Validates and converts into a store patch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a blank or overlong name.
    pub fn into_patch(self) -> Result<RecordPatch, ApiError> {
        validate_optional_name(self.name.as_deref())?;
        Ok(RecordPatch {
            name: self.name,
            parent_id: None,
        })
    }
}

impl From<Record> for CountryResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// ── City ────────────────────────────────────────────────────────────────

/// Request body for `POST /city`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CityCreate {
    /// City name, unique.
    pub name: String,
    /// Owning country.
    pub country_id: i64,
}

/// Request body for `PATCH /city/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CityUpdate {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement owning country.
    #[serde(default)]
    pub country_id: Option<i64>,
}

/// City as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    /// City id.
    pub id: i64,
    /// City name.
    pub name: String,
    /// Owning country.
    pub country_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl CityCreate {
    /// Validates and converts into a store input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a blank or overlong name.
    pub fn into_new_record(self) -> Result<NewRecord, ApiError> {
        validate_name(&self.name)?;
        Ok(NewRecord {
            name: self.name,
            parent_id: Some(self.country_id),
        })
    }
}

impl CityUpdate {
    /// Validates and converts into a store patch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a blank or overlong name.
    pub fn into_patch(self) -> Result<RecordPatch, ApiError> {
        validate_optional_name(self.name.as_deref())?;
        Ok(RecordPatch {
            name: self.name,
            parent_id: self.country_id,
        })
    }
}

impl From<Record> for CityResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            country_id: record.parent_id.unwrap_or_default(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// ── Street ──────────────────────────────────────────────────────────────

/// Request body for `POST /street`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StreetCreate {
    /// Street name, may repeat.
    pub name: String,
    /// Owning city.
    pub city_id: i64,
}

/// Request body for `PATCH /street/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StreetUpdate {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement owning city.
    #[serde(default)]
    pub city_id: Option<i64>,
}

/// Street as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StreetResponse {
    /// Street id.
    pub id: i64,
    /// Street name.
    pub name: String,
    /// Owning city.
    pub city_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl StreetCreate {
    /// Validates and converts into a store input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a blank or overlong name.
    pub fn into_new_record(self) -> Result<NewRecord, ApiError> {
        validate_name(&self.name)?;
        Ok(NewRecord {
            name: self.name,
            parent_id: Some(self.city_id),
        })
    }
}

impl StreetUpdate {
    /// Validates and converts into a store patch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] on a blank or overlong name.
    pub fn into_patch(self) -> Result<RecordPatch, ApiError> {
        validate_optional_name(self.name.as_deref())?;
        Ok(RecordPatch {
            name: self.name,
            parent_id: self.city_id,
        })
    }
}

impl From<Record> for StreetResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            city_id: record.parent_id.unwrap_or_default(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
