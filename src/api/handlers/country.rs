//! Country CRUD handlers: list, get, create, update, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::crud;
use crate::api::dto::{
    CountryCreate, CountryResponse, CountryUpdate, EntityOrMessage, MessageResponse,
    PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::EntityKind;
use crate::error::{ApiError, ErrorResponse};

const KIND: EntityKind = EntityKind::Country;

/// `GET /country`: List countries.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/country",
    tag = "Country",
    summary = "List countries",
    description = "Returns up to `limit` countries after skipping `skip`, ordered by id.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Country page", body = Vec<CountryResponse>),
    )
)]
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<CountryResponse>>, ApiError> {
    crud::list(&state, KIND, params).await
}

/// `GET /country/{id}`: Get a country.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/country/{id}",
    tag = "Country",
    summary = "Get a country",
    description = "Returns the country, or a `{\"message\"}` body if it does not exist.",
    params(
        ("id" = i64, Path, description = "Country id"),
    ),
    responses(
        (status = 200, description = "Country or not-found message", body = CountryResponse),
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EntityOrMessage<CountryResponse>>, ApiError> {
    crud::get(&state, KIND, id).await
}

/// `POST /country`: Create a country.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or a duplicate name.
#[utoipa::path(
    post,
    path = "/country",
    tag = "Country",
    summary = "Create a country",
    description = "Creates a country and notifies every WebSocket client.",
    request_body = CountryCreate,
    responses(
        (status = 201, description = "Country created", body = CountryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
    )
)]
pub async fn create_country(
    State(state): State<AppState>,
    payload: Result<Json<CountryCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CountryResponse>), ApiError> {
    let Json(body) = payload?;
    crud::create(&state, KIND, body.into_new_record()?).await
}

/// `PATCH /country/{id}`: Update a country.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or a duplicate name.
#[utoipa::path(
    patch,
    path = "/country/{id}",
    tag = "Country",
    summary = "Update a country",
    description = "Applies the fields present in the body. The attempt is announced to every WebSocket client whether or not it applies.",
    params(
        ("id" = i64, Path, description = "Country id"),
    ),
    request_body = CountryUpdate,
    responses(
        (status = 200, description = "Updated country or not-found message", body = CountryResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
    )
)]
pub async fn update_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CountryUpdate>, JsonRejection>,
) -> Result<Json<EntityOrMessage<CountryResponse>>, ApiError> {
    let Json(body) = payload?;
    crud::update(&state, KIND, id, body.into_patch()?).await
}

/// `DELETE /country/{id}`: Delete a country.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] if cities still reference the country.
#[utoipa::path(
    delete,
    path = "/country/{id}",
    tag = "Country",
    summary = "Delete a country",
    description = "Removes the country. The attempt is announced to every WebSocket client whether or not it applies.",
    params(
        ("id" = i64, Path, description = "Country id"),
    ),
    responses(
        (status = 200, description = "Deletion or not-found message", body = MessageResponse),
        (status = 409, description = "Country still has cities", body = ErrorResponse),
    )
)]
pub async fn delete_country(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    crud::delete(&state, KIND, id).await
}

/// Country routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/country", get(list_countries).post(create_country))
        .route("/country/", get(list_countries).post(create_country))
        .route(
            "/country/{id}",
            get(get_country).patch(update_country).delete(delete_country),
        )
}
