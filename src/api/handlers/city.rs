//! City CRUD handlers: list, get, create, update, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::crud;
use crate::api::dto::{
    CityCreate, CityResponse, CityUpdate, EntityOrMessage, MessageResponse, PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::EntityKind;
use crate::error::{ApiError, ErrorResponse};

const KIND: EntityKind = EntityKind::City;

/// `GET /city`: List cities.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/city",
    tag = "City",
    summary = "List cities",
    description = "Returns up to `limit` cities after skipping `skip`, ordered by id.",
    params(PaginationParams),
    responses(
        (status = 200, description = "City page", body = Vec<CityResponse>),
    )
)]
pub async fn list_cities(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<CityResponse>>, ApiError> {
    crud::list(&state, KIND, params).await
}

/// `GET /city/{id}`: Get a city.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/city/{id}",
    tag = "City",
    summary = "Get a city",
    description = "Returns the city, or a `{\"message\"}` body if it does not exist.",
    params(
        ("id" = i64, Path, description = "City id"),
    ),
    responses(
        (status = 200, description = "City or not-found message", body = CityResponse),
    )
)]
pub async fn get_city(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EntityOrMessage<CityResponse>>, ApiError> {
    crud::get(&state, KIND, id).await
}

/// `POST /city`: Create a city.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input, a duplicate name or an unknown country.
#[utoipa::path(
    post,
    path = "/city",
    tag = "City",
    summary = "Create a city",
    description = "Creates a city and notifies every WebSocket client.",
    request_body = CityCreate,
    responses(
        (status = 201, description = "City created", body = CityResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 422, description = "Country does not exist", body = ErrorResponse),
    )
)]
pub async fn create_city(
    State(state): State<AppState>,
    payload: Result<Json<CityCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CityResponse>), ApiError> {
    let Json(body) = payload?;
    crud::create(&state, KIND, body.into_new_record()?).await
}

/// `PATCH /city/{id}`: Update a city.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input, a duplicate name or an unknown country.
#[utoipa::path(
    patch,
    path = "/city/{id}",
    tag = "City",
    summary = "Update a city",
    description = "Applies the fields present in the body. The attempt is announced to every WebSocket client whether or not it applies.",
    params(
        ("id" = i64, Path, description = "City id"),
    ),
    request_body = CityUpdate,
    responses(
        (status = 200, description = "Updated city or not-found message", body = CityResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse),
        (status = 422, description = "Country does not exist", body = ErrorResponse),
    )
)]
pub async fn update_city(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CityUpdate>, JsonRejection>,
) -> Result<Json<EntityOrMessage<CityResponse>>, ApiError> {
    let Json(body) = payload?;
    crud::update(&state, KIND, id, body.into_patch()?).await
}

/// `DELETE /city/{id}`: Delete a city.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] if streets still reference the city.
#[utoipa::path(
    delete,
    path = "/city/{id}",
    tag = "City",
    summary = "Delete a city",
    description = "Removes the city. The attempt is announced to every WebSocket client whether or not it applies.",
    params(
        ("id" = i64, Path, description = "City id"),
    ),
    responses(
        (status = 200, description = "Deletion or not-found message", body = MessageResponse),
        (status = 409, description = "City still has streets", body = ErrorResponse),
    )
)]
pub async fn delete_city(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    crud::delete(&state, KIND, id).await
}

/// City routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/city", get(list_cities).post(create_city))
        .route("/city/", get(list_cities).post(create_city))
        .route(
            "/city/{id}",
            get(get_city).patch(update_city).delete(delete_city),
        )
}
