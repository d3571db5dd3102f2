//! Street CRUD handlers: list, get, create, update, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::crud;
use crate::api::dto::{
    StreetCreate, StreetResponse, StreetUpdate, EntityOrMessage, MessageResponse, PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::EntityKind;
use crate::error::{ApiError, ErrorResponse};

const KIND: EntityKind = EntityKind::Street;

/// `GET /street`: List streets.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/street",
    tag = "Street",
    summary = "List streets",
    description = "Returns up to `limit` streets after skipping `skip`, ordered by id.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Street page", body = Vec<StreetResponse>),
    )
)]
pub async fn list_streets(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<StreetResponse>>, ApiError> {
    crud::list(&state, KIND, params).await
}

/// `GET /street/{id}`: Get a street.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    get,
    path = "/street/{id}",
    tag = "Street",
    summary = "Get a street",
    description = "Returns the street, or a `{\"message\"}` body if it does not exist.",
    params(
        ("id" = i64, Path, description = "Street id"),
    ),
    responses(
        (status = 200, description = "Street or not-found message", body = StreetResponse),
    )
)]
pub async fn get_street(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EntityOrMessage<StreetResponse>>, ApiError> {
    crud::get(&state, KIND, id).await
}

/// `POST /street`: Create a street.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or an unknown city.
#[utoipa::path(
    post,
    path = "/street",
    tag = "Street",
    summary = "Create a street",
    description = "Creates a street and notifies every WebSocket client.",
    request_body = StreetCreate,
    responses(
        (status = 201, description = "Street created", body = StreetResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "City does not exist", body = ErrorResponse),
    )
)]
pub async fn create_street(
    State(state): State<AppState>,
    payload: Result<Json<StreetCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<StreetResponse>), ApiError> {
    let Json(body) = payload?;
    crud::create(&state, KIND, body.into_new_record()?).await
}

/// `PATCH /street/{id}`: Update a street.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or an unknown city.
#[utoipa::path(
    patch,
    path = "/street/{id}",
    tag = "Street",
    summary = "Update a street",
    description = "Applies the fields present in the body. The attempt is announced to every WebSocket client whether or not it applies.",
    params(
        ("id" = i64, Path, description = "Street id"),
    ),
    request_body = StreetUpdate,
    responses(
        (status = 200, description = "Updated street or not-found message", body = StreetResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "City does not exist", body = ErrorResponse),
    )
)]
pub async fn update_street(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<StreetUpdate>, JsonRejection>,
) -> Result<Json<EntityOrMessage<StreetResponse>>, ApiError> {
    let Json(body) = payload?;
    crud::update(&state, KIND, id, body.into_patch()?).await
}

/// `DELETE /street/{id}`: Delete a street.
///
/// # Errors
///
/// Returns [`ApiError`] on store failures.
#[utoipa::path(
    delete,
    path = "/street/{id}",
    tag = "Street",
    summary = "Delete a street",
    description = "Removes the street. The attempt is announced to every WebSocket client whether or not it applies.",
    params(
        ("id" = i64, Path, description = "Street id"),
    ),
    responses(
        (status = 200, description = "Deletion or not-found message", body = MessageResponse),
    )
)]
pub async fn delete_street(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    crud::delete(&state, KIND, id).await
}

/// Street routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/street", get(list_streets).post(create_street))
        .route("/street/", get(list_streets).post(create_street))
        .route(
            "/street/{id}",
            get(get_street).patch(update_street).delete(delete_street),
        )
}
