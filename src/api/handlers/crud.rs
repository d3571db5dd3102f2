//! Kind-agnostic handler bodies shared by the country, city and street
//! endpoints. The per-resource modules only pick the kind and the DTOs.

use axum::Json;
use axum::http::StatusCode;

use crate::api::dto::{EntityOrMessage, MessageResponse, PaginationParams};
use crate::app_state::AppState;
use crate::domain::{EntityKind, NewRecord, Record, RecordPatch};
use crate::error::ApiError;

/// One page of `kind`, converted to the resource's response type.
pub(crate) async fn list<T: From<Record>>(
    state: &AppState,
    kind: EntityKind,
    params: PaginationParams,
) -> Result<Json<Vec<T>>, ApiError> {
    let params = params.clamped();
    let records = state
        .geo_service
        .list(kind, params.skip, params.limit)
        .await?;
    Ok(Json(records.into_iter().map(T::from).collect()))
}

pub(crate) async fn get<T: From<Record>>(
    state: &AppState,
    kind: EntityKind,
    id: i64,
) -> Result<Json<EntityOrMessage<T>>, ApiError> {
    let found = state.geo_service.get(kind, id).await?;
    Ok(Json(entity_or_not_found(kind, id, found)))
}

pub(crate) async fn create<T: From<Record>>(
    state: &AppState,
    kind: EntityKind,
    input: NewRecord,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let record = state.geo_service.create(kind, input).await?;
    Ok((StatusCode::CREATED, Json(T::from(record))))
}

pub(crate) async fn update<T: From<Record>>(
    state: &AppState,
    kind: EntityKind,
    id: i64,
    patch: RecordPatch,
) -> Result<Json<EntityOrMessage<T>>, ApiError> {
    let updated = state.geo_service.update(kind, id, patch).await?;
    Ok(Json(entity_or_not_found(kind, id, updated)))
}

pub(crate) async fn delete(
    state: &AppState,
    kind: EntityKind,
    id: i64,
) -> Result<Json<MessageResponse>, ApiError> {
    let body = if state.geo_service.delete(kind, id).await? {
        MessageResponse::deleted(kind)
    } else {
        MessageResponse::not_found(kind, id)
    };
    Ok(Json(body))
}

fn entity_or_not_found<T: From<Record>>(
    kind: EntityKind,
    id: i64,
    record: Option<Record>,
) -> EntityOrMessage<T> {
    match record {
        Some(record) => EntityOrMessage::Entity(T::from(record)),
        None => EntityOrMessage::Message(MessageResponse::not_found(kind, id)),
    }
}
