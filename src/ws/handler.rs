//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws/{client_id}`: Upgrade HTTP connection to WebSocket.
///
/// `client_id` is an unauthenticated label shown in chat messages; it is
/// not checked for uniqueness.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(client_id): Path<i64>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = Arc::clone(&state.registry);
    let config = state.ws_config;

    ws.on_upgrade(move |socket| run_connection(socket, client_id, registry, config))
}
