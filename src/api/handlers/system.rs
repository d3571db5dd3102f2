//! System endpoints: health check and the chat landing page.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

const LANDING_TEMPLATE: &str = include_str!("landing.html");

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    store: String,
    connections: usize,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, version, active store and the number of open WebSocket connections.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: state.geo_service.store().backend().to_string(),
            connections: state.registry.len().await,
        }),
    )
}

/// `GET /`: Chat page wired to this server's WebSocket endpoint.
pub async fn landing_page(headers: HeaderMap, State(state): State<AppState>) -> Html<String> {
    let host = public_host(&headers).unwrap_or_else(|| state.listen_addr.to_string());
    Html(render_landing(ws_scheme(&headers), &host))
}

/// `wss` if the request reached us over HTTPS (as reported by a proxy),
/// `ws` otherwise.
#[must_use]
pub fn ws_scheme(headers: &HeaderMap) -> &'static str {
    let forwarded = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    match forwarded {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "wss",
        _ => "ws",
    }
}

/// Host the client used, preferring the proxy's `X-Forwarded-Host`.
///
/// Values that are not a plain `host[:port]` are skipped, since the result
/// is spliced into the page's script.
#[must_use]
pub fn public_host(headers: &HeaderMap) -> Option<String> {
    ["x-forwarded-host", "host"]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .find(|v| is_plain_host(v))
        .map(str::to_string)
}

fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '[' | ']'))
}

fn render_landing(scheme: &str, host: &str) -> String {
    LANDING_TEMPLATE
        .replace("{{ws_protocol}}", scheme)
        .replace("{{server_host}}", host)
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing_page))
        .route("/health", get(health_handler))
}
