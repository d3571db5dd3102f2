//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Entity endpoints live at `/country`, `/city` and `/street`; the chat
//! page at `/`; the WebSocket endpoint at `/ws/{client_id}`.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI description of the REST endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "geo-gateway",
        description = "CRUD over countries, cities and streets with WebSocket chat and change notifications."
    ),
    paths(
        handlers::system::health_handler,
        handlers::country::list_countries,
        handlers::country::get_country,
        handlers::country::create_country,
        handlers::country::update_country,
        handlers::country::delete_country,
        handlers::city::list_cities,
        handlers::city::get_city,
        handlers::city::create_city,
        handlers::city::update_city,
        handlers::city::delete_city,
        handlers::street::list_streets,
        handlers::street::get_street,
        handlers::street::create_street,
        handlers::street::update_street,
        handlers::street::delete_street,
    ),
    components(schemas(
        dto::CountryCreate,
        dto::CountryUpdate,
        dto::CountryResponse,
        dto::CityCreate,
        dto::CityUpdate,
        dto::CityResponse,
        dto::StreetCreate,
        dto::StreetUpdate,
        dto::StreetResponse,
        dto::MessageResponse,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Country", description = "Country records"),
        (name = "City", description = "City records, each in a country"),
        (name = "Street", description = "Street records, each in a city"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        get(|| async { axum::Json(ApiDoc::openapi()) }),
    );

    router
}

/// Builds the full application: REST routes, WebSocket endpoint and the
/// HTTP middleware stack, bound to `state`.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(build_router())
        .layer(TimeoutLayer::new(request_timeout))
        // Registered after the timeout so long-lived sockets are not cut.
        .route("/ws/{client_id}", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::config::WsConfig;
    use crate::persistence::EntityStore;

    fn app() -> Router {
        let addr = "127.0.0.1:8080".parse().unwrap();
        let state = AppState::new(EntityStore::in_memory(), WsConfig::default(), addr);
        build_app(state, Duration::from_secs(5))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let response = app()
            .oneshot(Request::get("/city").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn zero_limit_returns_empty_page() {
        let app = app();
        let create = Request::post("/country")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "Italy"}"#))
            .unwrap();
        let created = app.clone().oneshot(create).await.unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(Request::get("/country?limit=0").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));

        let response = app
            .oneshot(Request::get("/country?limit=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_json(response).await;
        assert_eq!(page[0]["name"], "Italy");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let request = Request::post("/country")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 1001);
    }

    #[tokio::test]
    async fn unknown_street_is_a_message() {
        let response = app()
            .oneshot(Request::get("/street/3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "street 3 not found"})
        );
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/country/{id}"].is_object());
        assert!(doc["paths"]["/street"].is_object());
    }

    #[test]
    fn openapi_lists_every_entity_path() {
        let doc = ApiDoc::openapi();
        for path in ["/country", "/city", "/street", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
