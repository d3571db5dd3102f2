//! Shared application state injected into all Axum handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::WsConfig;
use crate::domain::ConnectionRegistry;
use crate::persistence::EntityStore;
use crate::service::{GeoService, Notifier};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Entity service for all REST operations.
    pub geo_service: Arc<GeoService>,
    /// Live WebSocket connections.
    pub registry: Arc<ConnectionRegistry>,
    /// WebSocket connection settings.
    pub ws_config: WsConfig,
    /// Address the server listens on, used when a request has no `Host`.
    pub listen_addr: SocketAddr,
}

impl AppState {
    /// Wires a registry, notifier and service around the given store.
    #[must_use]
    pub fn new(store: EntityStore, ws_config: WsConfig, listen_addr: SocketAddr) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let notifier = Notifier::new(Arc::clone(&registry));
        Self {
            geo_service: Arc::new(GeoService::new(store, notifier)),
            registry,
            ws_config,
            listen_addr,
        }
    }
}
