//! # geo-gateway
//!
//! REST API and WebSocket gateway for a three-level geography dataset
//! (countries → cities → streets).
//!
//! Every write through the REST API is announced as a text message to all
//! connected WebSocket clients. The same connections double as a simple
//! chat room: clients join at `/ws/{client_id}`, and whatever they send is
//! echoed back and broadcast to everyone.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── GeoService + Notifier (service/)
//!     │
//!     ├── ConnectionRegistry (domain/)
//!     │
//!     └── EntityStore: in-memory | PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
