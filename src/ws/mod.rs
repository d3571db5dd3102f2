//! WebSocket layer: upgrade handler, per-connection loop, chat texts.
//!
//! The endpoint at `/ws/{client_id}` joins the chat and receives every
//! CRUD notification. All connections share one
//! [`crate::domain::ConnectionRegistry`].

pub mod connection;
pub mod handler;
pub mod messages;
