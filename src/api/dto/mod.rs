//! Data Transfer Objects for REST request/response serialization.
//!
//! Timestamps are serialized as RFC 3339 strings.

pub mod common_dto;
pub mod entity_dto;

pub use common_dto::*;
pub use entity_dto::*;
