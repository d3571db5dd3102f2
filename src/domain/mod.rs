//! Domain layer: entity kinds, record snapshots, notifications and the
//! live connection registry.
//!
//! Nothing in here knows about HTTP or SQL. The store, the service and the
//! WebSocket handler all meet on these types.

pub mod connection_id;
pub mod connection_registry;
pub mod entity_kind;
pub mod notification;
pub mod record;

pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionRegistry, OutboundSender, TransportError};
pub use entity_kind::EntityKind;
pub use notification::{MutationEvent, Notification, Subject};
pub use record::{NewRecord, Record, RecordPatch};
