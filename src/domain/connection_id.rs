//! Opaque handle for a registered WebSocket connection.

use std::fmt;

use serde::Serialize;

/// Handle returned by [`super::ConnectionRegistry::register`].
///
/// Assigned from a per-registry counter, never reused while the registry
/// lives. Unrelated to the client-supplied chat identifier, which is only a
/// label and may be shared by several connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
