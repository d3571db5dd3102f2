//! Live set of accepted WebSocket connections with broadcast fan-out.
//!
//! [`ConnectionRegistry`] owns, for every open connection, the sending half
//! of that connection's bounded outbound queue. The connection's own task
//! drains the queue into the socket, so nothing in here ever awaits network
//! I/O: a slow client fills its own queue and gets evicted instead of
//! stalling everyone else.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::ConnectionId;

/// Sending half of a connection's outbound text queue.
pub type OutboundSender = mpsc::Sender<String>;

/// Failure to hand a message to one connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The handle is not (or no longer) registered.
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    /// The connection's outbound queue is full; the client is not reading.
    #[error("outbound queue of connection {0} is full")]
    QueueFull(ConnectionId),

    /// The connection's task has gone away.
    #[error("connection {0} is closed")]
    Closed(ConnectionId),
}

/// Registry of open connections.
///
/// # Concurrency
///
/// The map sits behind a [`RwLock`]. `register` / `unregister` / eviction
/// take the write lock; `broadcast` and `unicast` take the read lock only
/// long enough to snapshot the senders, then enqueue without holding it.
/// A broadcast therefore reaches exactly the connections registered when
/// the snapshot was taken.
///
/// # Unregistering
///
/// Each connection task calls [`unregister`](Self::unregister) once when it
/// detects disconnect. A connection may already have been evicted by a
/// failed send by then, so unregistering an unknown handle is a no-op that
/// returns `false`.
#[derive(Debug)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: RwLock<HashMap<ConnectionId, OutboundSender>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a freshly accepted connection and returns its handle.
    pub async fn register(&self, sender: OutboundSender) -> ConnectionId {
        let id = ConnectionId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.connections.write().await.insert(id, sender);
        tracing::debug!(connection_id = %id, "connection registered");
        id
    }

    /// Removes a connection. Returns `false` if it was not registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.write().await.remove(&id).is_some();
        tracing::debug!(connection_id = %id, removed, "connection unregistered");
        removed
    }

    /// Enqueues `text` for every registered connection.
    ///
    /// Per-connection failures do not stop delivery to the rest; the
    /// failing connections are evicted afterwards. Returns the number of
    /// connections the message was enqueued for.
    pub async fn broadcast(&self, text: &str) -> usize {
        let targets: Vec<(ConnectionId, OutboundSender)> = {
            let map = self.connections.read().await;
            map.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, tx) in targets {
            match try_enqueue(id, &tx, text.to_owned()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "broadcast send failed");
                    failed.push(id);
                }
            }
        }

        if !failed.is_empty() {
            self.evict(&failed).await;
        }
        delivered
    }

    /// Enqueues `text` for a single connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the handle is unknown or the send
    /// failed. A failed send also evicts the connection.
    pub async fn unicast(&self, id: ConnectionId, text: &str) -> Result<(), TransportError> {
        let tx = self
            .connections
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TransportError::UnknownConnection(id))?;

        let result = try_enqueue(id, &tx, text.to_owned());
        if result.is_err() {
            self.evict(&[id]).await;
        }
        result
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Drops the senders of the given connections. Their tasks observe the
    /// closed queue and run their normal disconnect path.
    async fn evict(&self, ids: &[ConnectionId]) {
        let mut map = self.connections.write().await;
        for id in ids {
            if map.remove(id).is_some() {
                tracing::warn!(connection_id = %id, "connection evicted after failed send");
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn try_enqueue(id: ConnectionId, tx: &OutboundSender, text: String) -> Result<(), TransportError> {
    tx.try_send(text).map_err(|err| match err {
        TrySendError::Full(_) => TransportError::QueueFull(id),
        TrySendError::Closed(_) => TransportError::Closed(id),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn channel() -> (OutboundSender, mpsc::Receiver<String>) {
        mpsc::channel(8)
    }

    #[tokio::test]
    async fn register_and_unregister_track_size() {
        let registry = ConnectionRegistry::new();
        assert!(registry.is_empty().await);

        let (tx1, _rx1) = channel();
        let (tx2, _rx2) = channel();
        let a = registry.register(tx1).await;
        let b = registry.register(tx2).await;
        assert_ne!(a, b);
        assert_eq!(registry.len().await, 2);

        assert!(registry.unregister(a).await);
        assert_eq!(registry.len().await, 1);
        assert!(registry.unregister(b).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn unregister_unknown_is_noop() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = channel();
        let id = registry.register(tx).await;
        assert!(registry.unregister(id).await);
        assert!(!registry.unregister(id).await);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_registered_connection() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        registry.register(tx1).await;
        registry.register(tx2).await;

        assert_eq!(registry.broadcast("hello").await, 2);
        assert_eq!(rx1.recv().await.as_deref(), Some("hello"));
        assert_eq!(rx2.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn no_retroactive_or_posthumous_delivery() {
        let registry = ConnectionRegistry::new();
        let (tx_gone, mut rx_gone) = channel();
        let gone = registry.register(tx_gone).await;
        registry.unregister(gone).await;

        registry.broadcast("first").await;

        let (tx_late, mut rx_late) = channel();
        registry.register(tx_late).await;
        registry.broadcast("second").await;

        assert_eq!(rx_late.recv().await.as_deref(), Some("second"));
        // The unregistered sender was dropped with the map entry.
        assert_eq!(rx_gone.recv().await, None);
    }

    #[tokio::test]
    async fn failing_connection_is_evicted_and_others_still_served() {
        let registry = ConnectionRegistry::new();
        let (tx_dead, rx_dead) = channel();
        let (tx_live, mut rx_live) = channel();
        registry.register(tx_dead).await;
        registry.register(tx_live).await;
        drop(rx_dead);

        assert_eq!(registry.broadcast("ping").await, 1);
        assert_eq!(rx_live.recv().await.as_deref(), Some("ping"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn full_queue_evicts_slow_client() {
        let registry = ConnectionRegistry::new();
        let (tx_slow, mut rx_slow) = mpsc::channel(1);
        let (tx_fast, mut rx_fast) = channel();
        let slow = registry.register(tx_slow).await;
        registry.register(tx_fast).await;

        assert_eq!(registry.broadcast("one").await, 2);
        assert_eq!(registry.broadcast("two").await, 1);
        assert_eq!(registry.len().await, 1);
        assert!(!registry.unregister(slow).await);

        assert_eq!(rx_fast.recv().await.as_deref(), Some("one"));
        assert_eq!(rx_fast.recv().await.as_deref(), Some("two"));
        assert_eq!(rx_slow.recv().await.as_deref(), Some("one"));
        assert_eq!(rx_slow.recv().await, None);
    }

    #[tokio::test]
    async fn unicast_targets_one_connection() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        let a = registry.register(tx1).await;
        registry.register(tx2).await;

        let Ok(()) = registry.unicast(a, "just you").await else {
            panic!("unicast failed");
        };
        assert_eq!(rx1.recv().await.as_deref(), Some("just you"));
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn unicast_unknown_handle_errors() {
        let registry = ConnectionRegistry::new();
        let id = ConnectionId::from_raw(42);
        let result = registry.unicast(id, "nobody").await;
        assert_eq!(result, Err(TransportError::UnknownConnection(id)));
    }

    #[tokio::test]
    async fn size_never_negative_under_interleaving() {
        let registry = std::sync::Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = std::sync::Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::channel(1);
                let id = registry.register(tx).await;
                registry.broadcast("x").await;
                registry.unregister(id).await;
            }));
        }
        for handle in handles {
            let Ok(()) = handle.await else {
                panic!("task panicked");
            };
        }
        assert!(registry.is_empty().await);
    }
}
