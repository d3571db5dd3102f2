//! WebSocket connection state machine.
//!
//! `CONNECTING → OPEN` happens when [`run_connection`] starts: the
//! connection is registered and its arrival broadcast. While `OPEN`, each
//! text frame is echoed to the sender and then broadcast with the sender's
//! label. When the transport closes (or the registry evicts the
//! connection) it is unregistered and its departure broadcast.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::messages::ChatMessage;
use crate::config::WsConfig;
use crate::domain::{ConnectionId, ConnectionRegistry};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads text frames from the client and answers them through the
///   registry.
/// - Drains this connection's outbound queue into the socket.
/// - Sends keepalive pings if configured.
pub async fn run_connection(
    socket: WebSocket,
    client_id: i64,
    registry: Arc<ConnectionRegistry>,
    config: WsConfig,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<String>(config.outbound_capacity);

    let connection_id = registry.register(out_tx).await;
    tracing::info!(client_id, %connection_id, "client joined");
    registry
        .broadcast(&ChatMessage::Joined { client_id }.to_string())
        .await;

    let mut keepalive = config.ping_interval().map(|period| {
        let mut timer = tokio::time::interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    });
    let send_timeout = config.send_timeout();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        on_text(&registry, connection_id, client_id, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::warn!(client_id, %connection_id, error = %err, "ws receive error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            // Queued by broadcast / unicast; `None` means we were evicted
            outbound = out_rx.recv() => {
                let Some(text) = outbound else {
                    break;
                };
                if !write(&mut ws_tx, Message::text(text), send_timeout).await {
                    break;
                }
            }
            () = tick(&mut keepalive) => {
                if !write(&mut ws_tx, Message::Ping(Bytes::new()), send_timeout).await {
                    break;
                }
            }
        }
    }

    registry.unregister(connection_id).await;
    registry
        .broadcast(&ChatMessage::Left { client_id }.to_string())
        .await;
    tracing::info!(client_id, %connection_id, "client left");

    let _ = tokio::time::timeout(send_timeout, ws_tx.close()).await;
}

/// Echoes `text` to its sender, then broadcasts it with the sender's label.
/// The broadcast is attempted even if the echo fails.
async fn on_text(
    registry: &ConnectionRegistry,
    connection_id: ConnectionId,
    client_id: i64,
    text: &str,
) {
    tracing::debug!(client_id, %connection_id, len = text.len(), "ws text frame");

    if let Err(err) = registry
        .unicast(connection_id, &ChatMessage::Echo { text }.to_string())
        .await
    {
        tracing::warn!(client_id, error = %err, "echo failed");
    }
    registry
        .broadcast(&ChatMessage::Said { client_id, text }.to_string())
        .await;
}

/// Writes one frame, bounded by `limit`. Returns `false` if the socket is
/// unusable.
async fn write(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    msg: Message,
    limit: Duration,
) -> bool {
    match tokio::time::timeout(limit, ws_tx.send(msg)).await {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "ws send failed");
            false
        }
        Err(_) => {
            tracing::warn!(timeout_secs = limit.as_secs(), "ws send timed out");
            false
        }
    }
}

/// Completes on the next keepalive tick, or never if keepalive is off.
async fn tick(keepalive: &mut Option<Interval>) {
    match keepalive {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_survives_failed_echo() {
        let registry = ConnectionRegistry::new();

        // Sender whose socket task is gone: its queue is closed.
        let (sender_tx, sender_rx) = mpsc::channel(4);
        let sender = registry.register(sender_tx).await;
        drop(sender_rx);

        let (other_tx, mut other_rx) = mpsc::channel(4);
        registry.register(other_tx).await;

        on_text(&registry, sender, 7, "still here?").await;

        let Ok(text) = other_rx.try_recv() else {
            panic!("broadcast was not attempted after the echo failed");
        };
        assert_eq!(text, "Client#7 send message: still here?");
        assert!(other_rx.try_recv().is_err());
        assert_eq!(registry.len().await, 1);
        assert!(!registry.unregister(sender).await);
    }

    #[tokio::test]
    async fn full_sender_queue_still_broadcasts() {
        let registry = ConnectionRegistry::new();

        let (sender_tx, mut sender_rx) = mpsc::channel(1);
        let sender = registry.register(sender_tx).await;
        let (other_tx, mut other_rx) = mpsc::channel(4);
        registry.register(other_tx).await;

        // Fill the sender's queue so the echo cannot be enqueued.
        let Ok(()) = registry.unicast(sender, "backlog").await else {
            panic!("priming unicast failed");
        };

        on_text(&registry, sender, 3, "hi").await;

        let Ok(text) = other_rx.try_recv() else {
            panic!("other client missed the broadcast");
        };
        assert_eq!(text, "Client#3 send message: hi");
        assert_eq!(registry.len().await, 1);

        // Only the backlog reached the evicted sender.
        assert_eq!(sender_rx.recv().await.as_deref(), Some("backlog"));
        assert!(sender_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn echo_precedes_broadcast_for_sender() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        let id = registry.register(tx).await;

        on_text(&registry, id, 9, "ciao").await;

        assert_eq!(rx.recv().await.as_deref(), Some("You send message: ciao"));
        assert_eq!(
            rx.recv().await.as_deref(),
            Some("Client#9 send message: ciao")
        );
    }
}
