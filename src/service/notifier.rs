//! Turns mutation outcomes into broadcast text.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, EntityKind, MutationEvent, Notification, Subject};

/// Notification dispatcher.
///
/// Renders one message per call and broadcasts it through the shared
/// [`ConnectionRegistry`], so chat clients and notification listeners see
/// the same stream.
#[derive(Debug, Clone)]
pub struct Notifier {
    registry: Arc<ConnectionRegistry>,
}

impl Notifier {
    /// Creates a dispatcher over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Broadcasts the message for `event` on a record of `kind`.
    ///
    /// Returns the number of connections it was enqueued for. Delivery
    /// failures are handled by the registry and never reach the caller.
    pub async fn notify(&self, event: MutationEvent, kind: EntityKind, subject: Subject) -> usize {
        let message = Notification::new(event, kind, subject).message();
        let delivered = self.registry.broadcast(&message).await;
        tracing::debug!(?event, %kind, delivered, "notification broadcast");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn notify_broadcasts_rendered_message() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx, mut rx) = mpsc::channel(4);
        registry.register(tx).await;

        let notifier = Notifier::new(Arc::clone(&registry));
        let delivered = notifier
            .notify(MutationEvent::UpdateFailed, EntityKind::City, Subject::Id(12))
            .await;

        assert_eq!(delivered, 1);
        assert_eq!(rx.recv().await.as_deref(), Some("Failed to update city 12"));
    }

    #[tokio::test]
    async fn notify_without_listeners_is_silent() {
        let notifier = Notifier::new(Arc::new(ConnectionRegistry::new()));
        let delivered = notifier
            .notify(MutationEvent::Deleted, EntityKind::Street, Subject::Id(1))
            .await;
        assert_eq!(delivered, 0);
    }
}
