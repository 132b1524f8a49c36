//! In-process live notifier.
//!
//! Each connected user gets a broadcast channel keyed by their id. Events
//! are serialized to the same JSON the socket.io channel emits. Used when
//! the websocket transport is disabled, and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use orbit_core::ports::{LiveError, LiveEvent, LiveNotifier};

pub struct InMemoryLiveNotifier {
    connections: Arc<RwLock<HashMap<Uuid, broadcast::Sender<String>>>>,
    buffer_size: usize,
}

impl InMemoryLiveNotifier {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }

    /// Open (or share) the user's channel and return a receiver for it.
    pub async fn connect(&self, user_id: Uuid) -> broadcast::Receiver<String> {
        let mut connections = self.connections.write().await;

        let sender = connections
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);

        tracing::debug!(user_id = %user_id, "Live channel connected");
        sender.subscribe()
    }

    /// Drop the user's channel. Outstanding receivers see it close.
    pub async fn disconnect(&self, user_id: Uuid) {
        self.connections.write().await.remove(&user_id);
        tracing::debug!(user_id = %user_id, "Live channel disconnected");
    }

    pub async fn is_connected(&self, user_id: Uuid) -> bool {
        self.connections
            .read()
            .await
            .get(&user_id)
            .is_some_and(|tx| tx.receiver_count() > 0)
    }
}

impl Default for InMemoryLiveNotifier {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl LiveNotifier for InMemoryLiveNotifier {
    async fn push(&self, recipient_id: Uuid, event: &LiveEvent) -> Result<(), LiveError> {
        let connections = self.connections.read().await;

        let Some(sender) = connections.get(&recipient_id) else {
            tracing::debug!(recipient = %recipient_id, "Recipient offline, skipping live push");
            return Ok(());
        };

        let payload =
            serde_json::to_string(event).map_err(|e| LiveError::Serialization(e.to_string()))?;

        sender
            .send(payload)
            .map_err(|_| LiveError::Delivery(format!("no open receivers for {recipient_id}")))?;

        tracing::debug!(recipient = %recipient_id, "Live event pushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::domain::{Notification, NotificationKind};

    fn event_for(recipient: Uuid) -> LiveEvent {
        let notification =
            Notification::new(recipient, NotificationKind::Like, Some(Uuid::new_v4()), None);
        LiveEvent::from(&notification)
    }

    #[tokio::test]
    async fn test_connected_user_receives_event() {
        let notifier = InMemoryLiveNotifier::default();
        let user = Uuid::new_v4();
        let mut rx = notifier.connect(user).await;

        let event = event_for(user);
        notifier.push(user, &event).await.unwrap();

        let payload = rx.recv().await.unwrap();
        let received: LiveEvent = serde_json::from_str(&payload).unwrap();
        assert_eq!(received, event);
        assert!(payload.contains("\"type\":\"like\""));
    }

    #[tokio::test]
    async fn test_offline_user_is_not_an_error() {
        let notifier = InMemoryLiveNotifier::default();
        let user = Uuid::new_v4();

        assert!(notifier.push(user, &event_for(user)).await.is_ok());
        assert!(!notifier.is_connected(user).await);
    }

    #[tokio::test]
    async fn test_dropped_receiver_reports_delivery_failure() {
        let notifier = InMemoryLiveNotifier::default();
        let user = Uuid::new_v4();
        let rx = notifier.connect(user).await;
        drop(rx);

        let result = notifier.push(user, &event_for(user)).await;
        assert!(matches!(result, Err(LiveError::Delivery(_))));

        notifier.disconnect(user).await;
        assert!(notifier.push(user, &event_for(user)).await.is_ok());
    }
}
