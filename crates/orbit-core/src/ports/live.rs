//! Live delivery port - pushes events to connected clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Notification, NotificationKind};

/// Event name clients listen on for new notifications.
pub const NEW_NOTIFICATION_EVENT: &str = "new_notification";

/// Room a user's sockets join after authenticating.
pub fn user_room(user_id: Uuid) -> String {
    format!("user_{user_id}")
}

/// Payload of a `new_notification` push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub notification_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub related_user_id: Option<Uuid>,
    pub related_post_id: Option<Uuid>,
    pub message: String,
}

impl From<&Notification> for LiveEvent {
    fn from(notification: &Notification) -> Self {
        Self {
            notification_id: notification.id,
            kind: notification.kind,
            related_user_id: notification.related_user_id,
            related_post_id: notification.related_post_id,
            message: format!("New {} notification", notification.kind),
        }
    }
}

/// Directory of live connections able to reach a user.
///
/// Delivery is best-effort: a recipient with no open connection is not an
/// error, and callers never roll back persisted state on failure.
#[async_trait]
pub trait LiveNotifier: Send + Sync {
    async fn push(&self, recipient_id: Uuid, event: &LiveEvent) -> Result<(), LiveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    #[error("Failed to serialize event: {0}")]
    Serialization(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}
