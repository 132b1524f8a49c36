//! Notification emitter and inbox.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Notification, NotificationKind, UserSummary};
use crate::error::DomainError;
use crate::ports::{LiveEvent, LiveNotifier, NotificationRepository, PostRepository, UserRepository};

/// A notification with its related user and post expanded for display.
#[derive(Debug, Clone)]
pub struct NotificationEntry {
    pub notification: Notification,
    pub related_user: Option<UserSummary>,
    pub related_post_text: Option<String>,
}

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    live: Arc<dyn LiveNotifier>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        live: Arc<dyn LiveNotifier>,
    ) -> Self {
        Self {
            notifications,
            users,
            posts,
            live,
        }
    }

    /// Record a notification for `recipient` about something `actor` did,
    /// then try to push it live.
    ///
    /// Returns `None` when `actor == recipient`. A failed push is logged and
    /// leaves the stored record in place.
    pub async fn emit(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        actor: Uuid,
        post: Option<Uuid>,
    ) -> Result<Option<Notification>, DomainError> {
        if recipient == actor {
            return Ok(None);
        }

        let notification = self
            .notifications
            .create(Notification::new(recipient, kind, Some(actor), post))
            .await?;

        tracing::debug!(
            notification_id = %notification.id,
            recipient = %recipient,
            kind = %kind,
            "Notification recorded"
        );

        let event = LiveEvent::from(&notification);
        if let Err(e) = self.live.push(recipient, &event).await {
            tracing::warn!(
                notification_id = %notification.id,
                recipient = %recipient,
                error = %e,
                "Live notification push failed"
            );
        }

        Ok(Some(notification))
    }

    /// Emit, logging instead of propagating failures. Used for side-effect
    /// notifications that must not fail the action that caused them.
    pub async fn emit_logged(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        actor: Uuid,
        post: Option<Uuid>,
    ) {
        if let Err(e) = self.emit(recipient, kind, actor, post).await {
            tracing::error!(recipient = %recipient, kind = %kind, error = %e, "Notification error");
        }
    }

    /// The recipient's notifications, newest first.
    pub async fn list(&self, recipient: Uuid) -> Result<Vec<NotificationEntry>, DomainError> {
        let notifications = self.notifications.find_by_recipient(recipient).await?;

        let mut user_ids: Vec<Uuid> = notifications
            .iter()
            .filter_map(|n| n.related_user_id)
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<Uuid, UserSummary> = self
            .users
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        let mut post_texts: HashMap<Uuid, String> = HashMap::new();
        for post_id in notifications.iter().filter_map(|n| n.related_post_id) {
            if post_texts.contains_key(&post_id) {
                continue;
            }
            if let Some(post) = self.posts.find_by_id(post_id).await? {
                post_texts.insert(post_id, post.content.text);
            }
        }

        Ok(notifications
            .into_iter()
            .map(|notification| NotificationEntry {
                related_user: notification
                    .related_user_id
                    .and_then(|id| users.get(&id).cloned()),
                related_post_text: notification
                    .related_post_id
                    .and_then(|id| post_texts.get(&id).cloned()),
                notification,
            })
            .collect())
    }

    pub async fn mark_read(&self, actor: Uuid, id: Uuid) -> Result<Notification, DomainError> {
        let mut notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification", id))?;

        notification.mark_read(actor)?;
        Ok(self.notifications.update(notification).await?)
    }
}
