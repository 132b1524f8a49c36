//! Friend-request lifecycle and the symmetric friend relation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{FriendRequest, NotificationKind, User, UserSummary};
use crate::error::{DomainError, RepoError};
use crate::ports::{FriendRequestRepository, UserRepository};

use super::NotificationService;

/// How a profile relates to the user viewing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    #[serde(rename = "self")]
    Myself,
    Friends,
    PendingSent,
    PendingReceived,
    #[serde(rename = "none")]
    Stranger,
}

pub struct FriendshipService {
    users: Arc<dyn UserRepository>,
    requests: Arc<dyn FriendRequestRepository>,
    notifications: Arc<NotificationService>,
}

impl FriendshipService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        requests: Arc<dyn FriendRequestRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            users,
            requests,
            notifications,
        }
    }

    /// Open a pending request from `sender` to `receiver`.
    pub async fn send_request(
        &self,
        sender: Uuid,
        receiver: Uuid,
    ) -> Result<FriendRequest, DomainError> {
        let request = FriendRequest::new(sender, receiver)?;

        let receiver_user = self.require_user(receiver).await?;
        let sender_user = self.require_user(sender).await?;

        if self.requests.find_by_pair(sender, receiver).await?.is_some() {
            return Err(DomainError::duplicate("Friend request already sent"));
        }
        if sender_user.is_friend_of(receiver) {
            return Err(DomainError::duplicate("Already friends"));
        }
        if let Some(reverse) = self.requests.find_by_pair(receiver, sender).await? {
            if reverse.is_pending() {
                return Err(DomainError::duplicate(
                    "This user has already sent you a friend request",
                ));
            }
        }
        if !receiver_user.privacy.allow_friend_requests {
            return Err(DomainError::validation(
                "This user is not accepting friend requests",
            ));
        }

        let request = self.requests.create(request).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::duplicate("Friend request already sent"),
            other => other.into(),
        })?;

        tracing::info!(request_id = %request.id, sender = %sender, receiver = %receiver, "Friend request sent");

        self.notifications
            .emit_logged(receiver, NotificationKind::FriendRequest, sender, None)
            .await;

        Ok(request)
    }

    /// Accept a pending request addressed to `actor`.
    ///
    /// `id` is a request id, or the sender's id when the caller only knows
    /// who asked (notifications carry the actor, not the request).
    pub async fn accept(&self, actor: Uuid, id: Uuid) -> Result<FriendRequest, DomainError> {
        let mut request = self.resolve(actor, id).await?;
        request.accept(actor)?;

        // A reject or a second accept may have landed since `resolve`.
        let request = self.requests.accept(request).await.map_err(|e| match e {
            RepoError::Conflict(_) => DomainError::validation("Request already processed"),
            other => other.into(),
        })?;

        tracing::info!(request_id = %request.id, sender = %request.sender_id, receiver = %actor, "Friend request accepted");

        self.notifications
            .emit_logged(request.sender_id, NotificationKind::FriendAccept, actor, None)
            .await;

        Ok(request)
    }

    pub async fn reject(&self, actor: Uuid, id: Uuid) -> Result<FriendRequest, DomainError> {
        let mut request = self.resolve(actor, id).await?;
        request.reject(actor)?;

        let request = self.requests.update(request).await?;
        tracing::info!(request_id = %request.id, receiver = %actor, "Friend request rejected");
        Ok(request)
    }

    /// Break the friendship between `user` and `friend` and forget any
    /// request records between them.
    pub async fn unfriend(&self, user: Uuid, friend: Uuid) -> Result<(), DomainError> {
        self.require_user(friend).await?;
        self.requests.dissolve(user, friend).await?;

        tracing::info!(user = %user, friend = %friend, "Friend removed");
        Ok(())
    }

    /// Pending requests received by `user`, with their senders.
    pub async fn pending_for(
        &self,
        user: Uuid,
    ) -> Result<Vec<(FriendRequest, Option<UserSummary>)>, DomainError> {
        let requests = self.requests.find_pending_for_receiver(user).await?;
        let sender_ids: Vec<Uuid> = requests.iter().map(|r| r.sender_id).collect();

        let senders: HashMap<Uuid, UserSummary> = self
            .users
            .find_many(&sender_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        Ok(requests
            .into_iter()
            .map(|r| {
                let sender = senders.get(&r.sender_id).cloned();
                (r, sender)
            })
            .collect())
    }

    pub async fn relationship(
        &self,
        viewer: Uuid,
        target: &User,
    ) -> Result<Relationship, DomainError> {
        if target.id == viewer {
            return Ok(Relationship::Myself);
        }
        if target.is_friend_of(viewer) {
            return Ok(Relationship::Friends);
        }

        let sent = self.requests.find_by_pair(viewer, target.id).await?;
        if sent.is_some_and(|r| r.is_pending()) {
            return Ok(Relationship::PendingSent);
        }

        let received = self.requests.find_by_pair(target.id, viewer).await?;
        if received.is_some_and(|r| r.is_pending()) {
            return Ok(Relationship::PendingReceived);
        }

        Ok(Relationship::Stranger)
    }

    async fn resolve(&self, actor: Uuid, id: Uuid) -> Result<FriendRequest, DomainError> {
        if let Some(request) = self.requests.find_by_id(id).await? {
            return Ok(request);
        }

        match self.requests.find_by_pair(id, actor).await? {
            Some(request) if request.is_pending() => Ok(request),
            _ => Err(DomainError::not_found("Friend request", id)),
        }
    }

    async fn require_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }
}
