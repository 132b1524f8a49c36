use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Lifecycle of a friend request: `Pending` moves once to `Accepted` or
/// `Rejected`, both terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
            FriendRequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for FriendRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FriendRequest {
    /// Open a pending request. Self-requests are rejected here; pair and
    /// friendship conflicts need the store and are checked by the service.
    pub fn new(sender_id: Uuid, receiver_id: Uuid) -> Result<Self, DomainError> {
        if sender_id == receiver_id {
            return Err(DomainError::validation(
                "Cannot send friend request to yourself",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            status: FriendRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == FriendRequestStatus::Pending
    }

    /// True if the request links `a` and `b`, in either direction.
    pub fn involves(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }

    pub fn accept(&mut self, actor: Uuid) -> Result<(), DomainError> {
        self.transition(actor, FriendRequestStatus::Accepted, "accept")
    }

    pub fn reject(&mut self, actor: Uuid) -> Result<(), DomainError> {
        self.transition(actor, FriendRequestStatus::Rejected, "reject")
    }

    fn transition(
        &mut self,
        actor: Uuid,
        to: FriendRequestStatus,
        verb: &str,
    ) -> Result<(), DomainError> {
        if actor != self.receiver_id {
            return Err(DomainError::unauthorized(format!(
                "Not authorized to {verb} this request"
            )));
        }
        if !self.is_pending() {
            return Err(DomainError::validation("Request already processed"));
        }

        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cannot_request_self() {
        let id = Uuid::new_v4();
        assert!(matches!(
            FriendRequest::new(id, id),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_accept_by_receiver() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mut request = FriendRequest::new(alice, bob).unwrap();
        assert!(request.is_pending());

        request.accept(bob).unwrap();
        assert_eq!(request.status, FriendRequestStatus::Accepted);
    }

    #[test]
    fn test_only_receiver_can_transition() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mut request = FriendRequest::new(alice, bob).unwrap();

        assert!(matches!(request.accept(alice), Err(DomainError::Unauthorized(_))));
        assert!(matches!(
            request.reject(Uuid::new_v4()),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(request.is_pending());
    }

    #[test]
    fn test_terminal_states_do_not_transition() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mut request = FriendRequest::new(alice, bob).unwrap();
        request.reject(bob).unwrap();

        assert!(matches!(request.accept(bob), Err(DomainError::Validation(_))));
        assert!(matches!(request.reject(bob), Err(DomainError::Validation(_))));
        assert_eq!(request.status, FriendRequestStatus::Rejected);
    }

    #[test]
    fn test_involves_either_direction() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let request = FriendRequest::new(alice, bob).unwrap();

        assert!(request.involves(alice, bob));
        assert!(request.involves(bob, alice));
        assert!(!request.involves(alice, Uuid::new_v4()));
    }
}
