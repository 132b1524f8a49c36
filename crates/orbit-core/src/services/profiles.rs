//! Profile reads and edits.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ProfileUpdate, User, UserSummary};
use crate::error::DomainError;
use crate::ports::UserRepository;

use super::feed::summaries;
use super::{FriendshipService, Relationship};

/// A profile as seen by a particular viewer.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: User,
    pub friends: Vec<UserSummary>,
    pub relationship: Relationship,
}

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    friendships: Arc<FriendshipService>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, friendships: Arc<FriendshipService>) -> Self {
        Self { users, friendships }
    }

    pub async fn view(&self, viewer: Uuid, id: Uuid) -> Result<ProfileView, DomainError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        let relationship = self.friendships.relationship(viewer, &user).await?;

        let by_id = summaries(self.users.as_ref(), &user.friends).await?;
        let friends = user
            .friends
            .iter()
            .filter_map(|f| by_id.get(f).cloned())
            .collect();

        Ok(ProfileView {
            user,
            friends,
            relationship,
        })
    }

    pub async fn update(&self, actor: Uuid, update: ProfileUpdate) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(actor)
            .await?
            .ok_or_else(|| DomainError::not_found("User", actor))?;

        user.apply_profile_update(update)?;
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %actor, "Profile updated");
        Ok(user)
    }
}
