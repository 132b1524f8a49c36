//! Feed assembly.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, UserSummary};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub post: Post,
    pub author: Option<UserSummary>,
}

pub struct FeedService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl FeedService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Posts by `user_id` and their friends, newest first.
    ///
    /// Post privacy is not applied here.
    pub async fn feed(&self, user_id: Uuid) -> Result<Vec<FeedEntry>, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let mut audience = user.friends.clone();
        audience.push(user.id);

        let posts = self.posts.find_by_authors(&audience).await?;
        let authors = summaries(self.users.as_ref(), &audience).await?;

        tracing::debug!(user_id = %user_id, posts = posts.len(), "Feed assembled");

        Ok(posts
            .into_iter()
            .map(|post| FeedEntry {
                author: authors.get(&post.author_id).cloned(),
                post,
            })
            .collect())
    }
}

pub(crate) async fn summaries(
    users: &dyn UserRepository,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, UserSummary>, DomainError> {
    Ok(users
        .find_many(ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.summary()))
        .collect())
}
