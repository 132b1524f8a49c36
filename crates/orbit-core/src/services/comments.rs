use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, NotificationKind, UserSummary};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

use super::NotificationService;
use super::feed::summaries;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
            notifications,
        }
    }

    pub async fn add(
        &self,
        author: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> Result<(Comment, Option<UserSummary>), DomainError> {
        let comment = Comment::new(post_id, author, content)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let comment = self.comments.create(comment).await?;

        self.notifications
            .emit_logged(post.author_id, NotificationKind::Comment, author, Some(post.id))
            .await;

        let author = self.users.find_by_id(author).await?.map(|u| u.summary());
        Ok((comment, author))
    }

    /// Comments on a post, oldest first, with their authors.
    pub async fn list(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<(Comment, Option<UserSummary>)>, DomainError> {
        let comments = self.comments.find_by_post(post_id).await?;

        let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors = summaries(self.users.as_ref(), &author_ids).await?;

        Ok(comments
            .into_iter()
            .map(|c| {
                let author = authors.get(&c.author_id).cloned();
                (c, author)
            })
            .collect())
    }
}
