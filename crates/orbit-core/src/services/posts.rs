//! Post creation and like toggling.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{LikeToggle, NotificationKind, Post, PostPrivacy};
use crate::error::DomainError;
use crate::ports::PostRepository;

use super::NotificationService;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    notifications: Arc<NotificationService>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, notifications: Arc<NotificationService>) -> Self {
        Self {
            posts,
            notifications,
        }
    }

    pub async fn create(
        &self,
        author: Uuid,
        text: Option<String>,
        image: Option<String>,
        privacy: PostPrivacy,
    ) -> Result<Post, DomainError> {
        let post = Post::new(author, text, image, privacy)?;
        let post = self.posts.create(post).await?;

        tracing::info!(post_id = %post.id, author = %author, "Post created");
        Ok(post)
    }

    /// Flip `actor`'s like on a post. A new like notifies the author.
    ///
    /// Plain read-modify-write: concurrent toggles by the same user may
    /// race.
    pub async fn toggle_like(
        &self,
        actor: Uuid,
        post_id: Uuid,
    ) -> Result<(Post, LikeToggle), DomainError> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        let outcome = post.toggle_like(actor);
        let post = self.posts.update(post).await?;

        if outcome == LikeToggle::Liked {
            self.notifications
                .emit_logged(post.author_id, NotificationKind::Like, actor, Some(post.id))
                .await;
        }

        Ok((post, outcome))
    }
}
