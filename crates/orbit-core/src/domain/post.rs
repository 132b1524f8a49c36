use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const MAX_TEXT_LEN: usize = 2000;

/// Audience a post is meant for. Stored and returned, not yet enforced by
/// the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostPrivacy {
    #[default]
    Public,
    Friends,
    Private,
}

impl PostPrivacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostPrivacy::Public => "public",
            PostPrivacy::Friends => "friends",
            PostPrivacy::Private => "private",
        }
    }
}

impl fmt::Display for PostPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostPrivacy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(PostPrivacy::Public),
            "friends" => Ok(PostPrivacy::Friends),
            "private" => Ok(PostPrivacy::Private),
            other => Err(DomainError::validation(format!(
                "Unknown privacy setting: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub text: String,
    pub image: String,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

/// Post entity. Content is immutable after creation; only the like set
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: PostContent,
    pub likes: Vec<Uuid>,
    pub privacy: PostPrivacy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. At least one of text or image must be present.
    pub fn new(
        author_id: Uuid,
        text: Option<String>,
        image: Option<String>,
        privacy: PostPrivacy,
    ) -> Result<Self, DomainError> {
        let text = text.map(|t| t.trim().to_string()).unwrap_or_default();
        let image = image.map(|i| i.trim().to_string()).unwrap_or_default();

        if text.is_empty() && image.is_empty() {
            return Err(DomainError::validation("Post must have content or image"));
        }
        if text.chars().count() > MAX_TEXT_LEN {
            return Err(DomainError::validation(format!(
                "Post text cannot exceed {MAX_TEXT_LEN} characters"
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            content: PostContent { text, image },
            likes: Vec::new(),
            privacy,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Flip `user_id`'s membership in the like set.
    pub fn toggle_like(&mut self, user_id: Uuid) -> LikeToggle {
        self.updated_at = Utc::now();
        if self.is_liked_by(user_id) {
            self.likes.retain(|id| *id != user_id);
            LikeToggle::Unliked
        } else {
            self.likes.push(user_id);
            LikeToggle::Liked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_requires_text_or_image() {
        let author = Uuid::new_v4();

        assert!(Post::new(author, None, None, PostPrivacy::Public).is_err());
        assert!(Post::new(author, Some("  ".into()), Some(String::new()), PostPrivacy::Public).is_err());
        assert!(Post::new(author, None, Some("https://img/1.png".into()), PostPrivacy::Public).is_ok());
    }

    #[test]
    fn test_post_text_limit() {
        let author = Uuid::new_v4();
        let result = Post::new(author, Some("a".repeat(2001)), None, PostPrivacy::Public);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_toggle_like_twice_restores_like_set() {
        let mut post = Post::new(Uuid::new_v4(), Some("hello".into()), None, PostPrivacy::Friends).unwrap();
        let existing = Uuid::new_v4();
        post.likes.push(existing);
        let original = post.likes.clone();

        let liker = Uuid::new_v4();
        assert_eq!(post.toggle_like(liker), LikeToggle::Liked);
        assert!(post.is_liked_by(liker));
        assert_eq!(post.toggle_like(liker), LikeToggle::Unliked);

        assert_eq!(post.likes, original);
    }

    #[test]
    fn test_privacy_parsing() {
        assert_eq!("friends".parse::<PostPrivacy>().unwrap(), PostPrivacy::Friends);
        assert!("everyone".parse::<PostPrivacy>().is_err());
        assert_eq!(PostPrivacy::Private.to_string(), "private");
    }
}
