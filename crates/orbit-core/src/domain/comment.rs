use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const MAX_CONTENT_LEN: usize = 500;

/// Comment on a post. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, content: &str) -> Result<Self, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("Comment cannot be empty"));
        }
        if content.chars().count() > MAX_CONTENT_LEN {
            return Err(DomainError::validation(format!(
                "Comment cannot exceed {MAX_CONTENT_LEN} characters"
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_is_trimmed_and_bounded() {
        let comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), "  nice  ").unwrap();
        assert_eq!(comment.content, "nice");

        assert!(Comment::new(Uuid::new_v4(), Uuid::new_v4(), "   ").is_err());
        assert!(Comment::new(Uuid::new_v4(), Uuid::new_v4(), &"x".repeat(501)).is_err());
    }
}
