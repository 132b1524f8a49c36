use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, FriendRequest, Notification, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Load several users at once. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts written by any of `author_ids`, newest first.
    async fn find_by_authors(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

#[async_trait]
pub trait NotificationRepository: BaseRepository<Notification, Uuid> {
    /// A recipient's notifications, newest first.
    async fn find_by_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>, RepoError>;
}

/// Friend-request records plus the multi-record friendship mutations.
///
/// `accept` and `dissolve` each touch several records and must apply all
/// of their writes or none.
#[async_trait]
pub trait FriendRequestRepository: BaseRepository<FriendRequest, Uuid> {
    /// The record for the ordered (sender, receiver) pair, in any status.
    async fn find_by_pair(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<FriendRequest>, RepoError>;

    /// Pending requests addressed to `receiver_id`, oldest first.
    async fn find_pending_for_receiver(
        &self,
        receiver_id: Uuid,
    ) -> Result<Vec<FriendRequest>, RepoError>;

    /// Persist an already-accepted request and add the two users to each
    /// other's friend sets.
    async fn accept(&self, request: FriendRequest) -> Result<FriendRequest, RepoError>;

    /// Remove `a` and `b` from each other's friend sets and delete every
    /// request record between them, in both directions.
    async fn dissolve(&self, a: Uuid, b: Uuid) -> Result<(), RepoError>;
}
