//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use orbit_core::domain::{Comment, FriendRequest, Notification, Post, User};
use orbit_core::error::RepoError;
use orbit_core::ports::{
    CommentRepository, FriendRequestRepository, NotificationRepository, PostRepository,
    UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::friend_request::{self, Entity as FriendRequestEntity};
use super::entity::notification::{self, Entity as NotificationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

pub type PostgresNotificationRepository = PostgresBaseRepository<NotificationEntity>;

/// Friend requests, plus the friend-set writes that go with accepting or
/// dissolving a friendship.
pub type PostgresFriendRequestRepository = PostgresBaseRepository<FriendRequestEntity>;

/// Mask the local part of an email so logs carry no full address.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 1 => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_authors(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = PostEntity::find()
            .filter(post::Column::AuthorId.is_in(author_ids.iter().copied()))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn find_by_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let result = NotificationEntity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Lock both user rows for the rest of the transaction.
async fn lock_pair<C>(conn: &C, a: Uuid, b: Uuid) -> Result<Vec<user::Model>, RepoError>
where
    C: ConnectionTrait,
{
    UserEntity::find()
        .filter(user::Column::Id.is_in([a, b]))
        .lock_exclusive()
        .all(conn)
        .await
        .map_err(map_db_err)
}

/// Overwrite one user's friend set inside `conn`.
async fn write_friends<C>(conn: &C, model: user::Model, friends: Vec<Uuid>) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    let mut active = model.into_active_model();
    active.friends = Set(friends);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(conn).await.map_err(map_db_err)?;
    Ok(())
}

#[async_trait]
impl FriendRequestRepository for PostgresFriendRequestRepository {
    async fn find_by_pair(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<FriendRequest>, RepoError> {
        let result = FriendRequestEntity::find()
            .filter(friend_request::Column::SenderId.eq(sender_id))
            .filter(friend_request::Column::ReceiverId.eq(receiver_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_pending_for_receiver(
        &self,
        receiver_id: Uuid,
    ) -> Result<Vec<FriendRequest>, RepoError> {
        let result = FriendRequestEntity::find()
            .filter(friend_request::Column::ReceiverId.eq(receiver_id))
            .filter(friend_request::Column::Status.eq(friend_request::Status::Pending))
            .order_by_asc(friend_request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn accept(&self, request: FriendRequest) -> Result<FriendRequest, RepoError> {
        let (sender_id, receiver_id) = (request.sender_id, request.receiver_id);

        // Dropping `txn` on any early return rolls everything back.
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let users = lock_pair(&txn, sender_id, receiver_id).await?;
        if users.len() != 2 {
            return Err(RepoError::NotFound);
        }

        // Re-read the request under lock. Only a pending row may be accepted.
        let stored = FriendRequestEntity::find_by_id(request.id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;
        if stored.status != friend_request::Status::Pending {
            return Err(RepoError::Conflict(format!(
                "friend request {} is no longer pending",
                request.id
            )));
        }

        for model in users {
            let other = if model.id == sender_id {
                receiver_id
            } else {
                sender_id
            };
            if model.friends.contains(&other) {
                continue;
            }
            let mut friends = model.friends.clone();
            friends.push(other);
            write_friends(&txn, model, friends).await?;
        }

        let active: friend_request::ActiveModel = request.into();
        let saved = active.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(sender = %sender_id, receiver = %receiver_id, "Friendship created");
        Ok(saved.into())
    }

    async fn dissolve(&self, a: Uuid, b: Uuid) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        for model in lock_pair(&txn, a, b).await? {
            let other = if model.id == a { b } else { a };
            if !model.friends.contains(&other) {
                continue;
            }
            let friends = model.friends.iter().copied().filter(|id| *id != other).collect();
            write_friends(&txn, model, friends).await?;
        }

        let deleted = FriendRequestEntity::delete_many()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friend_request::Column::SenderId.eq(a))
                            .add(friend_request::Column::ReceiverId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(friend_request::Column::SenderId.eq(b))
                            .add(friend_request::Column::ReceiverId.eq(a)),
                    ),
            )
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(
            a = %a,
            b = %b,
            requests_removed = deleted.rows_affected,
            "Friendship dissolved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
