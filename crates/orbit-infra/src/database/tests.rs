use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use orbit_core::domain::{FriendRequestStatus, NotificationKind, Post, PostPrivacy, User};
use orbit_core::error::RepoError;
use orbit_core::ports::{BaseRepository, FriendRequestRepository, NotificationRepository};

use crate::database::entity::{friend_request, notification, post, user};
use crate::database::postgres_repo::{
    PostgresFriendRequestRepository, PostgresNotificationRepository, PostgresPostRepository,
    PostgresUserRepository,
};

fn user_model(id: Uuid, username: &str, friends: Vec<Uuid>) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_owned(),
        first_name: Some("Test".to_owned()),
        last_name: None,
        bio: None,
        avatar: "https://example.com/a.png".to_owned(),
        website: None,
        friends,
        is_private: false,
        allow_friend_requests: true,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let liker = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            author_id,
            text: "Hello orbit".to_owned(),
            image: String::new(),
            likes: vec![liker],
            privacy: post::Privacy::Friends,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.content.text, "Hello orbit");
    assert_eq!(post.privacy, PostPrivacy::Friends);
    assert!(post.is_liked_by(liker));
}

#[tokio::test]
async fn test_find_user_maps_profile_and_friends() {
    let id = Uuid::new_v4();
    let friend = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user_model(id, "alice", vec![friend])]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user: User = repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.profile.first_name.as_deref(), Some("Test"));
    assert!(user.is_friend_of(friend));
    assert!(user.privacy.allow_friend_requests);
}

#[tokio::test]
async fn test_create_returns_inserted_row() {
    let request = orbit_core::domain::FriendRequest::new(Uuid::new_v4(), Uuid::new_v4()).unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![friend_request::Model {
            id: request.id,
            sender_id: request.sender_id,
            receiver_id: request.receiver_id,
            status: friend_request::Status::Pending,
            created_at: request.created_at.into(),
            updated_at: request.updated_at.into(),
        }]])
        .into_connection();

    let repo = PostgresFriendRequestRepository::new(db);

    let saved = repo.create(request.clone()).await.unwrap();
    assert_eq!(saved.id, request.id);
    assert_eq!(saved.status, FriendRequestStatus::Pending);
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let result = BaseRepository::<User, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_pending_requests_map_status() {
    let receiver = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![friend_request::Model {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: receiver,
            status: friend_request::Status::Pending,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresFriendRequestRepository::new(db);

    let pending = repo.find_pending_for_receiver(receiver).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(pending[0].is_pending());
}

#[tokio::test]
async fn test_notifications_map_kind() {
    let recipient = Uuid::new_v4();
    let actor = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![notification::Model {
            id: Uuid::new_v4(),
            recipient_id: recipient,
            kind: notification::Kind::FriendAccept,
            related_user_id: Some(actor),
            related_post_id: None,
            is_read: false,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresNotificationRepository::new(db);

    let listed = repo.find_by_recipient(recipient).await.unwrap();
    assert_eq!(listed[0].kind, NotificationKind::FriendAccept);
    assert_eq!(listed[0].related_user_id, Some(actor));
}

#[tokio::test]
async fn test_accept_with_missing_user_writes_nothing() {
    let sender = Uuid::new_v4();
    let receiver = Uuid::new_v4();
    let mut request = orbit_core::domain::FriendRequest::new(sender, receiver).unwrap();
    request.accept(receiver).unwrap();

    // Only the sender row comes back from the locking select.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user_model(sender, "sender", vec![])]])
        .into_connection();

    let repo = PostgresFriendRequestRepository::new(db);

    let result = repo.accept(request).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_accept_refuses_request_rejected_meanwhile() {
    let sender = Uuid::new_v4();
    let receiver = Uuid::new_v4();
    let mut request = orbit_core::domain::FriendRequest::new(sender, receiver).unwrap();
    request.accept(receiver).unwrap();

    // The locked re-read sees the row already rejected.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            user_model(sender, "sender", vec![]),
            user_model(receiver, "receiver", vec![]),
        ]])
        .append_query_results(vec![vec![friend_request::Model {
            id: request.id,
            sender_id: sender,
            receiver_id: receiver,
            status: friend_request::Status::Rejected,
            created_at: request.created_at.into(),
            updated_at: request.updated_at.into(),
        }]])
        .into_connection();

    let repo = PostgresFriendRequestRepository::new(db);

    let result = repo.accept(request).await;
    assert!(matches!(result, Err(RepoError::Conflict(_))));
}
