//! Application state - shared across all handlers.

use std::sync::Arc;

use orbit_core::ports::{
    CommentRepository, FriendRequestRepository, LiveNotifier, NotificationRepository,
    PasswordService, PostRepository, TokenService, UserRepository,
};
use orbit_core::services::{
    CommentService, FeedService, FriendshipService, NotificationService, PostService,
    ProfileService,
};
use orbit_infra::{Argon2PasswordService, InMemoryStore};

#[cfg(feature = "postgres")]
use orbit_infra::DatabaseConfig;
#[cfg(feature = "postgres")]
use orbit_infra::database::{
    PostgresCommentRepository, PostgresFriendRequestRepository, PostgresNotificationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// One handle per repository port.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub friend_requests: Arc<dyn FriendRequestRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    /// Backend label reported by the health check.
    pub storage: &'static str,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            friend_requests: store.clone(),
            notifications: store,
            storage: "memory",
        }
    }

    /// Connect to Postgres when configured, otherwise use the in-memory
    /// store. A failed connection also falls back, with an error log.
    #[cfg(feature = "postgres")]
    pub async fn from_config(config: Option<&DatabaseConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
            return Self::in_memory();
        };

        match config.connect().await {
            Ok(db) => Self {
                users: Arc::new(PostgresUserRepository::new(db.clone())),
                posts: Arc::new(PostgresPostRepository::new(db.clone())),
                comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                friend_requests: Arc::new(PostgresFriendRequestRepository::new(db.clone())),
                notifications: Arc::new(PostgresNotificationRepository::new(db)),
                storage: "postgres",
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                Self::in_memory()
            }
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub notifications: Arc<NotificationService>,
    pub friendships: Arc<FriendshipService>,
    pub profiles: Arc<ProfileService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub feed: Arc<FeedService>,
    pub storage: &'static str,
}

impl AppState {
    /// Wire the services over the given repositories and live channel.
    pub fn build(
        repos: Repositories,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        live: Arc<dyn LiveNotifier>,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(
            repos.notifications.clone(),
            repos.users.clone(),
            repos.posts.clone(),
            live,
        ));
        let friendships = Arc::new(FriendshipService::new(
            repos.users.clone(),
            repos.friend_requests.clone(),
            notifications.clone(),
        ));

        tracing::info!(storage = repos.storage, "Application state initialized");

        Self {
            profiles: Arc::new(ProfileService::new(repos.users.clone(), friendships.clone())),
            posts: Arc::new(PostService::new(repos.posts.clone(), notifications.clone())),
            comments: Arc::new(CommentService::new(
                repos.comments.clone(),
                repos.posts.clone(),
                repos.users.clone(),
                notifications.clone(),
            )),
            feed: Arc::new(FeedService::new(repos.users.clone(), repos.posts.clone())),
            users: repos.users,
            tokens,
            passwords,
            notifications,
            friendships,
            storage: repos.storage,
        }
    }

    /// In-memory state with Argon2 passwords. Used without a database and
    /// by the handler tests.
    pub fn in_memory(tokens: Arc<dyn TokenService>, live: Arc<dyn LiveNotifier>) -> Self {
        Self::build(
            Repositories::in_memory(),
            tokens,
            Arc::new(Argon2PasswordService::new()),
            live,
        )
    }
}
