//! In-memory store backing every repository port.
//!
//! Used when `DATABASE_URL` is not configured. All tables sit behind one
//! async `RwLock`, so the multi-record friendship operations run under a
//! single write guard. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use orbit_core::domain::{Comment, FriendRequest, Notification, Post, User};
use orbit_core::error::RepoError;
use orbit_core::ports::{
    BaseRepository, CommentRepository, FriendRequestRepository, NotificationRepository,
    PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    friend_requests: HashMap<Uuid, FriendRequest>,
    notifications: HashMap<Uuid, Notification>,
}

/// Row access shared by the generic CRUD impl.
trait Table<T> {
    fn table(&self) -> &HashMap<Uuid, T>;
    fn table_mut(&mut self) -> &mut HashMap<Uuid, T>;
}

/// Entity-level hooks for the generic CRUD impl.
trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// Reject an insert that would break a uniqueness rule.
    fn check_unique(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }
}

macro_rules! table {
    ($ty:ty, $field:ident) => {
        impl Table<$ty> for Tables {
            fn table(&self) -> &HashMap<Uuid, $ty> {
                &self.$field
            }

            fn table_mut(&mut self) -> &mut HashMap<Uuid, $ty> {
                &mut self.$field
            }
        }
    };
}

table!(User, users);
table!(Post, posts);
table!(Comment, comments);
table!(FriendRequest, friend_requests);
table!(Notification, notifications);

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn check_unique(&self, tables: &Tables) -> Result<(), RepoError> {
        let clash = tables.users.values().any(|u| {
            u.id != self.id && (u.email == self.email || u.username == self.username)
        });
        if clash {
            return Err(RepoError::Constraint("users_email_or_username_key".into()));
        }
        Ok(())
    }
}

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Notification {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for FriendRequest {
    fn id(&self) -> Uuid {
        self.id
    }

    fn check_unique(&self, tables: &Tables) -> Result<(), RepoError> {
        let clash = tables.friend_requests.values().any(|r| {
            r.id != self.id && r.sender_id == self.sender_id && r.receiver_id == self.receiver_id
        });
        if clash {
            return Err(RepoError::Constraint("idx_friend_requests_pair".into()));
        }
        Ok(())
    }
}

/// Process-local store implementing all repository ports.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T> BaseRepository<T, Uuid> for InMemoryStore
where
    T: Record,
    Tables: Table<T>,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.table().get(&id).cloned())
    }

    async fn create(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.table().contains_key(&entity.id()) {
            return Err(RepoError::Constraint("primary key".into()));
        }
        entity.check_unique(&tables)?;

        tables.table_mut().insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.table().contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        entity.check_unique(&tables)?;

        tables.table_mut().insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .table_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_authors(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| author_ids.contains(&p.author_id))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn find_by_recipient(&self, recipient_id: Uuid) -> Result<Vec<Notification>, RepoError> {
        let tables = self.tables.read().await;
        let mut notifications: Vec<Notification> = tables
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}

#[async_trait]
impl FriendRequestRepository for InMemoryStore {
    async fn find_by_pair(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<FriendRequest>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .friend_requests
            .values()
            .find(|r| r.sender_id == sender_id && r.receiver_id == receiver_id)
            .cloned())
    }

    async fn find_pending_for_receiver(
        &self,
        receiver_id: Uuid,
    ) -> Result<Vec<FriendRequest>, RepoError> {
        let tables = self.tables.read().await;
        let mut requests: Vec<FriendRequest> = tables
            .friend_requests
            .values()
            .filter(|r| r.receiver_id == receiver_id && r.is_pending())
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }

    async fn accept(&self, request: FriendRequest) -> Result<FriendRequest, RepoError> {
        let mut tables = self.tables.write().await;

        // Validate every record before the first write.
        let stored = tables
            .friend_requests
            .get(&request.id)
            .ok_or(RepoError::NotFound)?;
        if !stored.is_pending() {
            return Err(RepoError::Conflict(format!(
                "friend request {} is {}",
                request.id, stored.status
            )));
        }
        if !tables.users.contains_key(&request.sender_id)
            || !tables.users.contains_key(&request.receiver_id)
        {
            return Err(RepoError::NotFound);
        }

        if let Some(sender) = tables.users.get_mut(&request.sender_id) {
            sender.add_friend(request.receiver_id);
        }
        if let Some(receiver) = tables.users.get_mut(&request.receiver_id) {
            receiver.add_friend(request.sender_id);
        }
        tables.friend_requests.insert(request.id, request.clone());

        Ok(request)
    }

    async fn dissolve(&self, a: Uuid, b: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        if let Some(user) = tables.users.get_mut(&a) {
            user.remove_friend(b);
        }
        if let Some(user) = tables.users.get_mut(&b) {
            user.remove_friend(a);
        }
        tables.friend_requests.retain(|_, r| !r.involves(a, b));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_core::domain::{NotificationKind, PostPrivacy};
    use std::sync::Arc;

    fn user(name: &str) -> User {
        User::new(name, &format!("{name}@example.com"), "hash".into(), None).unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        let users: &dyn UserRepository = &store;

        users.create(user("alice")).await.unwrap();
        let mut clone = user("alice2");
        clone.email = "alice@example.com".into();

        assert!(matches!(
            users.create(clone).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = InMemoryStore::new();
        let users: &dyn UserRepository = &store;

        assert!(matches!(users.update(user("ghost")).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_friend_request_pair_is_unique() {
        let store = InMemoryStore::new();
        let requests: &dyn FriendRequestRepository = &store;
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        requests.create(FriendRequest::new(a, b).unwrap()).await.unwrap();

        assert!(matches!(
            requests.create(FriendRequest::new(a, b).unwrap()).await,
            Err(RepoError::Constraint(_))
        ));
        // The reverse direction is a different ordered pair.
        assert!(requests.create(FriendRequest::new(b, a).unwrap()).await.is_ok());
    }

    #[tokio::test]
    async fn test_posts_newest_first_for_audience() {
        let store = Arc::new(InMemoryStore::new());
        let posts: Arc<dyn PostRepository> = store.clone();
        let (me, friend, stranger) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut older = Post::new(me, Some("first".into()), None, PostPrivacy::Public).unwrap();
        older.created_at -= chrono::TimeDelta::minutes(5);
        posts.create(older).await.unwrap();
        posts
            .create(Post::new(friend, Some("second".into()), None, PostPrivacy::Private).unwrap())
            .await
            .unwrap();
        posts
            .create(Post::new(stranger, Some("hidden".into()), None, PostPrivacy::Public).unwrap())
            .await
            .unwrap();

        let feed = posts.find_by_authors(&[me, friend]).await.unwrap();
        let texts: Vec<&str> = feed.iter().map(|p| p.content.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_notifications_newest_first() {
        let store = InMemoryStore::new();
        let notifications: &dyn NotificationRepository = &store;
        let recipient = Uuid::new_v4();

        let mut first = Notification::new(recipient, NotificationKind::Like, None, None);
        first.created_at -= chrono::TimeDelta::seconds(30);
        let first_id = first.id;
        notifications.create(first).await.unwrap();
        let second = notifications
            .create(Notification::new(recipient, NotificationKind::Comment, None, None))
            .await
            .unwrap();
        notifications
            .create(Notification::new(Uuid::new_v4(), NotificationKind::Like, None, None))
            .await
            .unwrap();

        let listed = notifications.find_by_recipient(recipient).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second.id, first_id]);
    }

    #[tokio::test]
    async fn test_dissolve_clears_both_sides_and_requests() {
        let store = InMemoryStore::new();
        let users: &dyn UserRepository = &store;
        let requests: &dyn FriendRequestRepository = &store;

        let mut alice = user("alice");
        let mut bob = user("bob");
        alice.add_friend(bob.id);
        bob.add_friend(alice.id);
        let (alice, bob) = (users.create(alice).await.unwrap(), users.create(bob).await.unwrap());
        requests.create(FriendRequest::new(alice.id, bob.id).unwrap()).await.unwrap();
        requests.create(FriendRequest::new(bob.id, alice.id).unwrap()).await.unwrap();

        requests.dissolve(bob.id, alice.id).await.unwrap();

        let alice = users.find_by_id(alice.id).await.unwrap().unwrap();
        let bob = users.find_by_id(bob.id).await.unwrap().unwrap();
        assert!(alice.friends.is_empty());
        assert!(bob.friends.is_empty());
        assert!(requests.find_by_pair(alice.id, bob.id).await.unwrap().is_none());
        assert!(requests.find_by_pair(bob.id, alice.id).await.unwrap().is_none());
    }
}
