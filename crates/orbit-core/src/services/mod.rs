//! Application services - the use cases behind the HTTP surface.
//!
//! Each service holds the ports it needs. Multi-record writes go through the
//! repository operations that promise atomicity (`FriendRequestRepository::
//! accept` / `dissolve`); everything else is a plain read-modify-write.

mod comments;
mod feed;
mod friendship;
mod notifications;
mod posts;
mod profiles;

pub use comments::CommentService;
pub use feed::{FeedEntry, FeedService};
pub use friendship::{FriendshipService, Relationship};
pub use notifications::{NotificationEntry, NotificationService};
pub use posts::PostService;
pub use profiles::{ProfileService, ProfileView};
