//! Domain entities - the core business objects.

mod comment;
mod friend_request;
mod notification;
mod post;
mod user;

pub use comment::Comment;
pub use friend_request::{FriendRequest, FriendRequestStatus};
pub use notification::{Notification, NotificationKind};
pub use post::{LikeToggle, Post, PostContent, PostPrivacy};
pub use user::{
    PrivacySettings, Profile, ProfileUpdate, User, UserSummary, default_avatar, normalize_email,
};
