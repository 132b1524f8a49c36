//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod live;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use live::{LiveError, LiveEvent, LiveNotifier, NEW_NOTIFICATION_EVENT, user_room};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, CommentRepository, FriendRequestRepository, NotificationRepository,
    PostRepository, UserRepository,
};
