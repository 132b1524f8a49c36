//! Domain to wire conversions.

use orbit_core::domain::{Comment, FriendRequest, Post, User, UserSummary};
use orbit_core::services::{FeedEntry, NotificationEntry, ProfileView, Relationship};
use orbit_shared::dto::{
    CommentResponse, FriendRequestResponse, NotificationResponse, PendingRequestResponse,
    PostContentDto, PostResponse, PrivacyDto, ProfileDto, ProfileResponse, RelatedPostDto,
    UserResponse, UserSummaryResponse,
};

pub fn summary(summary: UserSummary) -> UserSummaryResponse {
    UserSummaryResponse {
        id: summary.id,
        username: summary.username,
        avatar: summary.avatar,
    }
}

fn profile_parts(user: &User) -> (ProfileDto, PrivacyDto) {
    (
        ProfileDto {
            first_name: user.profile.first_name.clone(),
            last_name: user.profile.last_name.clone(),
            bio: user.profile.bio.clone(),
            avatar: user.profile.avatar.clone(),
            website: user.profile.website.clone(),
        },
        PrivacyDto {
            is_private: user.privacy.is_private,
            allow_friend_requests: user.privacy.allow_friend_requests,
        },
    )
}

pub fn user(user: &User) -> UserResponse {
    let (profile, privacy) = profile_parts(user);
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        profile,
        privacy,
        created_at: user.created_at,
    }
}

fn relationship(relationship: Relationship) -> &'static str {
    match relationship {
        Relationship::Myself => "self",
        Relationship::Friends => "friends",
        Relationship::PendingSent => "pending_sent",
        Relationship::PendingReceived => "pending_received",
        Relationship::Stranger => "none",
    }
}

pub fn profile(view: ProfileView) -> ProfileResponse {
    let (profile, privacy) = profile_parts(&view.user);
    ProfileResponse {
        id: view.user.id,
        username: view.user.username,
        email: view.user.email,
        profile,
        privacy,
        friends: view.friends.into_iter().map(summary).collect(),
        relationship: relationship(view.relationship).to_string(),
        created_at: view.user.created_at,
    }
}

pub fn friend_request(request: FriendRequest) -> FriendRequestResponse {
    FriendRequestResponse {
        id: request.id,
        sender_id: request.sender_id,
        receiver_id: request.receiver_id,
        status: request.status.to_string(),
        created_at: request.created_at,
        updated_at: request.updated_at,
    }
}

pub fn pending_request(
    (request, sender): (FriendRequest, Option<UserSummary>),
) -> PendingRequestResponse {
    PendingRequestResponse {
        id: request.id,
        sender: sender.map(summary),
        status: request.status.to_string(),
        created_at: request.created_at,
    }
}

pub fn post(post: Post, author: Option<UserSummary>) -> PostResponse {
    PostResponse {
        id: post.id,
        author: author.map(summary),
        author_id: post.author_id,
        content: PostContentDto {
            text: post.content.text,
            image: post.content.image,
        },
        likes: post.likes,
        privacy: post.privacy.to_string(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn feed_entry(entry: FeedEntry) -> PostResponse {
    post(entry.post, entry.author)
}

pub fn comment((comment, author): (Comment, Option<UserSummary>)) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author: author.map(summary),
        author_id: comment.author_id,
        content: comment.content,
        created_at: comment.created_at,
    }
}

pub fn notification(entry: NotificationEntry) -> NotificationResponse {
    let n = entry.notification;
    NotificationResponse {
        id: n.id,
        recipient_id: n.recipient_id,
        kind: n.kind.to_string(),
        related_user_id: n.related_user_id,
        related_user: entry.related_user.map(summary),
        related_post: n.related_post_id.map(|id| RelatedPostDto {
            id,
            text: entry.related_post_text,
        }),
        is_read: n.is_read,
        created_at: n.created_at,
    }
}
