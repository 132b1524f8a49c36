//! Profiles and the friend graph.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use orbit_core::domain::ProfileUpdate;
use orbit_shared::MessageResponse;
use orbit_shared::dto::{PendingRequestResponse, UpdateProfileRequest};

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_profile(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .profiles
        .view(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(present::profile(view)))
}

/// PUT /api/users/profile
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let update = ProfileUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        bio: req.bio,
        avatar: req.avatar,
        website: req.website,
        is_private: req.is_private,
        allow_friend_requests: req.allow_friend_requests,
    };

    let user = state.profiles.update(identity.user_id, update).await?;
    Ok(HttpResponse::Ok().json(present::user(&user)))
}

/// POST /api/users/friend-request/{id}
pub async fn send_friend_request(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let request = state
        .friendships
        .send_request(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(present::friend_request(request)))
}

/// PUT /api/users/friend-request/{request_id}/accept
///
/// `request_id` may also be the sender's user id.
pub async fn accept_friend_request(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .friendships
        .accept(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Friend request accepted")))
}

/// PUT /api/users/friend-request/{request_id}/reject
pub async fn reject_friend_request(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .friendships
        .reject(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Friend request rejected")))
}

/// GET /api/users/friend-requests
pub async fn friend_requests(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let pending: Vec<PendingRequestResponse> = state
        .friendships
        .pending_for(identity.user_id)
        .await?
        .into_iter()
        .map(present::pending_request)
        .collect();

    Ok(HttpResponse::Ok().json(pending))
}

/// DELETE /api/users/friends/{id}
pub async fn remove_friend(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .friendships
        .unfriend(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Friend removed")))
}
