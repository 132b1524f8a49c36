//! Posts, the feed, and likes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use orbit_core::domain::PostPrivacy;
use orbit_shared::dto::{CreatePostRequest, PostResponse};

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let privacy = req
        .privacy
        .as_deref()
        .map(str::parse::<PostPrivacy>)
        .transpose()?
        .unwrap_or_default();

    let post = state
        .posts
        .create(identity.user_id, req.content, req.image, privacy)
        .await?;

    let author = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .map(|u| u.summary());

    Ok(HttpResponse::Created().json(present::post(post, author)))
}

/// GET /api/posts
pub async fn feed(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .feed
        .feed(identity.user_id)
        .await?
        .into_iter()
        .map(present::feed_entry)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// PUT /api/posts/{id}/like
///
/// Responds with the post's like set after the toggle.
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (post, outcome) = state
        .posts
        .toggle_like(identity.user_id, path.into_inner())
        .await?;

    tracing::debug!(post_id = %post.id, user_id = %identity.user_id, outcome = ?outcome, "Like toggled");

    Ok(HttpResponse::Ok().json(post.likes))
}
