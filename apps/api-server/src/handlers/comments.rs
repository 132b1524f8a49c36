use actix_web::{HttpResponse, web};
use uuid::Uuid;

use orbit_shared::dto::{CommentResponse, CreateCommentRequest};

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/comments/{post_id}
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let created = state
        .comments
        .add(identity.user_id, path.into_inner(), &body.content)
        .await?;

    Ok(HttpResponse::Created().json(present::comment(created)))
}

/// GET /api/comments/{post_id}
pub async fn list_comments(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments: Vec<CommentResponse> = state
        .comments
        .list(path.into_inner())
        .await?
        .into_iter()
        .map(present::comment)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}
