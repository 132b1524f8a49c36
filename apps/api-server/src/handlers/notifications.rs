use actix_web::{HttpResponse, web};
use uuid::Uuid;

use orbit_core::services::NotificationEntry;
use orbit_shared::dto::NotificationResponse;

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let notifications: Vec<NotificationResponse> = state
        .notifications
        .list(identity.user_id)
        .await?
        .into_iter()
        .map(present::notification)
        .collect();

    Ok(HttpResponse::Ok().json(notifications))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let notification = state
        .notifications
        .mark_read(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(present::notification(NotificationEntry {
        notification,
        related_user: None,
        related_post_text: None,
    })))
}
