//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod notifications;
mod posts;
mod present;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{json_error_handler, path_error_handler};

/// Extractor settings plus every route. Shared by the server and the
/// handler tests.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .configure(configure_routes);
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Fixed segments are registered ahead of `/{id}`
            .service(
                web::scope("/users")
                    .route("/friend-requests", web::get().to(users::friend_requests))
                    .route("/profile", web::put().to(users::update_profile))
                    .route(
                        "/friend-request/{id}",
                        web::post().to(users::send_friend_request),
                    )
                    .route(
                        "/friend-request/{request_id}/accept",
                        web::put().to(users::accept_friend_request),
                    )
                    .route(
                        "/friend-request/{request_id}/reject",
                        web::put().to(users::reject_friend_request),
                    )
                    .route("/friends/{id}", web::delete().to(users::remove_friend))
                    .route("/{id}", web::get().to(users::get_profile)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::feed))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}/like", web::put().to(posts::toggle_like)),
            )
            .service(
                web::scope("/comments")
                    .route("/{post_id}", web::get().to(comments::list_comments))
                    .route("/{post_id}", web::post().to(comments::add_comment)),
            )
            .service(
                web::scope("/notifications")
                    .route("", web::get().to(notifications::list_notifications))
                    .route("/{id}/read", web::put().to(notifications::mark_read)),
            ),
    );
}
