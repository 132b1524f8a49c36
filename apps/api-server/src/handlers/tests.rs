use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use orbit_infra::{InMemoryLiveNotifier, JwtConfig, JwtTokenService};
use orbit_shared::dto::{AuthResponse, PendingRequestResponse, ProfileResponse};

use super::configure_app;
use crate::state::AppState;

fn test_state() -> AppState {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig::default()));
    AppState::in_memory(tokens, Arc::new(InMemoryLiveNotifier::default()))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_app),
        )
        .await
    };
}

macro_rules! signup {
    ($app:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": $name,
                "email": format!("{}@example.com", $name),
                "password": "correct-horse",
            }))
            .to_request();
        let auth: AuthResponse = test::call_and_read_body_json(&$app, req).await;
        auth
    }};
}

fn bearer(auth: &AuthResponse) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", auth.token))
}

#[actix_web::test]
async fn health_reports_storage() {
    let app = app!(test_state());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn register_issues_bearer_token() {
    let app = app!(test_state());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "email": "Alice@Example.com",
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let auth: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.user.email, "alice@example.com");
    assert!(!auth.token.is_empty());
}

#[actix_web::test]
async fn register_rejects_existing_user() {
    let app = app!(test_state());
    signup!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "alice",
            "email": "other@example.com",
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "User already exists");
}

#[actix_web::test]
async fn register_requires_all_fields() {
    let app = app!(test_state());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "alice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Please add all fields");
}

#[actix_web::test]
async fn login_with_wrong_password_is_bad_request() {
    let app = app!(test_state());
    signup!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "alice@example.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ALICE@example.com", "password": "correct-horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn me_requires_token() {
    let app = app!(test_state());
    let alice = signup!(app, "alice");

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn malformed_id_is_bad_request() {
    let app = app!(test_state());
    let alice = signup!(app, "alice");

    let req = test::TestRequest::get()
        .uri("/api/users/not-a-uuid")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn friend_request_round_trip() {
    let app = app!(test_state());
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/friend-request/{}", bob.user.id))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // A second request for the same pair is refused.
    let req = test::TestRequest::post()
        .uri(&format!("/api/users/friend-request/{}", bob.user.id))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/users/friend-requests")
        .insert_header(bearer(&bob))
        .to_request();
    let pending: Vec<PendingRequestResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending.len(), 1);
    assert_eq!(
        pending[0].sender.as_ref().map(|s| s.id),
        Some(alice.user.id)
    );

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/friend-request/{}/accept", pending[0].id))
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Friend request accepted");

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", bob.user.id))
        .insert_header(bearer(&alice))
        .to_request();
    let profile: ProfileResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile.relationship, "friends");
    assert_eq!(profile.friends.len(), 1);
    assert_eq!(profile.friends[0].id, alice.user.id);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/friends/{}", bob.user.id))
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Friend removed");

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", alice.user.id))
        .insert_header(bearer(&bob))
        .to_request();
    let profile: ProfileResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile.relationship, "none");
}

#[actix_web::test]
async fn sender_cannot_accept_own_request() {
    let app = app!(test_state());
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/friend-request/{}", bob.user.id))
        .insert_header(bearer(&alice))
        .to_request();
    let request: Value = test::call_and_read_body_json(&app, req).await;
    let request_id = request["id"].as_str().unwrap_or_default().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/friend-request/{request_id}/accept"))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn friend_request_notification_can_be_read_by_recipient_only() {
    let app = app!(test_state());
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");

    let req = test::TestRequest::post()
        .uri(&format!("/api/users/friend-request/{}", bob.user.id))
        .insert_header(bearer(&alice))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .insert_header(bearer(&bob))
        .to_request();
    let notifications: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["type"], "friend_request");
    assert_eq!(notifications[0]["isRead"], false);
    assert_eq!(notifications[0]["relatedUser"]["username"], "alice");

    let id = notifications[0]["id"].as_str().unwrap_or_default().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{id}/read"))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{id}/read"))
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isRead"], true);

    let req = test::TestRequest::put()
        .uri(&format!("/api/notifications/{}/read", Uuid::new_v4()))
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn posts_likes_and_comments() {
    let app = app!(test_state());
    let alice = signup!(app, "alice");
    let bob = signup!(app, "bob");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({ "content": "hello", "privacy": "everyone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({ "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    let post_id = post["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(post["privacy"], "public");
    assert_eq!(post["content"]["text"], "hello");

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}/like"))
        .insert_header(bearer(&bob))
        .to_request();
    let likes: Vec<Uuid> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(likes, vec![bob.user.id]);

    let req = test::TestRequest::post()
        .uri(&format!("/api/comments/{post_id}"))
        .insert_header(bearer(&bob))
        .set_json(json!({ "content": "nice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/{post_id}"))
        .insert_header(bearer(&alice))
        .to_request();
    let comments: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "nice");

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .insert_header(bearer(&alice))
        .to_request();
    let notifications: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let mut kinds: Vec<&str> = notifications
        .iter()
        .filter_map(|n| n["type"].as_str())
        .collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["comment", "like"]);
}
