//! Authentication handlers.

use actix_web::{HttpResponse, web};

use orbit_core::domain::{User, normalize_email};
use orbit_core::error::RepoError;
use orbit_core::ports::AuthError;
use orbit_shared::dto::{AuthResponse, LoginRequest, MeResponse, RegisterUserRequest};

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.email)?;

    Ok(AuthResponse {
        user: present::user(user),
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("Please add all fields".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let email = normalize_email(&req.email);
    let taken = state.users.find_by_email(&email).await?.is_some()
        || state
            .users
            .find_by_username(req.username.trim())
            .await?
            .is_some();
    if taken {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = User::new(&req.username, &email, password_hash, req.avatar)?;

    // A concurrent registration can still win the unique index.
    let user = state.users.create(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => AppError::BadRequest("User already exists".to_string()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(auth_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::debug!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(auth_response(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(MeResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}
