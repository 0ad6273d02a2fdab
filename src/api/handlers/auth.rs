use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::CurrentUser;
use crate::api::response::{ApiError, AppJson};
use crate::auth;
use crate::storage::models::{Role, User};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Public view of a user; the password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub created_at: String,
    pub id: String,
    pub role: Role,
    pub username: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::bad_request("username is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }

    let user = auth::register(&state.db, &req.username, &req.password)?;
    Ok(Json(user_to_response(&user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = auth::login(
        &state.db,
        &state.config.auth.token_secret,
        state.config.auth.token_ttl_seconds,
        &req.username,
        &req.password,
    )?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(user_to_response(&user))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn user_to_response(user: &User) -> UserResponse {
    UserResponse {
        created_at: user.created_at.to_rfc3339(),
        id: user.id.clone(),
        role: user.role,
        username: user.username.clone(),
    }
}
