use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::api::middleware::CurrentUser;
use crate::api::response::ApiError;
use crate::auth::policy;
use crate::AppState;

use super::auth::{user_to_response, UserResponse};
use super::work::{log_to_response, WorkLogResponse};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// A work log joined with its owning user, for the admin report
#[derive(Debug, Serialize)]
pub struct AdminWorkLogResponse {
    #[serde(flatten)]
    pub log: WorkLogResponse,
    pub user: UserResponse,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn admin_users(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    policy::require_admin(&user)?;

    let users = state
        .db
        .list_users()
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list users");
            ApiError::internal("Internal server error")
        })?;

    Ok(Json(users.iter().map(user_to_response).collect()))
}

pub async fn admin_logs(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<AdminWorkLogResponse>>, ApiError> {
    policy::require_admin(&user)?;

    let joined = crate::ledger::list_all(&state.db)?;
    Ok(Json(
        joined
            .iter()
            .map(|(log, owner)| AdminWorkLogResponse {
                log: log_to_response(log),
                user: user_to_response(owner),
            })
            .collect(),
    ))
}
