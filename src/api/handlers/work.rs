use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::middleware::CurrentUser;
use crate::api::response::{ApiError, AppJson};
use crate::ledger::{self, WorkStatus};
use crate::storage::models::WorkLog;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StopWorkRequest {
    pub pop_description: String,
    pub push_command: String,
}

#[derive(Debug, Serialize)]
pub struct WorkLogResponse {
    pub duration_minutes: Option<i64>,
    pub id: String,
    pub login_time: String,
    pub logout_time: Option<String>,
    pub pop_description: Option<String>,
    pub push_command: Option<String>,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WorkStatusResponse {
    Active { start_time: String },
    Inactive,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn start_work(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<WorkLogResponse>, ApiError> {
    let log = ledger::start(&state.db, &user)?;
    Ok(Json(log_to_response(&log)))
}

pub async fn stop_work(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(req): AppJson<StopWorkRequest>,
) -> Result<Json<WorkLogResponse>, ApiError> {
    if req.pop_description.trim().is_empty() {
        return Err(ApiError::bad_request("pop_description is required"));
    }
    if req.push_command.trim().is_empty() {
        return Err(ApiError::bad_request("push_command is required"));
    }

    let log = ledger::stop(&state.db, &user, req.pop_description, req.push_command)?;
    Ok(Json(log_to_response(&log)))
}

pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<WorkLogResponse>>, ApiError> {
    let logs = ledger::list(&state.db, &user)?;
    Ok(Json(logs.iter().map(log_to_response).collect()))
}

pub async fn work_status(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<WorkStatusResponse>, ApiError> {
    let status = match ledger::status(&state.db, &user)? {
        WorkStatus::Active { start_time } => WorkStatusResponse::Active {
            start_time: start_time.to_rfc3339(),
        },
        WorkStatus::Inactive => WorkStatusResponse::Inactive,
    };
    Ok(Json(status))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn log_to_response(log: &WorkLog) -> WorkLogResponse {
    WorkLogResponse {
        duration_minutes: log.duration_minutes,
        id: log.id.clone(),
        login_time: log.login_time.to_rfc3339(),
        logout_time: log.logout_time.map(|t| t.to_rfc3339()),
        pop_description: log.pop_description.clone(),
        push_command: log.push_command.clone(),
        user_id: log.user_id.clone(),
    }
}
