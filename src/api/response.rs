use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::policy::Forbidden;
use crate::auth::AuthError;
use crate::ledger::LedgerError;

/// Json extractor whose rejections use the standard error body and map to
/// 400 rather than axum's default status codes.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Body shape of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

/// An HTTP-mapped error. Used as the error type in handler Result returns;
/// domain errors convert into it via the From impls below.
#[derive(Debug)]
pub struct ApiError {
    message: String,
    status: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::FORBIDDEN,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: self.message,
        });
        if self.status == StatusCode::UNAUTHORIZED {
            (self.status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

// ============================================================================
// Domain error mappings
// ============================================================================

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            // State-precondition failures, not missing resources
            LedgerError::AlreadyActive | LedgerError::NoActiveSession => {
                ApiError::bad_request(e.to_string())
            }
            LedgerError::Database(e) => {
                tracing::error!(error = %e, "Storage failure in ledger operation");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                ApiError::unauthorized(e.to_string())
            }
            AuthError::UsernameTaken => ApiError::bad_request(e.to_string()),
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Storage failure in auth operation");
                ApiError::internal("Internal server error")
            }
            AuthError::Password(e) => {
                tracing::error!(error = %e, "Password hashing failure");
                ApiError::internal("Internal server error")
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token signing failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<Forbidden> for ApiError {
    fn from(e: Forbidden) -> Self {
        ApiError::forbidden(e.to_string())
    }
}
