//! Bearer-token authentication middleware
//!
//! Applied to every protected route. Resolves the Authorization header to a
//! full user record on each request; authorization state is read from the
//! store every time, never cached across requests.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::auth;
use crate::storage::models::User;
use crate::AppState;

/// The authenticated caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Reject the request unless it carries a valid bearer token whose subject
/// resolves to an existing user.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let bearer = match bearer {
        Some(bearer) => bearer,
        None => return ApiError::unauthorized("Could not validate credentials").into_response(),
    };

    match auth::authenticate(&state.db, &state.config.auth.token_secret, bearer) {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
