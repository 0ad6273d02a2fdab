use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::require_auth;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes -- no token required
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register));

    // Protected routes -- bearer token resolved to a user on every request;
    // the admin routes additionally check the caller's role in the handler
    let protected_routes = Router::new()
        .route("/admin/logs", get(handlers::admin_logs))
        .route("/admin/users", get(handlers::admin_users))
        .route("/me", get(handlers::me))
        .route("/work/logs", get(handlers::list_logs))
        .route("/work/start", post(handlers::start_work))
        .route("/work/status", get(handlers::work_status))
        .route("/work/stop", post(handlers::stop_work))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
