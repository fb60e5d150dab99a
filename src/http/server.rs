//! Main router configuration assembling the page, sign-up and static routes.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    context::AppState,
    handler_pages::{handle_error, handle_index, handle_login, handle_success, handle_verify},
    handler_slack::{handle_signup, handle_slack, handle_state},
    handler_static::handle_static,
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/login", get(handle_login))
        .route("/error", get(handle_error))
        .route("/success", get(handle_success))
        .route("/verify", get(handle_verify))
        .route("/slack", get(handle_slack))
        .route("/state", get(handle_state))
        .route("/signup", get(handle_signup))
        .route("/static/{*filepath}", get(handle_static))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
