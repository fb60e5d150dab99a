//! Handles the Slack sign-up handshake: GET /slack, GET /state and GET /signup

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_template::RenderHtml;
use minijinja::context;
use serde::Deserialize;
use std::sync::Arc;

use super::{
    context::AppEngine, handler_pages::error_page, utils_cookie::signup_cookie,
};
use crate::oauth::OAuthStateGate;

/// Query parameters Slack appends to the redirect back to /signup
#[derive(Debug, Deserialize)]
pub struct SignupQuery {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Handle GET /slack - Landing page with the "Sign in with Slack" link
pub async fn handle_slack(State(engine): State<AppEngine>) -> impl IntoResponse {
    RenderHtml("slack.html", engine, context! {})
}

/// Handle GET /state - Issues a state token and redirects to Slack
pub async fn handle_state(
    State(engine): State<AppEngine>,
    State(state_gate): State<Arc<OAuthStateGate>>,
) -> Response {
    match state_gate.begin_flow().await {
        Ok(redirect_url) => Redirect::to(redirect_url.as_str()).into_response(),
        Err(err) => {
            tracing::error!(error = ?err, "failed to begin slack sign-up");
            error_page(engine, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /signup - Slack redirects here after the user authorizes
pub async fn handle_signup(
    State(engine): State<AppEngine>,
    State(state_gate): State<Arc<OAuthStateGate>>,
    Query(query): Query<SignupQuery>,
) -> Response {
    if let Some(error) = query.error.as_deref() {
        tracing::info!(error, "slack authorization declined");
        return error_page(engine, StatusCode::FORBIDDEN);
    }

    let (Some(state), Some(code)) = (query.state.as_deref(), query.code.as_deref()) else {
        return error_page(engine, StatusCode::FORBIDDEN);
    };
    if state.is_empty() || code.is_empty() {
        return error_page(engine, StatusCode::FORBIDDEN);
    }

    let identity = match state_gate.complete_flow(state, code).await {
        Ok(identity) => identity,
        Err(err) if err.is_internal() => {
            tracing::error!(error = ?err, "slack sign-up failed");
            return error_page(engine, StatusCode::INTERNAL_SERVER_ERROR);
        }
        Err(err) => {
            tracing::info!(error = %err, "slack sign-up rejected");
            return error_page(engine, StatusCode::FORBIDDEN);
        }
    };

    tracing::info!(user_id = %identity.user_id, "slack sign-up verified");

    let Some(cookie) = signup_cookie("slack_verified", "1") else {
        return error_page(engine, StatusCode::INTERNAL_SERVER_ERROR);
    };
    (
        [(header::SET_COOKIE, cookie)],
        RenderHtml("signup.html", engine, context! {}),
    )
        .into_response()
}
