//! Handles the static HTML pages: /, /login, /error, /success and /verify

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_template::RenderHtml;
use minijinja::context;
use serde::Deserialize;

use super::{context::AppEngine, utils_cookie::signup_cookie};

/// Render the generic failure page. Never pass reason codes or token values.
pub(crate) fn error_page(engine: AppEngine, status: StatusCode) -> Response {
    (status, RenderHtml("error.html", engine, context! {})).into_response()
}

/// Handle requests to the timeline page
pub async fn handle_index(State(engine): State<AppEngine>) -> impl IntoResponse {
    RenderHtml("timeline.html", engine, context! {})
}

/// Handle requests to the login form
pub async fn handle_login(State(engine): State<AppEngine>) -> impl IntoResponse {
    RenderHtml("login.html", engine, context! {})
}

pub async fn handle_error(State(engine): State<AppEngine>) -> Response {
    error_page(engine, StatusCode::OK)
}

pub async fn handle_success(State(engine): State<AppEngine>) -> impl IntoResponse {
    RenderHtml("success.html", engine, context! {})
}

/// Query parameters for the e-mail verification landing page
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

/// Handle GET /verify - Hands the e-mail verification token to the browser as
/// an HTTP-only cookie; the page script completes verification.
pub async fn handle_verify(
    State(engine): State<AppEngine>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let Some(cookie) = query
        .token
        .as_deref()
        .and_then(|token| signup_cookie("email_verification_token", token))
    else {
        return error_page(engine, StatusCode::BAD_REQUEST);
    };

    (
        [(header::SET_COOKIE, cookie)],
        RenderHtml("verify.html", engine, context! {}),
    )
        .into_response()
}
