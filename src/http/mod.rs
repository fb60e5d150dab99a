//! Axum HTTP server handlers for pages, the Slack sign-up flow and static assets.

pub mod context;
mod handler_pages;
mod handler_slack;
mod handler_static;
pub mod server;
mod utils_cookie;

pub use context::{AppEngine, AppState};
pub use server::build_router;
