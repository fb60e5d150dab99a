//! Application state shared by every handler.

use axum::extract::FromRef;
use axum_template::engine::Engine;
use std::sync::Arc;

use crate::{assets::AssetServer, oauth::OAuthStateGate};

#[cfg(feature = "reload")]
use minijinja_autoreload::AutoReloader;

#[cfg(feature = "reload")]
/// Template engine with auto-reloading support for development.
pub type AppEngine = Engine<AutoReloader>;

#[cfg(feature = "embed")]
use minijinja::Environment;

#[cfg(feature = "embed")]
pub type AppEngine = Engine<Environment<'static>>;

#[derive(Clone)]
pub struct AppState {
    /// Template engine for rendering HTML responses.
    pub template_env: AppEngine,
    /// Serves everything under `/static`
    pub asset_server: Arc<AssetServer>,
    /// Slack sign-up handshake
    pub state_gate: Arc<OAuthStateGate>,
}

impl FromRef<AppState> for AppEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.template_env.clone()
    }
}

impl FromRef<AppState> for Arc<AssetServer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.asset_server.clone()
    }
}

impl FromRef<AppState> for Arc<OAuthStateGate> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.state_gate.clone()
    }
}
