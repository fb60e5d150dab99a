//! Nijitter web front end binary.
//!
//! Loads configuration from the environment, wires storage, the static asset
//! server and the Slack sign-up gate together, and serves HTTP until Ctrl+C or
//! SIGTERM.

use anyhow::{Context, Result};
use nijitter::{
    assets::AssetServer,
    config::Config,
    http::{AppEngine, AppState, build_router},
    oauth::{OAuthStateGate, SlackCodeExchange, VerificationTokenStore},
    storage::{create_storage_backend, parse_storage_backend},
    templates::build_env,
};
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nijitter=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();

    let version = nijitter::config::version()?;

    env::args().for_each(|arg| {
        if arg == "--version" {
            println!("{version}");
            std::process::exit(0);
        }
    });

    tracing::info!(?version, "Starting nijitter");

    let config = Config::new()?;

    let http_client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(*config.http_client_timeout.as_ref())
        .build()?;

    // Setup template engine
    let template_env = AppEngine::from(build_env(
        config.http_templates_path.clone(),
        version.clone(),
    ));

    let storage_backend =
        parse_storage_backend(&config.storage_backend, config.database_url.as_deref())?;
    let token_storage = create_storage_backend(storage_backend)
        .await
        .context("storage backend creation failed")?;

    let tokens = VerificationTokenStore::new(token_storage);
    let purged = tokens.purge_expired().await?;
    tracing::info!(purged, "removed expired state tokens");

    let state_gate = OAuthStateGate::new(
        tokens,
        Arc::new(SlackCodeExchange::new(http_client, &config.slack)),
        config.slack.authorize_url.clone(),
        config.slack.team_id.clone(),
        *config.oauth_state_ttl.as_ref(),
    );

    let asset_server = AssetServer::new(
        config.http_static_path.clone(),
        *config.static_max_age.as_ref(),
    )
    .context("HTTP_STATIC_PATH cannot be made absolute")?;
    tracing::info!(static_path = ?asset_server.resolver().base(), "serving static assets");

    let app_context = AppState {
        template_env,
        asset_server: Arc::new(asset_server),
        state_gate: Arc::new(state_gate),
    };

    let app = build_router(app_context);

    // Setup graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    {
        let tracker = tracker.clone();
        let inner_token = token.clone();

        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::spawn(async move {
            tokio::select! {
                () = inner_token.cancelled() => { },
                _ = terminate => {},
                _ = ctrl_c => {},
            }

            tracker.close();
            inner_token.cancel();
        });
    }

    // Start HTTP server
    let http_port = *config.http_port.as_ref();
    let bind_address = format!("0.0.0.0:{http_port}");
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("Starting server on {bind_address}");

    {
        let inner_token = token.clone();
        tracker.spawn(async move {
            let shutdown_token = inner_token.clone();
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_token.cancelled().await;
                    tracing::info!("axum graceful shutdown complete");
                })
                .await;
            if let Err(err) = result {
                tracing::error!("axum task failed: {}", err);
            }

            inner_token.cancel();
        });
    }

    tracker.wait().await;

    Ok(())
}
