//! Handles GET /static/{*filepath} - Serves files from the static directory

use axum::{
    extract::{Path, Request, State},
    response::Response,
};
use std::sync::Arc;

use crate::assets::AssetServer;

/// The wildcard segment is passed through as decoded, traversal attempts
/// included; containment is the asset server's job.
pub async fn handle_static(
    State(asset_server): State<Arc<AssetServer>>,
    Path(filepath): Path<String>,
    request: Request,
) -> Response {
    asset_server.serve(&filepath, request).await
}
