//! Static asset dispatch: classify, contain, then hand the file to `ServeFile`.

use axum::{
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
};
use std::{path::PathBuf, time::Duration};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::{AssetClass, PathResolver};
use crate::errors::AssetError;

/// Serves files from a single static directory.
#[derive(Clone, Debug)]
pub struct AssetServer {
    resolver: PathResolver,
    max_age: Duration,
}

impl AssetServer {
    /// Create a server for `static_dir`. Cacheable assets get `max_age`.
    ///
    /// The directory is resolved through the filesystem once when it exists,
    /// so a symlinked static root is compared in its real location.
    pub fn new(static_dir: impl Into<PathBuf>, max_age: Duration) -> Option<Self> {
        let static_dir = static_dir.into();
        let base = std::fs::canonicalize(&static_dir).unwrap_or(static_dir);
        Some(Self {
            resolver: PathResolver::new(base)?,
            max_age,
        })
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Map a requested path to the file that would be served for it.
    pub async fn locate(&self, requested_path: &str) -> Result<PathBuf, AssetError> {
        let path = self
            .resolver
            .resolve(requested_path)
            .ok_or(AssetError::PathRejected)?;

        // Symlinks may point anywhere; containment must hold for the target.
        let canonical = tokio::fs::canonicalize(&path)
            .await
            .map_err(|_| AssetError::AssetNotFound)?;
        if !self.resolver.contains(&canonical) {
            return Err(AssetError::PathRejected);
        }

        match tokio::fs::metadata(&canonical).await {
            Ok(metadata) if metadata.is_file() => Ok(canonical),
            _ => Err(AssetError::AssetNotFound),
        }
    }

    /// Serve `requested_path` for `request`.
    ///
    /// Lexically rejected paths produce an empty 400 without touching the
    /// filesystem, as do symlinks whose target leaves the base; anything that is not a regular file is an empty 404. Only the method
    /// and URI of `request` reach the file service, so range and conditional
    /// headers are ignored and every hit is a full 200.
    pub async fn serve(&self, requested_path: &str, request: Request) -> Response {
        let policy = AssetClass::from_path(requested_path).cache_policy(self.max_age);

        let path = match self.locate(requested_path).await {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(error = %err, "static asset not served");
                return err.into_response();
            }
        };

        let mut bare = Request::new(Body::empty());
        *bare.method_mut() = request.method().clone();
        *bare.uri_mut() = request.uri().clone();

        let mut response = match ServeFile::new(&path).oneshot(bare).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        };
        policy.apply(response.headers_mut());
        response
    }
}
