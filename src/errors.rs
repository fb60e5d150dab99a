//! Standardized error types following the `error-nijitter-<domain>-<number>` format.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("error-nijitter-config-1 {0} must be set")]
    EnvVarRequired(String),

    /// Error when PORT cannot be parsed
    #[error("error-nijitter-config-2 Parsing PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-nijitter-config-3 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when duration string cannot be parsed
    #[error("error-nijitter-config-4 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when a configured URL cannot be parsed
    #[error("error-nijitter-config-5 Failed to parse URL '{0}': {1}")]
    UrlParsingFailed(String, url::ParseError),
}

/// Static asset errors.
///
/// Neither variant carries the requested path so that rejections never
/// describe the server layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    /// Traversal attempt or malformed path
    #[error("error-nijitter-asset-1 Path rejected")]
    PathRejected,

    /// Path resolved safely but no regular file exists there
    #[error("error-nijitter-asset-2 Asset not found")]
    AssetNotFound,
}

impl AssetError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AssetError::PathRejected => StatusCode::BAD_REQUEST,
            AssetError::AssetNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}

/// Slack sign-up flow errors
#[derive(Debug, Error)]
pub enum FlowError {
    /// The state token was never issued or was already consumed
    #[error("error-nijitter-flow-1 State token not found")]
    TokenNotFound,

    /// The state token existed but its expiry had passed
    #[error("error-nijitter-flow-2 State token expired")]
    TokenExpired,

    /// The code exchange succeeded for a workspace other than the configured one
    #[error("error-nijitter-flow-3 Team mismatch")]
    TenantMismatch,

    /// The code exchange itself failed
    #[error("error-nijitter-flow-4 Code exchange failed: {0}")]
    ExchangeFailed(#[from] ExchangeError),

    /// The token store could not be reached or returned an error
    #[error("error-nijitter-flow-5 Storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl FlowError {
    /// Whether the failure is on our side rather than a rejected handshake.
    pub fn is_internal(&self) -> bool {
        matches!(self, FlowError::Storage(_))
    }
}

/// Errors returned by the identity provider code exchange
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Error when the HTTP request to the provider fails
    #[error("error-nijitter-exchange-1 Request failed: {0}")]
    RequestFailed(String),

    /// Error when the provider response cannot be decoded
    #[error("error-nijitter-exchange-2 Malformed response: {0}")]
    MalformedResponse(String),

    /// Error reported by the provider
    #[error("error-nijitter-exchange-3 Provider rejected exchange: {0}")]
    ProviderRejected(String),
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-nijitter-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when database operation fails
    #[error("error-nijitter-storage-2 Database error: {0}")]
    DatabaseError(String),

    /// Error when a row with the same key already exists
    #[error("error-nijitter-storage-3 Duplicate key")]
    DuplicateKey,

    /// Error when data validation fails
    #[error("error-nijitter-storage-4 Invalid data: {0}")]
    InvalidData(String),

    /// Error when a storage lock is poisoned
    #[error("error-nijitter-storage-5 Lock error: {0}")]
    LockFailed(String),
}
