//! Storage trait definitions for verification tokens.
//!
//! Implementations must make `take_token` atomic: for any value, at most one
//! concurrent caller receives the row.

use crate::errors::StorageError;
use crate::oauth::types::VerificationToken;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for storing and consuming single-use verification tokens
#[async_trait]
pub trait VerificationTokenStorage: Send + Sync {
    /// Store a new token. An existing row with the same value is a
    /// `StorageError::DuplicateKey`, never overwritten.
    async fn insert_token(&self, token: &VerificationToken) -> Result<()>;

    /// Remove a token and return it, in one atomic step
    async fn take_token(&self, value: &str) -> Result<Option<VerificationToken>>;

    /// Delete every token that expired before `now`
    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize>;
}
