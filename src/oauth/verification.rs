//! Single-use, time-boxed verification tokens.
//!
//! `issue` persists a fresh random token with an expiry. `consume` removes
//! the token and reports whether it was valid; the removal happens for
//! every outcome, so a value can be checked at most once.

use chrono::{Duration, Utc};
use std::sync::Arc;

use super::types::{ConsumeOutcome, VerificationToken, generate_token};
use crate::errors::StorageError;
use crate::storage::traits::VerificationTokenStorage;

/// Issues and consumes verification tokens against injected storage.
#[derive(Clone)]
pub struct VerificationTokenStore {
    storage: Arc<dyn VerificationTokenStorage>,
}

impl VerificationTokenStore {
    pub fn new(storage: Arc<dyn VerificationTokenStorage>) -> Self {
        Self { storage }
    }

    /// Generate and persist a token valid for `ttl`, returning its value.
    ///
    /// A collision with a live token surfaces as `StorageError::DuplicateKey`.
    pub async fn issue(&self, ttl: Duration) -> Result<String, StorageError> {
        let token = VerificationToken {
            value: generate_token(),
            expires_at: Utc::now() + ttl,
        };
        self.storage.insert_token(&token).await?;
        Ok(token.value)
    }

    /// Remove `value` from storage and classify it.
    pub async fn consume(&self, value: &str) -> Result<ConsumeOutcome, StorageError> {
        let outcome = match self.storage.take_token(value).await? {
            None => ConsumeOutcome::NotFound,
            Some(token) if token.is_expired_at(Utc::now()) => ConsumeOutcome::Expired,
            Some(_) => ConsumeOutcome::Valid,
        };
        Ok(outcome)
    }

    /// Delete tokens whose expiry has already passed.
    pub async fn purge_expired(&self) -> Result<usize, StorageError> {
        self.storage.delete_expired_tokens(Utc::now()).await
    }
}
