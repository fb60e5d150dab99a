//! In-memory verification token storage
//!
//! Tokens live in a single mutex-guarded map, so `take_token` is a plain
//! `HashMap::remove` under the lock.

use crate::errors::StorageError;
use crate::oauth::types::VerificationToken;
use crate::storage::traits::{Result, VerificationTokenStorage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

/// In-memory token store (for testing/development)
#[derive(Default)]
pub struct MemoryVerificationTokenStorage {
    tokens: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl MemoryVerificationTokenStorage {
    /// Create a new memory token storage
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>>> {
        self.tokens
            .lock()
            .map_err(|e| StorageError::LockFailed(e.to_string()))
    }
}

#[async_trait]
impl VerificationTokenStorage for MemoryVerificationTokenStorage {
    async fn insert_token(&self, token: &VerificationToken) -> Result<()> {
        match self.lock()?.entry(token.value.clone()) {
            Entry::Occupied(_) => Err(StorageError::DuplicateKey),
            Entry::Vacant(entry) => {
                entry.insert(token.expires_at);
                Ok(())
            }
        }
    }

    async fn take_token(&self, value: &str) -> Result<Option<VerificationToken>> {
        Ok(self
            .lock()?
            .remove_entry(value)
            .map(|(value, expires_at)| VerificationToken { value, expires_at }))
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut tokens = self.lock()?;
        let initial_count = tokens.len();
        tokens.retain(|_, expires_at| *expires_at >= now);
        Ok(initial_count - tokens.len())
    }
}
