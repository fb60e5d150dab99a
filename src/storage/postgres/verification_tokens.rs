//! PostgreSQL implementation of VerificationTokenStorage

use crate::errors::StorageError;
use crate::oauth::types::VerificationToken;
use crate::storage::traits::{Result, VerificationTokenStorage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

/// PostgreSQL implementation of verification token storage
pub struct PostgresVerificationTokenStorage {
    pool: PgPool,
}

impl PostgresVerificationTokenStorage {
    /// Create a new PostgreSQL verification token store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert PostgreSQL row to VerificationToken
    fn row_to_token(row: &PgRow) -> Result<VerificationToken> {
        Ok(VerificationToken {
            value: row
                .try_get("token")
                .map_err(|e| StorageError::DatabaseError(format!("Failed to get token: {}", e)))?,
            expires_at: row.try_get("expires_at").map_err(|e| {
                StorageError::DatabaseError(format!("Failed to get expires_at: {}", e))
            })?,
        })
    }
}

#[async_trait]
impl VerificationTokenStorage for PostgresVerificationTokenStorage {
    async fn insert_token(&self, token: &VerificationToken) -> Result<()> {
        sqlx::query("INSERT INTO verification_tokens (token, expires_at) VALUES ($1, $2)")
            .bind(&token.value)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StorageError::DuplicateKey
                }
                e => StorageError::DatabaseError(e.to_string()),
            })?;

        Ok(())
    }

    async fn take_token(&self, value: &str) -> Result<Option<VerificationToken>> {
        let row = sqlx::query(
            "DELETE FROM verification_tokens WHERE token = $1 RETURNING token, expires_at",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() as usize)
    }
}
