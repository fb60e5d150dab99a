//! SQLite implementation of VerificationTokenStorage

use crate::errors::StorageError;
use crate::oauth::types::VerificationToken;
use crate::storage::traits::{Result, VerificationTokenStorage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqlitePool;

/// SQLite implementation of verification token storage
pub struct SqliteVerificationTokenStorage {
    pool: SqlitePool,
}

impl SqliteVerificationTokenStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationTokenStorage for SqliteVerificationTokenStorage {
    async fn insert_token(&self, token: &VerificationToken) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (token, expires_at)
            VALUES (?, ?)
            "#,
        )
        .bind(&token.value)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::DuplicateKey,
            e => StorageError::DatabaseError(format!("Failed to store token: {}", e)),
        })?;

        Ok(())
    }

    async fn take_token(&self, value: &str) -> Result<Option<VerificationToken>> {
        // A single DELETE ... RETURNING statement so concurrent takes of the
        // same value cannot both see the row.
        let row = sqlx::query(
            r#"
            DELETE FROM verification_tokens
            WHERE token = ?
            RETURNING token, expires_at
            "#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::DatabaseError(format!("Failed to take token: {}", e)))?;

        row.map(|row| {
            Ok(VerificationToken {
                value: row
                    .try_get("token")
                    .map_err(|e| StorageError::InvalidData(format!("token: {}", e)))?,
                expires_at: row
                    .try_get::<DateTime<Utc>, _>("expires_at")
                    .map_err(|e| StorageError::InvalidData(format!("expires_at: {}", e)))?,
            })
        })
        .transpose()
    }

    async fn delete_expired_tokens(&self, now: DateTime<Utc>) -> Result<usize> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                StorageError::DatabaseError(format!("Failed to cleanup expired tokens: {}", e))
            })?;

        Ok(result.rows_affected() as usize)
    }
}
