//! SQLite storage implementations
//!
//! SQLite is suitable for single-instance deployments and development.

mod verification_tokens;

use crate::errors::StorageError;
use sqlx::sqlite::SqlitePool;

pub use verification_tokens::SqliteVerificationTokenStorage;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Run database migrations
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
    Ok(())
}
