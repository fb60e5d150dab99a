//! PostgreSQL storage implementations
//!
//! PostgreSQL is suitable for deployments running several front end
//! instances against one token store.

mod verification_tokens;

use crate::errors::StorageError;
use sqlx::postgres::PgPool;

pub use verification_tokens::PostgresVerificationTokenStorage;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Run database migrations
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
    Ok(())
}
