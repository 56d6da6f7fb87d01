//! # Storage Repository
//!
//! String key/value access to the `local_storage` table.
//!
//! Values are opaque here; [`super::collection`] gives them meaning.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Repository over the raw key/value table.
#[derive(Debug, Clone)]
pub struct StorageRepository {
    pool: SqlitePool,
}

impl StorageRepository {
    /// Creates a new StorageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StorageRepository { pool }
    }

    /// Value stored under `key`, if any.
    pub async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        read_value(&self.pool, key).await
    }

    /// Stores `value` under `key`, replacing what was there.
    pub async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        write_value(&self.pool, key, value).await
    }

    /// Removes `key`. Returns whether it existed.
    pub async fn remove_item(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing storage key");

        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes every key. Returns how many were removed.
    pub async fn clear(&self) -> DbResult<u64> {
        debug!("Clearing local storage");

        let result = sqlx::query("DELETE FROM local_storage")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Stored keys, alphabetical.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

// =============================================================================
// Executor-Level Helpers
// =============================================================================
//
// Shared by the repositories so a read-modify-write can run inside one
// transaction (`&mut *tx`) or straight on the pool.

pub(crate) async fn read_value<'e, E>(executor: E, key: &str) -> DbResult<Option<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let value: Option<String> =
        sqlx::query_scalar("SELECT value FROM local_storage WHERE key = ?1")
            .bind(key)
            .fetch_optional(executor)
            .await?;

    Ok(value)
}

pub(crate) async fn write_value<'e, E>(executor: E, key: &str, value: &str) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(key = %key, bytes = value.len(), "Writing storage key");

    sqlx::query(
        r#"
        INSERT INTO local_storage (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now().to_rfc3339())
    .execute(executor)
    .await?;

    Ok(())
}
