//! # Database State
//!
//! Wraps the `Database` connection together with the file it was opened
//! from.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! let db_state = DbState::open(get_database_path(None)?).await?;
//! let view = commands::product::list_products(db_state.inner(), None, 5).await?;
//! ```

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ApiError;
use applemar_db::{Database, DbConfig};

/// Open local store plus its location.
#[derive(Debug)]
pub struct DbState {
    db: Database,
    path: PathBuf,
}

impl DbState {
    /// Connects to the store at `path`, creating it and applying migrations
    /// if needed.
    pub async fn open(path: PathBuf) -> Result<Self, ApiError> {
        let db = Database::new(DbConfig::new(&path)).await?;
        info!(path = %path.display(), "Local store ready");
        Ok(DbState { db, path })
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the pool so WAL contents are checkpointed before exit.
    pub async fn close(self) {
        self.db.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applemar.db");

        let state = DbState::open(path.clone()).await.unwrap();
        assert!(state.inner().health_check().await);
        assert_eq!(state.path(), path.as_path());
        state.close().await;

        assert!(path.exists());
    }
}
