//! Helpers for integration tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use warehouse_products::db::{DbPool, establish_connection_pool, run_pending_migrations};

/// Temporary database used in integration tests.
pub struct TestDb {
    path: PathBuf,
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let path = dir.path().join(filename);
        let url = path.to_str().expect("Temporary path is not valid UTF-8.");

        let pool = establish_connection_pool(url).expect("Failed to establish SQLite connection.");
        run_pending_migrations(&pool).expect("Migrations failed");

        TestDb {
            path,
            pool,
            _dir: dir,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
