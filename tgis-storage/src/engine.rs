//! StorageEngine: owns the connection pool and runs migrations on open.
//!
//! All reads go through `with_reader()`, all writes through `with_writer()`
//! or `with_transaction()`.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use tgis_core::config::StorageConfig;
use tgis_core::errors::TgisResult;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::to_storage_err;

/// SQLite backed storage for the temporal database.
pub struct StorageEngine {
    pool: ConnectionPool,
    path: Option<PathBuf>,
}

impl StorageEngine {
    /// Open a file-backed storage engine at the given path.
    /// Runs pending migrations before any reader is used.
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u64) -> TgisResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size, busy_timeout_ms)?;
        pool.with_writer(migrations::run_migrations)?;
        info!(path = %path.display(), readers = pool.reader_count(), "opened temporal database");
        Ok(Self {
            pool,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the database at `<gisdbase>/<location>/<db_file_name>`, creating
    /// the location directory if needed.
    pub fn from_config(config: &StorageConfig) -> TgisResult<Self> {
        let path = config.database_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| to_storage_err(format!("create {}: {e}", parent.display())))?;
        }
        Self::open(&path, config.read_pool_size, config.busy_timeout_ms)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> TgisResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        pool.with_writer(migrations::run_migrations)?;
        Ok(Self { pool, path: None })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn with_reader<F, T>(&self, f: F) -> TgisResult<T>
    where
        F: FnOnce(&Connection) -> TgisResult<T>,
    {
        self.pool.with_reader(f)
    }

    pub fn with_writer<F, T>(&self, f: F) -> TgisResult<T>
    where
        F: FnOnce(&Connection) -> TgisResult<T>,
    {
        self.pool.with_writer(f)
    }

    /// Run `f` on the writer inside one transaction. Commits on `Ok`,
    /// rolls back on `Err`.
    pub fn with_transaction<F, T>(&self, f: F) -> TgisResult<T>
    where
        F: FnOnce(&Connection) -> TgisResult<T>,
    {
        self.pool.with_writer(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(format!("begin transaction: {e}")))?;
            let value = f(&tx)?;
            tx.commit()
                .map_err(|e| to_storage_err(format!("commit: {e}")))?;
            Ok(value)
        })
    }

    pub fn schema_version(&self) -> TgisResult<u32> {
        self.with_reader(migrations::current_version)
    }
}
