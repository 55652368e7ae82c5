//! # tgis-storage
//!
//! SQLite persistence layer for the temporal GIS metadata store.
//! One write connection plus a read pool (WAL mode), numbered migrations,
//! and raw SQL query modules used by `tgis-temporal`.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod pragmas;
pub mod queries;
pub mod schema;

pub use engine::StorageEngine;

/// Helper to convert a string message into a `TgisError::StorageError`.
pub fn to_storage_err(msg: String) -> tgis_core::TgisError {
    tgis_core::TgisError::StorageError(tgis_core::errors::StorageError::SqliteError {
        message: msg,
    })
}
