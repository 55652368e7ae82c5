//! Storage subsystem configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the temporal database lives and how connections are opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// GIS database directory holding the locations.
    pub gisdbase: PathBuf,
    /// Location directory name below `gisdbase`.
    pub location: String,
    pub db_file_name: String,
    /// Read-only connections opened next to the writer (file-backed only).
    pub read_pool_size: usize,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            gisdbase: PathBuf::from("."),
            location: String::from("default"),
            db_file_name: String::from("tgis.db"),
            read_pool_size: 2,
            busy_timeout_ms: 5000,
        }
    }
}

impl StorageConfig {
    /// `<gisdbase>/<location>/<db_file_name>`
    pub fn database_path(&self) -> PathBuf {
        self.gisdbase.join(&self.location).join(&self.db_file_name)
    }
}
