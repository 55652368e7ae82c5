//! Configuration loading and the per-invocation command context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use tgis_core::models::DatasetId;
use tgis_core::TgisConfig;
use tgis_storage::StorageEngine;
use tgis_temporal::TemporalEngine;

use crate::error::CliError;

/// Overrides collected from command line flags and the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub gisdbase: Option<PathBuf>,
    pub location: Option<String>,
}

/// Load the TOML configuration file, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<TgisConfig, CliError> {
    let Some(path) = path else {
        return Ok(TgisConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|error| CliError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    TgisConfig::from_toml(&text)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
}

pub fn apply_overrides(config: &mut TgisConfig, overrides: &Overrides) {
    if let Some(gisdbase) = &overrides.gisdbase {
        config.storage.gisdbase = gisdbase.clone();
    }
    if let Some(location) = &overrides.location {
        config.storage.location = location.clone();
    }
}

/// Everything a command needs: the engine and the current mapset.
pub struct Context {
    pub engine: TemporalEngine,
    pub config: TgisConfig,
    pub mapset: String,
}

impl Context {
    /// Open the database named by `db`, or the configured location database.
    pub fn open(config: TgisConfig, db: Option<&Path>, mapset: String) -> Result<Self, CliError> {
        let storage = match db {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|error| CliError::Io {
                        path: parent.to_path_buf(),
                        error,
                    })?;
                }
                StorageEngine::open(
                    path,
                    config.storage.read_pool_size,
                    config.storage.busy_timeout_ms,
                )?
            }
            None => StorageEngine::from_config(&config.storage)?,
        };
        debug!(path = ?storage.path(), mapset = %mapset, "opened temporal database");
        let engine = TemporalEngine::new(Arc::new(storage), config.temporal.clone());
        Ok(Self {
            engine,
            config,
            mapset,
        })
    }

    /// `name@mapset` as given, or `name` qualified with the current mapset.
    pub fn qualify(&self, name: &str) -> Result<DatasetId, CliError> {
        let id = if name.contains('@') {
            DatasetId::parse(name)?
        } else {
            DatasetId::new(name, self.mapset.as_str())?
        };
        Ok(id)
    }

    pub fn creator(&self) -> String {
        self.engine.default_creator()
    }
}
