//! TemporalEngine: central orchestrator implementing ITemporalDatabase.

use std::sync::Arc;

use chrono::Local;
use tracing::info;

use tgis_core::config::TemporalConfig;
use tgis_core::errors::{TgisError, TgisResult};
use tgis_core::models::{
    DatasetId, DatasetType, MapDataset, MapType, SpaceTimeDataset, StdsType, TemporalExtent,
    TimeAssignment, TimelineEntry,
};
use tgis_core::traits::ITemporalDatabase;
use tgis_storage::queries::{base_ops, map_crud, stds_crud};
use tgis_storage::StorageEngine;

use crate::granularity::normalize_unit;
use crate::registration;
use crate::topology::with_gaps;
use crate::validation;

/// The temporal database engine.
///
/// Reads go through the storage read pool; every write runs in a single
/// transaction on the writer.
pub struct TemporalEngine {
    pub(crate) storage: Arc<StorageEngine>,
    pub(crate) config: TemporalConfig,
}

impl TemporalEngine {
    pub fn new(storage: Arc<StorageEngine>, config: TemporalConfig) -> Self {
        Self { storage, config }
    }

    /// Engine over a fresh in-memory database with default configuration.
    pub fn open_in_memory() -> TgisResult<Self> {
        Ok(Self::new(
            Arc::new(StorageEngine::open_in_memory()?),
            TemporalConfig::default(),
        ))
    }

    pub fn storage(&self) -> &StorageEngine {
        &self.storage
    }

    pub fn config(&self) -> &TemporalConfig {
        &self.config
    }

    /// Creator recorded on new datasets: the configured default, else the
    /// login name from the environment.
    pub fn default_creator(&self) -> String {
        self.config
            .default_creator
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Drop empty register tables and clear their owners' pointers.
    pub fn drop_empty_register_tables(&self) -> TgisResult<Vec<String>> {
        self.storage
            .with_transaction(registration::drop_empty_register_tables)
    }

    /// Number of register tables in the catalogue.
    pub fn register_table_count(&self) -> TgisResult<usize> {
        self.storage.with_reader(|conn| {
            Ok(tgis_storage::queries::register_ops::list_register_tables(conn)?.len())
        })
    }
}

/// Store relative units in plural form so equal units compare equal.
fn normalized(map: &MapDataset) -> TgisResult<MapDataset> {
    let mut map = map.clone();
    if let TemporalExtent::Relative(t) = &mut map.temporal {
        t.unit = normalize_unit(&t.unit)?.to_string();
    }
    Ok(map)
}

fn normalized_stds(stds: &SpaceTimeDataset) -> TgisResult<SpaceTimeDataset> {
    let mut stds = stds.clone();
    if let Some(unit) = &stds.relative_unit {
        stds.relative_unit = Some(normalize_unit(unit)?.to_string());
    }
    Ok(stds)
}

impl ITemporalDatabase for TemporalEngine {
    // ─── Maps ───────────────────────────────────────────────────────────────

    fn insert_map(&self, map: &MapDataset) -> TgisResult<()> {
        validation::validate_map(map)?;
        let mut map = normalized(map)?;
        map.stds_register = None;
        self.storage.with_transaction(|conn| {
            if base_ops::exists(conn, DatasetType::Map(map.map_type), map.id())? {
                return Err(TgisError::DatasetExists {
                    id: map.id().to_string(),
                });
            }
            map_crud::insert_map(conn, &map)
        })?;
        info!(map = %map.id(), kind = %map.map_type, "inserted map");
        Ok(())
    }

    fn select_map(&self, map_type: MapType, id: &DatasetId) -> TgisResult<Option<MapDataset>> {
        self.storage
            .with_reader(|conn| map_crud::select_map(conn, map_type, id))
    }

    fn update_map(&self, map: &MapDataset) -> TgisResult<MapDataset> {
        validation::validate_map(map)?;
        let mut map = normalized(map)?;
        let refresh = self.config.refresh_on_register;
        self.storage.with_transaction(|conn| {
            let existing = map_crud::select_map(conn, map.map_type, map.id())?.ok_or_else(|| {
                TgisError::DatasetNotFound {
                    id: map.id().to_string(),
                }
            })?;
            validation::validate_temporal_type_immutability(
                existing.temporal_type(),
                map.temporal_type(),
            )?;

            map.base.creation_time = existing.base.creation_time;
            map.base.modification_time = Local::now().naive_local();
            map.base.revision = existing.base.revision + 1;
            map.stds_register = existing.stds_register;
            registration::check_unit_in_datasets(conn, &map)?;
            map_crud::update_map(conn, &map)?;

            if refresh {
                let stds_type = map.map_type.stds_type();
                for stds_id in registration::registered_datasets(conn, map.map_type, map.id())? {
                    registration::refresh_derived(conn, stds_type, &stds_id)?;
                }
            }
            Ok(map)
        })
    }

    fn delete_map(&self, map_type: MapType, id: &DatasetId) -> TgisResult<bool> {
        let refresh = self.config.refresh_on_register;
        self.storage
            .with_transaction(|conn| registration::delete_map(conn, map_type, id, refresh))
    }

    fn is_map_in_db(&self, map_type: MapType, id: &DatasetId) -> TgisResult<bool> {
        self.storage
            .with_reader(|conn| base_ops::exists(conn, DatasetType::Map(map_type), id))
    }

    fn list_maps(&self, map_type: MapType, mapset: Option<&str>) -> TgisResult<Vec<DatasetId>> {
        self.storage
            .with_reader(|conn| base_ops::list_ids(conn, DatasetType::Map(map_type), mapset))
    }

    // ─── Space-time datasets ────────────────────────────────────────────────

    fn insert_stds(&self, stds: &SpaceTimeDataset) -> TgisResult<()> {
        validation::validate_stds(stds)?;
        let mut stds = normalized_stds(stds)?;
        stds.map_register = None;
        self.storage.with_transaction(|conn| {
            if base_ops::exists(conn, DatasetType::Stds(stds.stds_type), stds.id())? {
                return Err(TgisError::DatasetExists {
                    id: stds.id().to_string(),
                });
            }
            stds_crud::insert_stds(conn, &stds)
        })?;
        info!(stds = %stds.id(), kind = %stds.stds_type, "inserted space-time dataset");
        Ok(())
    }

    fn select_stds(
        &self,
        stds_type: StdsType,
        id: &DatasetId,
    ) -> TgisResult<Option<SpaceTimeDataset>> {
        self.storage
            .with_reader(|conn| stds_crud::select_stds(conn, stds_type, id))
    }

    fn update_stds(&self, stds: &SpaceTimeDataset) -> TgisResult<SpaceTimeDataset> {
        validation::validate_stds(stds)?;
        let mut stds = stds.clone();
        self.storage.with_transaction(|conn| {
            let existing = stds_crud::select_stds(conn, stds.stds_type, stds.id())?
                .ok_or_else(|| TgisError::DatasetNotFound {
                    id: stds.id().to_string(),
                })?;
            validation::validate_temporal_type_immutability(
                existing.temporal_type,
                stds.temporal_type,
            )?;

            stds.base.creation_time = existing.base.creation_time;
            stds.base.modification_time = Local::now().naive_local();
            stds.base.revision = existing.base.revision + 1;
            stds.map_register = existing.map_register;
            stds.relative_unit = existing.relative_unit;
            stds_crud::update_stds(conn, &stds)?;
            stds_crud::select_stds(conn, stds.stds_type, stds.id())?.ok_or_else(|| {
                TgisError::DatasetNotFound {
                    id: stds.id().to_string(),
                }
            })
        })
    }

    fn delete_stds(&self, stds_type: StdsType, id: &DatasetId) -> TgisResult<bool> {
        self.storage
            .with_transaction(|conn| registration::delete_stds(conn, stds_type, id))
    }

    fn is_stds_in_db(&self, stds_type: StdsType, id: &DatasetId) -> TgisResult<bool> {
        self.storage
            .with_reader(|conn| base_ops::exists(conn, DatasetType::Stds(stds_type), id))
    }

    fn list_stds(&self, stds_type: StdsType, mapset: Option<&str>) -> TgisResult<Vec<DatasetId>> {
        self.storage
            .with_reader(|conn| base_ops::list_ids(conn, DatasetType::Stds(stds_type), mapset))
    }

    // ─── Registration ───────────────────────────────────────────────────────

    fn register_map(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        map_id: &DatasetId,
    ) -> TgisResult<()> {
        let refresh = self.config.refresh_on_register;
        self.storage.with_transaction(|conn| {
            registration::register_map(conn, stds_type, stds_id, map_id, refresh)
        })
    }

    fn unregister_map(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        map_id: &DatasetId,
    ) -> TgisResult<()> {
        let refresh = self.config.refresh_on_register;
        self.storage.with_transaction(|conn| {
            registration::unregister_map(conn, stds_type, stds_id, map_id, refresh)
        })
    }

    fn register_maps(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        map_ids: &[DatasetId],
        assignment: Option<&TimeAssignment>,
    ) -> TgisResult<usize> {
        let refresh = self.config.refresh_on_register;
        self.storage.with_transaction(|conn| {
            registration::register_maps(conn, stds_type, stds_id, map_ids, assignment, refresh)
        })
    }

    fn registered_maps(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
    ) -> TgisResult<Vec<MapDataset>> {
        self.storage
            .with_reader(|conn| registration::registered_maps(conn, stds_type, stds_id))
    }

    fn registered_datasets(
        &self,
        map_type: MapType,
        map_id: &DatasetId,
    ) -> TgisResult<Vec<DatasetId>> {
        self.storage
            .with_reader(|conn| registration::registered_datasets(conn, map_type, map_id))
    }

    fn refresh_derived(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
    ) -> TgisResult<SpaceTimeDataset> {
        self.storage
            .with_transaction(|conn| registration::refresh_derived(conn, stds_type, stds_id))
    }

    fn registered_maps_with_gaps(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
    ) -> TgisResult<Vec<TimelineEntry>> {
        let maps = self.registered_maps(stds_type, stds_id)?;
        Ok(with_gaps(maps))
    }

    // ─── Timeline edits ─────────────────────────────────────────────────────

    fn shift_stds(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        granularity: &str,
    ) -> TgisResult<SpaceTimeDataset> {
        self.storage.with_transaction(|conn| {
            registration::shift_stds(conn, stds_type, stds_id, granularity)
        })
    }

    fn snap_stds(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
    ) -> TgisResult<SpaceTimeDataset> {
        self.storage
            .with_transaction(|conn| registration::snap_stds(conn, stds_type, stds_id))
    }

    fn rename_stds(
        &self,
        stds_type: StdsType,
        old_id: &DatasetId,
        new_id: &DatasetId,
    ) -> TgisResult<SpaceTimeDataset> {
        self.storage
            .with_transaction(|conn| registration::rename_stds(conn, stds_type, old_id, new_id))
    }
}
