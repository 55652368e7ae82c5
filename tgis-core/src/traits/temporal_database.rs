//! ITemporalDatabase: the metadata store and registration interface.

use crate::errors::TgisResult;
use crate::models::{
    DatasetId, MapDataset, MapType, SpaceTimeDataset, StdsType, TimeAssignment, TimelineEntry,
};

/// Persistent store of maps and space-time datasets, and the registrations
/// between them.
///
/// Calls block on SQLite. Every write runs in a single transaction.
pub trait ITemporalDatabase: Send + Sync {
    // Maps
    fn insert_map(&self, map: &MapDataset) -> TgisResult<()>;
    fn select_map(&self, map_type: MapType, id: &DatasetId) -> TgisResult<Option<MapDataset>>;
    /// Bumps revision and modification time. Returns the stored record.
    fn update_map(&self, map: &MapDataset) -> TgisResult<MapDataset>;
    /// Unregisters the map everywhere and drops its register table.
    /// Returns `false` if the map was not in the database.
    fn delete_map(&self, map_type: MapType, id: &DatasetId) -> TgisResult<bool>;
    fn is_map_in_db(&self, map_type: MapType, id: &DatasetId) -> TgisResult<bool>;
    fn list_maps(&self, map_type: MapType, mapset: Option<&str>) -> TgisResult<Vec<DatasetId>>;

    // Space-time datasets
    fn insert_stds(&self, stds: &SpaceTimeDataset) -> TgisResult<()>;
    fn select_stds(
        &self,
        stds_type: StdsType,
        id: &DatasetId,
    ) -> TgisResult<Option<SpaceTimeDataset>>;
    fn update_stds(&self, stds: &SpaceTimeDataset) -> TgisResult<SpaceTimeDataset>;
    fn delete_stds(&self, stds_type: StdsType, id: &DatasetId) -> TgisResult<bool>;
    fn is_stds_in_db(&self, stds_type: StdsType, id: &DatasetId) -> TgisResult<bool>;
    fn list_stds(&self, stds_type: StdsType, mapset: Option<&str>) -> TgisResult<Vec<DatasetId>>;

    // Registration
    fn register_map(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        map_id: &DatasetId,
    ) -> TgisResult<()>;
    fn unregister_map(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        map_id: &DatasetId,
    ) -> TgisResult<()>;
    /// Register several maps in one transaction, optionally stamping them
    /// with valid time first. Returns the number of maps registered.
    fn register_maps(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        map_ids: &[DatasetId],
        assignment: Option<&TimeAssignment>,
    ) -> TgisResult<usize>;
    /// Member maps ordered by start time.
    fn registered_maps(&self, stds_type: StdsType, stds_id: &DatasetId)
        -> TgisResult<Vec<MapDataset>>;
    fn registered_datasets(
        &self,
        map_type: MapType,
        map_id: &DatasetId,
    ) -> TgisResult<Vec<DatasetId>>;
    /// Member maps in start order with the unregistered time between them.
    fn registered_maps_with_gaps(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
    ) -> TgisResult<Vec<TimelineEntry>>;
    /// Recompute aggregates and granularity and persist them on the dataset.
    fn refresh_derived(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
    ) -> TgisResult<SpaceTimeDataset>;

    // Timeline edits
    /// Move every member map by a granularity such as `"1 day"` (absolute)
    /// or `"-2"` (relative).
    fn shift_stds(
        &self,
        stds_type: StdsType,
        stds_id: &DatasetId,
        granularity: &str,
    ) -> TgisResult<SpaceTimeDataset>;
    /// Close the gaps: each map ends where the next one starts.
    fn snap_stds(&self, stds_type: StdsType, stds_id: &DatasetId)
        -> TgisResult<SpaceTimeDataset>;
    /// Rename within the same mapset, carrying the registrations along.
    fn rename_stds(
        &self,
        stds_type: StdsType,
        old_id: &DatasetId,
        new_id: &DatasetId,
    ) -> TgisResult<SpaceTimeDataset>;
}
