//! Membership queries and derived metadata.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use tgis_core::errors::{TgisError, TgisResult};
use tgis_core::models::{DatasetId, MapDataset, MapType, SpaceTimeDataset, StdsType};
use tgis_storage::queries::{map_crud, metadata_ops, register_ops, stds_crud};

use super::load_stds;
use crate::granularity::compute_granularity;
use crate::topology::sort_by_start;

/// Member maps of a dataset ordered by start time or interval.
pub fn registered_maps(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
) -> TgisResult<Vec<MapDataset>> {
    let stds = load_stds(conn, stds_type, stds_id)?;
    let Some(table) = stds.map_register.as_deref() else {
        return Ok(Vec::new());
    };
    if !register_ops::table_exists(conn, table)? {
        return Ok(Vec::new());
    }

    let map_type = stds_type.map_type();
    let mut maps = Vec::new();
    for map_id in register_ops::list_members(conn, table)? {
        match map_crud::select_map(conn, map_type, &map_id)? {
            Some(map) => maps.push(map),
            None => warn!(stds = %stds_id, map = %map_id, "register entry for a missing map"),
        }
    }
    sort_by_start(&mut maps);
    Ok(maps)
}

/// Ids of the datasets a map is registered in.
pub fn registered_datasets(
    conn: &Connection,
    map_type: MapType,
    map_id: &DatasetId,
) -> TgisResult<Vec<DatasetId>> {
    let Some((_, table)) = metadata_ops::select_map_metadata(conn, map_type, map_id)? else {
        return Err(TgisError::DatasetNotFound {
            id: format!("{map_type} {map_id}"),
        });
    };
    match table {
        Some(table) if register_ops::table_exists(conn, &table)? => {
            register_ops::list_members(conn, &table)
        }
        _ => Ok(Vec::new()),
    }
}

/// Recompute aggregates and granularity of a dataset and persist them.
///
/// The computed granularity replaces the stored one; a dataset whose maps
/// give nothing to measure keeps its previous granularity.
pub fn refresh_derived(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
) -> TgisResult<SpaceTimeDataset> {
    let maps = registered_maps(conn, stds_type, stds_id)?;
    let mut stds = load_stds(conn, stds_type, stds_id)?;
    if let Some(granularity) = compute_granularity(stds.temporal_type, &maps)? {
        stds.granularity = Some(granularity);
    }
    stds_crud::store_derived(conn, &stds)?;
    debug!(
        stds = %stds_id,
        maps = stds.derived.number_of_maps,
        granularity = stds.granularity.as_deref().unwrap_or("none"),
        "refreshed derived metadata"
    );
    Ok(stds)
}

/// Drop every register table without rows and clear its owner's pointer.
/// Returns the dropped table names.
pub fn drop_empty_register_tables(conn: &Connection) -> TgisResult<Vec<String>> {
    let mut dropped = Vec::new();
    for entry in register_ops::list_register_tables(conn)? {
        if register_ops::table_exists(conn, &entry.table_name)?
            && register_ops::count_members(conn, &entry.table_name)? > 0
        {
            continue;
        }
        let owner = DatasetId::parse(&entry.owner_id)?;
        if let Ok(map_type) = entry.owner_kind.parse::<MapType>() {
            metadata_ops::set_map_register(conn, map_type, &owner, None)?;
        } else {
            let stds_type: StdsType = entry.owner_kind.parse()?;
            metadata_ops::set_stds_register(conn, stds_type, &owner, None)?;
        }
        register_ops::drop_register_table(conn, &entry.table_name)?;
        dropped.push(entry.table_name);
    }
    if !dropped.is_empty() {
        info!(count = dropped.len(), "dropped empty register tables");
    }
    Ok(dropped)
}
