//! Insert, select, update, delete for map datasets.
//!
//! Callers provide the transaction; each function touches the whole
//! table family of one map.

use rusqlite::Connection;

use tgis_core::errors::TgisResult;
use tgis_core::models::{DatasetId, DatasetType, MapDataset, MapType};
use tgis_core::TgisError;

use super::{base_ops, extent_ops, metadata_ops};

pub fn insert_map(conn: &Connection, map: &MapDataset) -> TgisResult<()> {
    let kind = DatasetType::Map(map.map_type);
    base_ops::insert_base(conn, kind, &map.base, map.temporal_type(), None)?;
    extent_ops::write_map_temporal(conn, map.map_type, map.id(), &map.temporal)?;
    extent_ops::write_spatial(conn, kind, map.id(), Some(&map.spatial))?;
    metadata_ops::write_map_metadata(conn, map.id(), &map.metadata)?;
    if let Some(table) = &map.stds_register {
        metadata_ops::set_map_register(conn, map.map_type, map.id(), Some(table))?;
    }
    Ok(())
}

pub fn select_map(
    conn: &Connection,
    map_type: MapType,
    id: &DatasetId,
) -> TgisResult<Option<MapDataset>> {
    let kind = DatasetType::Map(map_type);
    let Some(base_row) = base_ops::select_base(conn, kind, id)? else {
        return Ok(None);
    };

    let temporal = extent_ops::select_map_temporal(conn, map_type, id, base_row.temporal_type)?
        .ok_or_else(|| missing(id, "temporal extent"))?;
    let spatial =
        extent_ops::select_spatial(conn, kind, id)?.ok_or_else(|| missing(id, "spatial extent"))?;
    let (metadata, stds_register) = metadata_ops::select_map_metadata(conn, map_type, id)?
        .ok_or_else(|| missing(id, "metadata"))?;

    Ok(Some(MapDataset {
        map_type,
        base: base_row.base,
        temporal,
        spatial,
        metadata,
        stds_register,
    }))
}

/// Rewrite every row of an existing map. The register pointer is kept.
pub fn update_map(conn: &Connection, map: &MapDataset) -> TgisResult<()> {
    let kind = DatasetType::Map(map.map_type);
    base_ops::update_base(conn, kind, &map.base, None)?;
    extent_ops::write_map_temporal(conn, map.map_type, map.id(), &map.temporal)?;
    extent_ops::clear_other_temporal(conn, kind, map.id(), map.temporal_type())?;
    extent_ops::write_spatial(conn, kind, map.id(), Some(&map.spatial))?;
    metadata_ops::write_map_metadata(conn, map.id(), &map.metadata)?;
    Ok(())
}

/// Delete the rows of a map. Register tables are the caller's concern.
pub fn delete_map(conn: &Connection, map_type: MapType, id: &DatasetId) -> TgisResult<bool> {
    base_ops::delete_base(conn, DatasetType::Map(map_type), id)
}

fn missing(id: &DatasetId, what: &str) -> TgisError {
    crate::to_storage_err(format!("{id}: base row without {what}"))
}
