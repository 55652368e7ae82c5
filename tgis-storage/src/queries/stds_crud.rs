//! Insert, select, update, delete for space-time datasets.
//!
//! The aggregate view (`StdsDerived`) is recomputed from the register table
//! on every select.

use rusqlite::Connection;

use tgis_core::errors::TgisResult;
use tgis_core::models::{DatasetId, DatasetType, SpaceTimeDataset, StdsType};

use super::extent_ops::StdsTemporalRow;
use super::{aggregate_ops, base_ops, extent_ops, metadata_ops};

pub fn insert_stds(conn: &Connection, stds: &SpaceTimeDataset) -> TgisResult<()> {
    let kind = DatasetType::Stds(stds.stds_type);
    base_ops::insert_base(
        conn,
        kind,
        &stds.base,
        stds.temporal_type,
        Some(&stds.semantic_type),
    )?;
    extent_ops::write_stds_temporal(
        conn,
        stds.stds_type,
        stds.id(),
        stds.temporal_type,
        &StdsTemporalRow {
            range: None,
            granularity: stds.granularity.clone(),
            unit: stds.relative_unit.clone(),
        },
    )?;
    extent_ops::write_spatial(conn, kind, stds.id(), None)?;
    metadata_ops::write_stds_info(
        conn,
        stds.stds_type,
        stds.id(),
        stds.title.as_deref(),
        stds.description.as_deref(),
    )?;
    if let Some(table) = &stds.map_register {
        metadata_ops::set_stds_register(conn, stds.stds_type, stds.id(), Some(table))?;
    }
    Ok(())
}

pub fn select_stds(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
) -> TgisResult<Option<SpaceTimeDataset>> {
    let kind = DatasetType::Stds(stds_type);
    let Some(base_row) = base_ops::select_base(conn, kind, id)? else {
        return Ok(None);
    };

    let temporal = extent_ops::select_stds_temporal(conn, stds_type, id, base_row.temporal_type)?;
    let meta = metadata_ops::select_stds_metadata(conn, stds_type, id)?.unwrap_or_default();
    let derived = aggregate_ops::compute_derived(
        conn,
        stds_type,
        base_row.temporal_type,
        meta.map_register.as_deref(),
    )?;

    Ok(Some(SpaceTimeDataset {
        stds_type,
        base: base_row.base,
        semantic_type: base_row.semantic_type.unwrap_or_default(),
        temporal_type: base_row.temporal_type,
        granularity: temporal.granularity,
        title: meta.title,
        description: meta.description,
        relative_unit: temporal.unit,
        map_register: meta.map_register,
        derived,
    }))
}

/// Rewrite the user-maintained fields of an existing dataset. The relative
/// unit belongs to the registrations and is left as stored.
pub fn update_stds(conn: &Connection, stds: &SpaceTimeDataset) -> TgisResult<()> {
    let kind = DatasetType::Stds(stds.stds_type);
    base_ops::update_base(conn, kind, &stds.base, Some(&stds.semantic_type))?;

    let mut temporal =
        extent_ops::select_stds_temporal(conn, stds.stds_type, stds.id(), stds.temporal_type)?;
    temporal.granularity = stds.granularity.clone();
    extent_ops::write_stds_temporal(
        conn,
        stds.stds_type,
        stds.id(),
        stds.temporal_type,
        &temporal,
    )?;
    metadata_ops::write_stds_info(
        conn,
        stds.stds_type,
        stds.id(),
        stds.title.as_deref(),
        stds.description.as_deref(),
    )?;
    Ok(())
}

/// Persist derived aggregates, temporal range and granularity.
pub fn store_derived(conn: &Connection, stds: &SpaceTimeDataset) -> TgisResult<()> {
    let kind = DatasetType::Stds(stds.stds_type);
    extent_ops::write_stds_temporal(
        conn,
        stds.stds_type,
        stds.id(),
        stds.temporal_type,
        &StdsTemporalRow {
            range: stds.derived.temporal_range.clone(),
            granularity: stds.granularity.clone(),
            unit: stds.relative_unit.clone(),
        },
    )?;
    extent_ops::write_spatial(conn, kind, stds.id(), stds.derived.spatial.as_ref())?;
    metadata_ops::write_stds_aggregates(conn, stds.stds_type, stds.id(), &stds.derived)
}

pub fn delete_stds(conn: &Connection, stds_type: StdsType, id: &DatasetId) -> TgisResult<bool> {
    base_ops::delete_base(conn, DatasetType::Stds(stds_type), id)
}
