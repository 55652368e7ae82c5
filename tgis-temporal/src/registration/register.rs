//! Register a map in a space-time dataset.

use rusqlite::Connection;
use tracing::info;

use tgis_core::errors::{RegistrationError, TemporalError, TgisResult};
use tgis_core::models::{DatasetId, DatasetType, StdsType, TemporalExtent};
use tgis_storage::queries::{extent_ops, metadata_ops, register_ops};
use tgis_storage::schema::{map_register_table, stds_register_table};

use super::{check_unit, load_member_map, load_stds, refresh};
use crate::granularity::normalize_unit;

/// Register `map_id` in the space-time dataset `stds_id`.
///
/// Creates the register tables of either side on first use. With
/// `refresh` set, the dataset's persisted aggregates are recomputed.
pub fn register_map(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
    map_id: &DatasetId,
    refresh: bool,
) -> TgisResult<()> {
    let stds = load_stds(conn, stds_type, stds_id)?;
    let map = load_member_map(conn, stds_type, map_id)?;
    let map_type = map.map_type;

    if map_id.mapset() != stds_id.mapset() {
        return Err(RegistrationError::MapsetMismatch {
            map_mapset: map_id.mapset().to_string(),
            stds_mapset: stds_id.mapset().to_string(),
        }
        .into());
    }
    if map.temporal_type() != stds.temporal_type {
        return Err(TemporalError::TemporalTypeMismatch {
            expected: stds.temporal_type.to_string(),
            found: map.temporal_type().to_string(),
        }
        .into());
    }

    if let Some(table) = &stds.map_register {
        if register_ops::table_exists(conn, table)? && register_ops::is_member(conn, table, map_id)?
        {
            return Err(RegistrationError::AlreadyRegistered {
                map_id: map_id.to_string(),
                stds_id: stds_id.to_string(),
            }
            .into());
        }
    }

    // The first relative map fixes the unit of the dataset for good.
    if let TemporalExtent::Relative(t) = &map.temporal {
        let unit = normalize_unit(&t.unit)?;
        check_unit(&stds, unit)?;
        if stds.relative_unit.is_none() {
            extent_ops::set_stds_unit(conn, stds_type, stds_id, unit)?;
        }
    }

    let map_table = ensure_register_table(
        conn,
        map.stds_register.as_deref(),
        map_register_table(map_type, map_id),
        DatasetType::Map(map_type),
        map_id,
        DatasetType::Stds(stds_type),
    )?;
    if map.stds_register.as_deref() != Some(map_table.as_str()) {
        metadata_ops::set_map_register(conn, map_type, map_id, Some(&map_table))?;
    }

    let stds_table = ensure_register_table(
        conn,
        stds.map_register.as_deref(),
        stds_register_table(stds_type, stds_id),
        DatasetType::Stds(stds_type),
        stds_id,
        DatasetType::Map(map_type),
    )?;
    if stds.map_register.as_deref() != Some(stds_table.as_str()) {
        metadata_ops::set_stds_register(conn, stds_type, stds_id, Some(&stds_table))?;
    }

    register_ops::add_member(conn, &stds_table, map_id)?;
    if !register_ops::is_member(conn, &map_table, stds_id)? {
        register_ops::add_member(conn, &map_table, stds_id)?;
    }

    if refresh {
        refresh::refresh_derived(conn, stds_type, stds_id)?;
    }

    info!(map = %map_id, stds = %stds_id, "registered map");
    Ok(())
}

/// Reuse the table named by `pointer` if it still exists, otherwise create
/// one, preferably named `preferred`.
fn ensure_register_table(
    conn: &Connection,
    pointer: Option<&str>,
    preferred: String,
    owner_kind: DatasetType,
    owner_id: &DatasetId,
    member_kind: DatasetType,
) -> TgisResult<String> {
    if let Some(existing) = pointer {
        if register_ops::table_exists(conn, existing)? {
            return Ok(existing.to_string());
        }
    }
    register_ops::create_register_table(conn, &preferred, owner_kind, owner_id, member_kind)
}
