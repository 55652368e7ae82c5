//! Map registration workflow.
//!
//! Every function runs on a connection the caller has put inside a
//! transaction, so a failure leaves no partial registration behind.

pub mod delete;
pub mod refresh;
pub mod register;
pub mod timeline;
pub mod unregister;

use rusqlite::Connection;

use tgis_core::errors::{RegistrationError, TemporalError, TgisError, TgisResult};
use tgis_core::models::{
    DatasetId, DatasetType, MapDataset, MapType, SpaceTimeDataset, StdsType, TemporalExtent,
};
use tgis_storage::queries::{base_ops, map_crud, stds_crud};

use crate::granularity::normalize_unit;

pub use delete::{delete_map, delete_stds};
pub use refresh::{
    drop_empty_register_tables, refresh_derived, registered_datasets, registered_maps,
};
pub use register::register_map;
pub use timeline::{assign_valid_time, register_maps, rename_stds, shift_stds, snap_stds};
pub use unregister::unregister_map;

pub(crate) fn load_stds(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
) -> TgisResult<SpaceTimeDataset> {
    stds_crud::select_stds(conn, stds_type, id)?.ok_or_else(|| TgisError::DatasetNotFound {
        id: format!("{stds_type} {id}"),
    })
}

/// Load a map of the kind a dataset registers. A map found under another
/// kind is a type mismatch rather than a missing map.
pub(crate) fn load_member_map(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
) -> TgisResult<MapDataset> {
    let map_type = stds_type.map_type();
    if let Some(map) = map_crud::select_map(conn, map_type, id)? {
        return Ok(map);
    }
    for other in MapType::ALL.into_iter().filter(|t| *t != map_type) {
        if base_ops::exists(conn, DatasetType::Map(other), id)? {
            return Err(RegistrationError::MapTypeMismatch {
                map_type: other.to_string(),
                stds_type: stds_type.to_string(),
            }
            .into());
        }
    }
    Err(TgisError::DatasetNotFound {
        id: format!("{map_type} {id}"),
    })
}

/// A relative map must use the unit recorded on the dataset, if any.
pub(crate) fn check_unit(stds: &SpaceTimeDataset, unit: &str) -> TgisResult<()> {
    let Some(expected) = stds.relative_unit.as_deref() else {
        return Ok(());
    };
    let expected = normalize_unit(expected)?;
    let found = normalize_unit(unit)?;
    if expected != found {
        return Err(TemporalError::UnitMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Check a relative map against the unit of every dataset it is
/// registered in.
pub(crate) fn check_unit_in_datasets(conn: &Connection, map: &MapDataset) -> TgisResult<()> {
    let TemporalExtent::Relative(t) = &map.temporal else {
        return Ok(());
    };
    let stds_type = map.map_type.stds_type();
    for stds_id in registered_datasets(conn, map.map_type, map.id())? {
        check_unit(&load_stds(conn, stds_type, &stds_id)?, &t.unit)?;
    }
    Ok(())
}
