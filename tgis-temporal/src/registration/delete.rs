//! Deletion paths. These are the only operations that drop register tables
//! of existing datasets.

use rusqlite::Connection;
use tracing::{info, warn};

use tgis_core::errors::TgisResult;
use tgis_core::models::{DatasetId, MapType, StdsType};
use tgis_storage::queries::{map_crud, metadata_ops, register_ops, stds_crud};

use super::refresh;

/// Delete a map: unregister it from every dataset it belongs to, drop its
/// register table and delete its rows. Returns `false` if the map is not
/// in the database.
pub fn delete_map(
    conn: &Connection,
    map_type: MapType,
    id: &DatasetId,
    refresh: bool,
) -> TgisResult<bool> {
    let Some(map) = map_crud::select_map(conn, map_type, id)? else {
        return Ok(false);
    };
    let stds_type = map_type.stds_type();

    if let Some(table) = &map.stds_register {
        if register_ops::table_exists(conn, table)? {
            for stds_id in register_ops::list_members(conn, table)? {
                let Some(stds) = stds_crud::select_stds(conn, stds_type, &stds_id)? else {
                    warn!(map = %id, stds = %stds_id, "register entry for a missing dataset");
                    continue;
                };
                if let Some(stds_table) = &stds.map_register {
                    if register_ops::table_exists(conn, stds_table)? {
                        register_ops::remove_member(conn, stds_table, id)?;
                    }
                }
                if refresh {
                    refresh::refresh_derived(conn, stds_type, &stds_id)?;
                }
            }
        }
        register_ops::drop_register_table(conn, table)?;
    }

    map_crud::delete_map(conn, map_type, id)?;
    info!(map = %id, kind = %map_type, "deleted map");
    Ok(true)
}

/// Delete a space-time dataset: unregister every member map, drop the
/// dataset's register table and delete its rows. The member maps stay.
pub fn delete_stds(conn: &Connection, stds_type: StdsType, id: &DatasetId) -> TgisResult<bool> {
    let Some(stds) = stds_crud::select_stds(conn, stds_type, id)? else {
        return Ok(false);
    };
    let map_type = stds_type.map_type();

    if let Some(table) = &stds.map_register {
        if register_ops::table_exists(conn, table)? {
            for map_id in register_ops::list_members(conn, table)? {
                let Some((_, map_table)) = metadata_ops::select_map_metadata(conn, map_type, &map_id)?
                else {
                    warn!(stds = %id, map = %map_id, "register entry for a missing map");
                    continue;
                };
                if let Some(map_table) = map_table {
                    if register_ops::table_exists(conn, &map_table)? {
                        register_ops::remove_member(conn, &map_table, id)?;
                    }
                }
            }
        }
        register_ops::drop_register_table(conn, table)?;
    }

    stds_crud::delete_stds(conn, stds_type, id)?;
    info!(stds = %id, kind = %stds_type, "deleted space-time dataset");
    Ok(true)
}
