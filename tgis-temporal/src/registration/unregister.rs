//! Remove a map from a space-time dataset.

use rusqlite::Connection;
use tracing::info;

use tgis_core::errors::{RegistrationError, TgisResult};
use tgis_core::models::{DatasetId, StdsType};
use tgis_storage::queries::register_ops;

use super::{load_member_map, load_stds, refresh};

/// Remove the registration of `map_id` in `stds_id`. Register tables are
/// kept even when they become empty.
pub fn unregister_map(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
    map_id: &DatasetId,
    refresh: bool,
) -> TgisResult<()> {
    let stds = load_stds(conn, stds_type, stds_id)?;
    let map = load_member_map(conn, stds_type, map_id)?;

    let removed = match &stds.map_register {
        Some(table) if register_ops::table_exists(conn, table)? => {
            register_ops::remove_member(conn, table, map_id)?
        }
        _ => false,
    };
    if !removed {
        return Err(RegistrationError::NotRegistered {
            map_id: map_id.to_string(),
            stds_id: stds_id.to_string(),
        }
        .into());
    }

    if let Some(table) = &map.stds_register {
        if register_ops::table_exists(conn, table)? {
            register_ops::remove_member(conn, table, stds_id)?;
        }
    }

    if refresh {
        refresh::refresh_derived(conn, stds_type, stds_id)?;
    }

    info!(map = %map_id, stds = %stds_id, "unregistered map");
    Ok(())
}
