//! `<kind>_metadata` rows, including the register table pointers.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use tgis_core::errors::TgisResult;
use tgis_core::models::{
    DatasetId, MapMetadata, MapType, Raster3dMetadata, RasterMetadata, StdsDerived, StdsType,
    VectorMetadata,
};

use crate::schema::{map_register_column, metadata_table, stds_register_column};
use crate::to_storage_err;

// ─── Maps ───────────────────────────────────────────────────────────────────

/// Insert or update the metadata of a map. The register pointer is left
/// untouched on update.
pub fn write_map_metadata(conn: &Connection, id: &DatasetId, meta: &MapMetadata) -> TgisResult<()> {
    let id = id.to_string();
    let written = match meta {
        MapMetadata::Raster(m) => conn.execute(
            "INSERT INTO raster_metadata
                (id, datatype, cols, rows, number_of_cells, nsres, ewres, min, max)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                datatype = excluded.datatype, cols = excluded.cols, rows = excluded.rows,
                number_of_cells = excluded.number_of_cells, nsres = excluded.nsres,
                ewres = excluded.ewres, min = excluded.min, max = excluded.max",
            params![
                id,
                m.datatype,
                m.cols,
                m.rows,
                m.number_of_cells,
                m.nsres,
                m.ewres,
                m.min,
                m.max
            ],
        ),
        MapMetadata::Raster3d(m) => conn.execute(
            "INSERT INTO raster3d_metadata
                (id, datatype, cols, rows, depths, number_of_cells, nsres, ewres, tbres, min, max)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
                datatype = excluded.datatype, cols = excluded.cols, rows = excluded.rows,
                depths = excluded.depths, number_of_cells = excluded.number_of_cells,
                nsres = excluded.nsres, ewres = excluded.ewres, tbres = excluded.tbres,
                min = excluded.min, max = excluded.max",
            params![
                id,
                m.datatype,
                m.cols,
                m.rows,
                m.depths,
                m.number_of_cells,
                m.nsres,
                m.ewres,
                m.tbres,
                m.min,
                m.max
            ],
        ),
        MapMetadata::Vector(_) => conn.execute(
            "INSERT INTO vector_metadata (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
            params![id],
        ),
    };
    written.map_err(|e| to_storage_err(format!("write metadata of {id}: {e}")))?;
    Ok(())
}

/// Metadata and register pointer of a map.
pub fn select_map_metadata(
    conn: &Connection,
    map_type: MapType,
    id: &DatasetId,
) -> TgisResult<Option<(MapMetadata, Option<String>)>> {
    let id = id.to_string();
    let result: rusqlite::Result<Option<(MapMetadata, Option<String>)>> = match map_type {
        MapType::Raster => conn
            .query_row(
                "SELECT datatype, cols, rows, number_of_cells, nsres, ewres, min, max,
                        strds_register
                 FROM raster_metadata WHERE id = ?1",
                params![id],
                |row| {
                    let meta = RasterMetadata {
                        datatype: row.get(0)?,
                        cols: row.get(1)?,
                        rows: row.get(2)?,
                        number_of_cells: row.get(3)?,
                        nsres: row.get(4)?,
                        ewres: row.get(5)?,
                        min: row.get(6)?,
                        max: row.get(7)?,
                    };
                    Ok((MapMetadata::Raster(meta), row.get(8)?))
                },
            )
            .optional(),
        MapType::Raster3d => conn
            .query_row(
                "SELECT datatype, cols, rows, depths, number_of_cells, nsres, ewres, tbres,
                        min, max, str3ds_register
                 FROM raster3d_metadata WHERE id = ?1",
                params![id],
                |row| {
                    let meta = Raster3dMetadata {
                        datatype: row.get(0)?,
                        cols: row.get(1)?,
                        rows: row.get(2)?,
                        depths: row.get(3)?,
                        number_of_cells: row.get(4)?,
                        nsres: row.get(5)?,
                        ewres: row.get(6)?,
                        tbres: row.get(7)?,
                        min: row.get(8)?,
                        max: row.get(9)?,
                    };
                    Ok((MapMetadata::Raster3d(meta), row.get(10)?))
                },
            )
            .optional(),
        MapType::Vector => conn
            .query_row(
                "SELECT stvds_register FROM vector_metadata WHERE id = ?1",
                params![id],
                |row| Ok((MapMetadata::Vector(VectorMetadata::default()), row.get(0)?)),
            )
            .optional(),
    };
    result.map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_map_register(
    conn: &Connection,
    map_type: MapType,
    id: &DatasetId,
    table: Option<&str>,
) -> TgisResult<()> {
    conn.execute(
        &format!(
            "UPDATE {} SET {} = ?2 WHERE id = ?1",
            metadata_table(map_type),
            map_register_column(map_type)
        ),
        params![id.to_string(), table],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

// ─── Space-time datasets ────────────────────────────────────────────────────

/// User-maintained part of a space-time dataset's metadata row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StdsMetadataRow {
    pub map_register: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub number_of_maps: i64,
}

pub fn write_stds_info(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
    title: Option<&str>,
    description: Option<&str>,
) -> TgisResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (id, title, description) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title, description = excluded.description",
            metadata_table(stds_type)
        ),
        params![id.to_string(), title, description],
    )
    .map_err(|e| to_storage_err(format!("write metadata of {id}: {e}")))?;
    Ok(())
}

pub fn select_stds_metadata(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
) -> TgisResult<Option<StdsMetadataRow>> {
    conn.query_row(
        &format!(
            "SELECT {}, title, description, number_of_maps FROM {} WHERE id = ?1",
            stds_register_column(stds_type),
            metadata_table(stds_type)
        ),
        params![id.to_string()],
        |row| {
            Ok(StdsMetadataRow {
                map_register: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                number_of_maps: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_stds_register(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
    table: Option<&str>,
) -> TgisResult<()> {
    conn.execute(
        &format!(
            "UPDATE {} SET {} = ?2 WHERE id = ?1",
            metadata_table(stds_type),
            stds_register_column(stds_type)
        ),
        params![id.to_string(), table],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Persist the aggregate columns that exist for this dataset kind.
pub fn write_stds_aggregates(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
    derived: &StdsDerived,
) -> TgisResult<()> {
    let mut columns: Vec<(&str, Value)> =
        vec![("number_of_maps", Value::Integer(derived.number_of_maps))];

    if stds_type != StdsType::Stvds {
        columns.extend([
            ("min_min", real(derived.min_min)),
            ("min_max", real(derived.min_max)),
            ("max_min", real(derived.max_min)),
            ("max_max", real(derived.max_max)),
            ("nsres_min", real(derived.nsres_min)),
            ("nsres_max", real(derived.nsres_max)),
            ("ewres_min", real(derived.ewres_min)),
            ("ewres_max", real(derived.ewres_max)),
        ]);
    }
    if stds_type == StdsType::Str3ds {
        columns.extend([
            ("tbres_min", real(derived.tbres_min)),
            ("tbres_max", real(derived.tbres_max)),
        ]);
    }

    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{col} = ?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {assignments} WHERE id = ?1",
        metadata_table(stds_type)
    );

    let values = std::iter::once(Value::Text(id.to_string()))
        .chain(columns.into_iter().map(|(_, v)| v));
    conn.execute(&sql, params_from_iter(values))
        .map_err(|e| to_storage_err(format!("write aggregates of {id}: {e}")))?;
    Ok(())
}

fn real(v: Option<f64>) -> Value {
    v.map_or(Value::Null, Value::Real)
}
