//! v001: schema_version plus the five-table family of every dataset kind.

use rusqlite::Connection;

use tgis_core::errors::TgisResult;
use tgis_core::models::{DatasetType, MapType, StdsType};

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TgisResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER NOT NULL,
            applied_at TEXT DEFAULT (strftime('%Y-%m-%d %H:%M:%S', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    for kind in DatasetType::ALL {
        conn.execute_batch(&family_ddl(kind))
            .map_err(|e| to_storage_err(format!("{} tables: {e}", kind.as_str())))?;
    }
    Ok(())
}

fn family_ddl(kind: DatasetType) -> String {
    let k = kind.as_str();
    let (extra_base, abs_cols, rel_cols, extent_null, meta_cols) = match kind {
        DatasetType::Map(map_type) => (
            "",
            "start_time TEXT NOT NULL,
            end_time    TEXT NOT NULL,
            timezone    INTEGER",
            "start_time INTEGER NOT NULL,
            end_time    INTEGER NOT NULL,
            unit        TEXT NOT NULL",
            " NOT NULL",
            map_metadata_columns(map_type),
        ),
        DatasetType::Stds(stds_type) => (
            "semantic_type TEXT NOT NULL,",
            "start_time TEXT,
            end_time    TEXT,
            timezone    INTEGER,
            granularity TEXT",
            "start_time INTEGER,
            end_time    INTEGER,
            unit        TEXT,
            granularity TEXT",
            "",
            stds_metadata_columns(stds_type),
        ),
    };

    format!(
        "
        CREATE TABLE IF NOT EXISTS {k}_base (
            id                TEXT PRIMARY KEY,
            name              TEXT NOT NULL,
            mapset            TEXT NOT NULL,
            creator           TEXT NOT NULL,
            temporal_type     TEXT NOT NULL,
            {extra_base}
            creation_time     TEXT NOT NULL,
            modification_time TEXT NOT NULL,
            revision          INTEGER NOT NULL DEFAULT 1
        );
        CREATE INDEX IF NOT EXISTS idx_{k}_base_mapset ON {k}_base(mapset, name);

        CREATE TABLE IF NOT EXISTS {k}_absolute_time (
            id TEXT PRIMARY KEY REFERENCES {k}_base(id) ON DELETE CASCADE,
            {abs_cols}
        );
        CREATE INDEX IF NOT EXISTS idx_{k}_absolute_start ON {k}_absolute_time(start_time);

        CREATE TABLE IF NOT EXISTS {k}_relative_time (
            id TEXT PRIMARY KEY REFERENCES {k}_base(id) ON DELETE CASCADE,
            {rel_cols}
        );

        CREATE TABLE IF NOT EXISTS {k}_spatial_extent (
            id     TEXT PRIMARY KEY REFERENCES {k}_base(id) ON DELETE CASCADE,
            north  REAL{extent_null},
            south  REAL{extent_null},
            east   REAL{extent_null},
            west   REAL{extent_null},
            top    REAL{extent_null},
            bottom REAL{extent_null},
            proj   TEXT{extent_null}
        );

        CREATE TABLE IF NOT EXISTS {k}_metadata (
            id TEXT PRIMARY KEY REFERENCES {k}_base(id) ON DELETE CASCADE,
            {meta_cols}
        );
        "
    )
}

fn map_metadata_columns(map_type: MapType) -> &'static str {
    match map_type {
        MapType::Raster => {
            "datatype        TEXT,
            cols            INTEGER,
            rows            INTEGER,
            number_of_cells INTEGER,
            nsres           REAL,
            ewres           REAL,
            min             REAL,
            max             REAL,
            strds_register  TEXT"
        }
        MapType::Raster3d => {
            "datatype        TEXT,
            cols            INTEGER,
            rows            INTEGER,
            depths          INTEGER,
            number_of_cells INTEGER,
            nsres           REAL,
            ewres           REAL,
            tbres           REAL,
            min             REAL,
            max             REAL,
            str3ds_register TEXT"
        }
        MapType::Vector => "stvds_register TEXT",
    }
}

fn stds_metadata_columns(stds_type: StdsType) -> &'static str {
    match stds_type {
        StdsType::Strds => {
            "raster_register TEXT,
            title           TEXT,
            description     TEXT,
            number_of_maps  INTEGER NOT NULL DEFAULT 0,
            min_min   REAL,
            min_max   REAL,
            max_min   REAL,
            max_max   REAL,
            nsres_min REAL,
            nsres_max REAL,
            ewres_min REAL,
            ewres_max REAL"
        }
        StdsType::Str3ds => {
            "raster3d_register TEXT,
            title           TEXT,
            description     TEXT,
            number_of_maps  INTEGER NOT NULL DEFAULT 0,
            min_min   REAL,
            min_max   REAL,
            max_min   REAL,
            max_max   REAL,
            nsres_min REAL,
            nsres_max REAL,
            ewres_min REAL,
            ewres_max REAL,
            tbres_min REAL,
            tbres_max REAL"
        }
        StdsType::Stvds => {
            "vector_register TEXT,
            title           TEXT,
            description     TEXT,
            number_of_maps  INTEGER NOT NULL DEFAULT 0"
        }
    }
}
