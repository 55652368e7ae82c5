//! Temporal and spatial extent rows.

use rusqlite::{params, Connection, OptionalExtension};

use tgis_core::errors::TgisResult;
use tgis_core::models::{
    AbsoluteTime, DatasetId, DatasetType, MapType, RelativeTime, SpatialExtent, StdsType,
    TemporalExtent, TemporalRange, TemporalType,
};

use super::{format_time, parse_time};
use crate::schema::{absolute_time_table, relative_time_table, spatial_extent_table};
use crate::to_storage_err;

// ─── Maps ───────────────────────────────────────────────────────────────────

/// Insert or replace the valid time of a map.
pub fn write_map_temporal(
    conn: &Connection,
    map_type: MapType,
    id: &DatasetId,
    extent: &TemporalExtent,
) -> TgisResult<()> {
    let id = id.to_string();
    let written = match extent {
        TemporalExtent::Absolute(t) => conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (id, start_time, end_time, timezone)
                 VALUES (?1, ?2, ?3, ?4)",
                absolute_time_table(map_type)
            ),
            params![id, format_time(&t.start), format_time(&t.end), t.timezone],
        ),
        TemporalExtent::Relative(t) => conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (id, start_time, end_time, unit)
                 VALUES (?1, ?2, ?3, ?4)",
                relative_time_table(map_type)
            ),
            params![id, t.start, t.end, t.unit],
        ),
    };
    written.map_err(|e| to_storage_err(format!("write temporal extent of {id}: {e}")))?;
    Ok(())
}

pub fn select_map_temporal(
    conn: &Connection,
    map_type: MapType,
    id: &DatasetId,
    temporal_type: TemporalType,
) -> TgisResult<Option<TemporalExtent>> {
    let id = id.to_string();
    match temporal_type {
        TemporalType::Absolute => {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT start_time, end_time, timezone FROM {} WHERE id = ?1",
                        absolute_time_table(map_type)
                    ),
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, Option<i32>>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| to_storage_err(e.to_string()))?;
            row.map(|(start, end, tz)| -> TgisResult<TemporalExtent> {
                Ok(AbsoluteTime::new(parse_time(&start)?, parse_time(&end)?, tz).into())
            })
            .transpose()
        }
        TemporalType::Relative => conn
            .query_row(
                &format!(
                    "SELECT start_time, end_time, unit FROM {} WHERE id = ?1",
                    relative_time_table(map_type)
                ),
                params![id],
                |row| {
                    Ok(RelativeTime::new(row.get(0)?, row.get(1)?, row.get::<_, String>(2)?).into())
                },
            )
            .optional()
            .map_err(|e| to_storage_err(e.to_string())),
    }
}

/// Drop the row of the temporal type a map does not use.
pub fn clear_other_temporal(
    conn: &Connection,
    kind: DatasetType,
    id: &DatasetId,
    keep: TemporalType,
) -> TgisResult<()> {
    let table = match keep {
        TemporalType::Absolute => relative_time_table(kind),
        TemporalType::Relative => absolute_time_table(kind),
    };
    conn.execute(
        &format!("DELETE FROM {table} WHERE id = ?1"),
        params![id.to_string()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

// ─── Space-time datasets ────────────────────────────────────────────────────

/// Persisted temporal range and granularity of a space-time dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StdsTemporalRow {
    pub range: Option<TemporalRange>,
    pub granularity: Option<String>,
    /// Relative datasets only.
    pub unit: Option<String>,
}

pub fn write_stds_temporal(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
    temporal_type: TemporalType,
    row: &StdsTemporalRow,
) -> TgisResult<()> {
    let id = id.to_string();
    let written = match temporal_type {
        TemporalType::Absolute => {
            let (start, end) = match &row.range {
                Some(TemporalRange::Absolute { start, end }) => {
                    (Some(format_time(start)), Some(format_time(end)))
                }
                _ => (None, None),
            };
            conn.execute(
                &format!(
                    "INSERT OR REPLACE INTO {} (id, start_time, end_time, timezone, granularity)
                     VALUES (?1, ?2, ?3, NULL, ?4)",
                    absolute_time_table(stds_type)
                ),
                params![id, start, end, row.granularity],
            )
        }
        TemporalType::Relative => {
            let (start, end) = match &row.range {
                Some(TemporalRange::Relative { start, end }) => (Some(*start), Some(*end)),
                _ => (None, None),
            };
            conn.execute(
                &format!(
                    "INSERT OR REPLACE INTO {} (id, start_time, end_time, unit, granularity)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    relative_time_table(stds_type)
                ),
                params![id, start, end, row.unit, row.granularity],
            )
        }
    };
    written.map_err(|e| to_storage_err(format!("write temporal extent of {id}: {e}")))?;
    Ok(())
}

pub fn select_stds_temporal(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
    temporal_type: TemporalType,
) -> TgisResult<StdsTemporalRow> {
    let id = id.to_string();
    match temporal_type {
        TemporalType::Absolute => {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT start_time, end_time, granularity FROM {} WHERE id = ?1",
                        absolute_time_table(stds_type)
                    ),
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, Option<String>>(0)?,
                            row.get::<_, Option<String>>(1)?,
                            row.get::<_, Option<String>>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| to_storage_err(e.to_string()))?;
            let Some((start, end, granularity)) = row else {
                return Ok(StdsTemporalRow::default());
            };
            let range = match (start, end) {
                (Some(start), Some(end)) => Some(TemporalRange::Absolute {
                    start: parse_time(&start)?,
                    end: parse_time(&end)?,
                }),
                _ => None,
            };
            Ok(StdsTemporalRow {
                range,
                granularity,
                unit: None,
            })
        }
        TemporalType::Relative => {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT start_time, end_time, unit, granularity FROM {} WHERE id = ?1",
                        relative_time_table(stds_type)
                    ),
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, Option<i64>>(0)?,
                            row.get::<_, Option<i64>>(1)?,
                            row.get::<_, Option<String>>(2)?,
                            row.get::<_, Option<String>>(3)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| to_storage_err(e.to_string()))?;
            let Some((start, end, unit, granularity)) = row else {
                return Ok(StdsTemporalRow::default());
            };
            Ok(StdsTemporalRow {
                range: start
                    .zip(end)
                    .map(|(start, end)| TemporalRange::Relative { start, end }),
                granularity,
                unit,
            })
        }
    }
}

/// Record the unit of a relative dataset, leaving range and granularity
/// untouched.
pub fn set_stds_unit(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
    unit: &str,
) -> TgisResult<()> {
    let updated = conn
        .execute(
            &format!(
                "UPDATE {} SET unit = ?2 WHERE id = ?1",
                relative_time_table(stds_type)
            ),
            params![id.to_string(), unit],
        )
        .map_err(|e| to_storage_err(format!("set unit of {id}: {e}")))?;
    if updated == 0 {
        write_stds_temporal(
            conn,
            stds_type,
            id,
            TemporalType::Relative,
            &StdsTemporalRow {
                unit: Some(unit.to_string()),
                ..StdsTemporalRow::default()
            },
        )?;
    }
    Ok(())
}

// ─── Spatial extents ────────────────────────────────────────────────────────

/// Insert or replace a spatial extent row. `None` writes an all-NULL row
/// (space-time datasets without maps).
pub fn write_spatial(
    conn: &Connection,
    kind: DatasetType,
    id: &DatasetId,
    extent: Option<&SpatialExtent>,
) -> TgisResult<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {} (id, north, south, east, west, top, bottom, proj)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            spatial_extent_table(kind)
        ),
        params![
            id.to_string(),
            extent.map(|e| e.north),
            extent.map(|e| e.south),
            extent.map(|e| e.east),
            extent.map(|e| e.west),
            extent.map(|e| e.top),
            extent.map(|e| e.bottom),
            extent.map(|e| e.proj.as_str()),
        ],
    )
    .map_err(|e| to_storage_err(format!("write spatial extent of {id}: {e}")))?;
    Ok(())
}

pub fn select_spatial(
    conn: &Connection,
    kind: DatasetType,
    id: &DatasetId,
) -> TgisResult<Option<SpatialExtent>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT north, south, east, west, top, bottom, proj FROM {} WHERE id = ?1",
                spatial_extent_table(kind)
            ),
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, Option<f64>>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, Option<f64>>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        Some((Some(n), Some(s), Some(e), Some(w), Some(t), Some(b), Some(proj))) => {
            Ok(Some(SpatialExtent::new(n, s, e, w, t, b, proj.parse()?)))
        }
        _ => Ok(None),
    }
}
