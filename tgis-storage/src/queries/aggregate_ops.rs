//! Aggregates over the maps listed in a space-time dataset's register table.

use rusqlite::{Connection, OptionalExtension};

use tgis_core::errors::TgisResult;
use tgis_core::models::{
    DatasetId, SpatialExtent, StdsDerived, StdsType, TemporalRange, TemporalType,
};

use super::parse_time;
use super::register_ops::table_exists;
use crate::schema::{
    absolute_time_table, base_table, metadata_table, quote_ident, relative_time_table,
    spatial_extent_table,
};
use crate::to_storage_err;

/// Recompute the aggregate view of a space-time dataset from its members.
/// A dataset without register table yields the empty aggregate.
pub fn compute_derived(
    conn: &Connection,
    stds_type: StdsType,
    temporal_type: TemporalType,
    register: Option<&str>,
) -> TgisResult<StdsDerived> {
    let Some(register) = register else {
        return Ok(StdsDerived::default());
    };
    if !table_exists(conn, register)? {
        return Ok(StdsDerived::default());
    }
    let reg = quote_ident(register);
    let map_type = stds_type.map_type();

    let number_of_maps: i64 = conn
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM {reg} r JOIN {} b ON b.id = r.id",
                base_table(map_type)
            ),
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut derived = StdsDerived {
        number_of_maps,
        ..Default::default()
    };
    if number_of_maps == 0 {
        return Ok(derived);
    }

    derived.temporal_range = temporal_range(conn, &reg, stds_type, temporal_type)?;
    derived.spatial = spatial_union(conn, &reg, stds_type)?;

    if stds_type != StdsType::Stvds {
        let tbres = if stds_type == StdsType::Str3ds {
            "MIN(m.tbres), MAX(m.tbres)"
        } else {
            "NULL, NULL"
        };
        let values = conn
            .query_row(
                &format!(
                    "SELECT MIN(m.min), MAX(m.min), MIN(m.max), MAX(m.max),
                            MIN(m.nsres), MAX(m.nsres), MIN(m.ewres), MAX(m.ewres), {tbres}
                     FROM {reg} r JOIN {} m ON m.id = r.id",
                    metadata_table(map_type)
                ),
                [],
                |row| {
                    let mut v = [None; 10];
                    for (i, slot) in v.iter_mut().enumerate() {
                        *slot = row.get::<_, Option<f64>>(i)?;
                    }
                    Ok(v)
                },
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        derived.min_min = values[0];
        derived.min_max = values[1];
        derived.max_min = values[2];
        derived.max_max = values[3];
        derived.nsres_min = values[4];
        derived.nsres_max = values[5];
        derived.ewres_min = values[6];
        derived.ewres_max = values[7];
        derived.tbres_min = values[8];
        derived.tbres_max = values[9];
    }

    Ok(derived)
}

fn temporal_range(
    conn: &Connection,
    reg: &str,
    stds_type: StdsType,
    temporal_type: TemporalType,
) -> TgisResult<Option<TemporalRange>> {
    let map_type = stds_type.map_type();
    match temporal_type {
        TemporalType::Absolute => {
            let (start, end): (Option<String>, Option<String>) = conn
                .query_row(
                    &format!(
                        "SELECT MIN(t.start_time), MAX(t.end_time)
                         FROM {reg} r JOIN {} t ON t.id = r.id",
                        absolute_time_table(map_type)
                    ),
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
            match (start, end) {
                (Some(start), Some(end)) => Ok(Some(TemporalRange::Absolute {
                    start: parse_time(&start)?,
                    end: parse_time(&end)?,
                })),
                _ => Ok(None),
            }
        }
        TemporalType::Relative => {
            let (start, end): (Option<i64>, Option<i64>) = conn
                .query_row(
                    &format!(
                        "SELECT MIN(t.start_time), MAX(t.end_time)
                         FROM {reg} r JOIN {} t ON t.id = r.id",
                        relative_time_table(map_type)
                    ),
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(start
                .zip(end)
                .map(|(start, end)| TemporalRange::Relative { start, end }))
        }
    }
}

fn spatial_union(
    conn: &Connection,
    reg: &str,
    stds_type: StdsType,
) -> TgisResult<Option<SpatialExtent>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT s.north, s.south, s.east, s.west, s.top, s.bottom, s.proj
             FROM {reg} r JOIN {} s ON s.id = r.id
             ORDER BY r.id",
            spatial_extent_table(stds_type.map_type())
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut union: Option<SpatialExtent> = None;
    for row in rows {
        let (n, s, e, w, t, b, proj) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let extent = SpatialExtent::new(n, s, e, w, t, b, proj.parse()?);
        union = match union {
            None => Some(extent),
            // Mixed projections have no common cover.
            Some(acc) => match acc.union(&extent) {
                Some(u) => Some(u),
                None => return Ok(None),
            },
        };
    }
    Ok(union)
}

/// Persisted `number_of_maps` column, as last written by a refresh.
pub fn stored_map_count(
    conn: &Connection,
    stds_type: StdsType,
    id: &DatasetId,
) -> TgisResult<Option<i64>> {
    conn.query_row(
        &format!(
            "SELECT number_of_maps FROM {} WHERE id = ?1",
            metadata_table(stds_type)
        ),
        [id.to_string()],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}
