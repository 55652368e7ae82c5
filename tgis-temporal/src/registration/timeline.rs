//! Bulk edits of the valid time of a dataset's maps, and renaming.
//!
//! Every edit computes all new extents before writing any of them, so an
//! invalid step leaves the maps untouched.

use std::collections::BTreeSet;

use chrono::Local;
use rusqlite::Connection;
use tracing::{debug, info};

use tgis_core::errors::{TemporalError, TgisError, TgisResult};
use tgis_core::models::{
    AbsoluteTime, DatasetId, DatasetType, MapDataset, RelativeTime, SpaceTimeDataset, StdsType,
    TemporalExtent, TemporalType, TimeAssignment, TimePoint,
};
use tgis_storage::queries::{base_ops, map_crud, register_ops, stds_crud};
use tgis_storage::schema::stds_register_table;

use super::{
    check_unit_in_datasets, load_member_map, load_stds, refresh, register, registered_datasets,
    registered_maps,
};
use crate::granularity::{
    check_granularity_string, compute_granularity, increment_datetime_by_string, normalize_unit,
    parse_shift, relative_increment,
};
use crate::validation;

// ─── Valid time assignment ──────────────────────────────────────────────────

/// Valid time of the map at 0-based position `index` under `assignment`.
///
/// `unit` is required for relative time. `timezone` is carried over to
/// absolute extents.
pub fn assign_valid_time(
    assignment: &TimeAssignment,
    index: i64,
    unit: Option<&str>,
    timezone: Option<i32>,
) -> TgisResult<TemporalExtent> {
    check_assignment(assignment)?;
    let increment = assignment.increment.as_deref();
    match assignment.start {
        TimePoint::Absolute(start) => {
            let start = match increment {
                Some(inc) => increment_datetime_by_string(start, inc, index)?,
                None => start,
            };
            let end = match (increment, assignment.end) {
                (Some(inc), _) if assignment.interval => {
                    increment_datetime_by_string(start, inc, 1)?
                }
                (_, Some(TimePoint::Absolute(end))) => end,
                _ => start,
            };
            Ok(AbsoluteTime::new(start, end, timezone).into())
        }
        TimePoint::Relative(start) => {
            let unit = unit.ok_or_else(|| {
                TgisError::ValidationError("relative time needs a unit".to_string())
            })?;
            let unit = normalize_unit(unit)?;
            let step = increment
                .map(|inc| relative_increment(inc, unit))
                .transpose()?
                .unwrap_or(0);
            let overflow = || {
                TemporalError::InvalidTemporalBounds(format!(
                    "relative start {start} + {index} * {step} is out of range"
                ))
            };
            let start = step
                .checked_mul(index)
                .and_then(|offset| start.checked_add(offset))
                .ok_or_else(overflow)?;
            let end = match assignment.end {
                _ if assignment.interval => start.checked_add(step).ok_or_else(overflow)?,
                Some(TimePoint::Relative(end)) => end,
                _ => start,
            };
            Ok(RelativeTime::new(start, end, unit).into())
        }
    }
}

fn check_assignment(assignment: &TimeAssignment) -> TgisResult<()> {
    let invalid = |msg: &str| Err(TgisError::ValidationError(msg.to_string()));
    if assignment.end.is_some() && assignment.increment.is_some() {
        return invalid("end time and increment are mutually exclusive");
    }
    if assignment.end.is_some() && assignment.interval {
        return invalid("end time and interval are mutually exclusive");
    }
    if assignment.interval && assignment.increment.is_none() {
        return invalid("interval time stamps need an increment");
    }
    let start_type = assignment.start.temporal_type();
    if let Some(end) = assignment.end {
        if end.temporal_type() != start_type {
            return Err(TemporalError::TemporalTypeMismatch {
                expected: start_type.to_string(),
                found: end.temporal_type().to_string(),
            }
            .into());
        }
    }
    if let (TemporalType::Absolute, Some(increment)) = (start_type, &assignment.increment) {
        for part in increment.split(',') {
            check_granularity_string(part, TemporalType::Absolute)?;
        }
    }
    Ok(())
}

/// Register `map_ids` in order, first stamping each with valid time from
/// `assignment` when given. Returns the number of maps registered.
pub fn register_maps(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
    map_ids: &[DatasetId],
    assignment: Option<&TimeAssignment>,
    refresh: bool,
) -> TgisResult<usize> {
    let stds = load_stds(conn, stds_type, stds_id)?;
    let mut touched = BTreeSet::new();

    if let Some(assignment) = assignment {
        check_assignment(assignment)?;
        if assignment.start.temporal_type() != stds.temporal_type {
            return Err(TemporalError::TemporalTypeMismatch {
                expected: stds.temporal_type.to_string(),
                found: assignment.start.temporal_type().to_string(),
            }
            .into());
        }
        let unit = assignment.unit.as_deref().or(stds.relative_unit.as_deref());

        let mut stamped = Vec::with_capacity(map_ids.len());
        for (index, map_id) in (0_i64..).zip(map_ids) {
            let mut map = load_member_map(conn, stds_type, map_id)?;
            validation::validate_temporal_type_immutability(
                map.temporal_type(),
                stds.temporal_type,
            )?;
            let timezone = map.temporal.as_absolute().and_then(|t| t.timezone);
            map.temporal = assign_valid_time(assignment, index, unit, timezone)?;
            validation::validate_map(&map)?;
            stamped.push(map);
        }
        for map in stamped {
            touched.extend(write_retimed(conn, map)?);
        }
    }

    for map_id in map_ids {
        register::register_map(conn, stds_type, stds_id, map_id, false)?;
    }

    if refresh {
        touched.insert(stds_id.clone());
        for id in &touched {
            refresh::refresh_derived(conn, stds_type, id)?;
        }
    }
    info!(
        stds = %stds_id,
        maps = map_ids.len(),
        stamped = assignment.is_some(),
        "registered maps"
    );
    Ok(map_ids.len())
}

// ─── Shift and snap ─────────────────────────────────────────────────────────

/// Move every map of a dataset by `granularity`: `"<n> <unit>"` for
/// absolute time, `"<n>"` (optionally with the dataset's unit) for relative
/// time. `n` may be negative.
pub fn shift_stds(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
    granularity: &str,
) -> TgisResult<SpaceTimeDataset> {
    let stds = load_stds(conn, stds_type, stds_id)?;
    for part in granularity.split(',') {
        parse_shift(part, stds.temporal_type)?;
    }

    let maps = registered_maps(conn, stds_type, stds_id)?;
    let mut shifted = Vec::with_capacity(maps.len());
    for mut map in maps {
        map.temporal = match &map.temporal {
            TemporalExtent::Absolute(t) => AbsoluteTime::new(
                increment_datetime_by_string(t.start, granularity, 1)?,
                increment_datetime_by_string(t.end, granularity, 1)?,
                t.timezone,
            )
            .into(),
            TemporalExtent::Relative(t) => {
                let step = relative_increment(granularity, &t.unit)?;
                let moved = |v: i64| {
                    v.checked_add(step).ok_or_else(|| {
                        TemporalError::InvalidTemporalBounds(format!(
                            "relative time {v} + {step} is out of range"
                        ))
                    })
                };
                RelativeTime::new(moved(t.start)?, moved(t.end)?, t.unit.clone()).into()
            }
        };
        shifted.push(map);
    }

    let count = shifted.len();
    let stds = apply_retimed(conn, stds_type, stds_id, shifted)?;
    info!(stds = %stds_id, granularity, maps = count, "shifted space-time dataset");
    Ok(stds)
}

/// Snap the maps of a dataset into a gap-free sequence: each map ends
/// where the next one starts. Maps sharing a start keep their extent. A
/// trailing instant becomes an interval of the dataset's granularity.
pub fn snap_stds(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
) -> TgisResult<SpaceTimeDataset> {
    let stds = load_stds(conn, stds_type, stds_id)?;
    let maps = registered_maps(conn, stds_type, stds_id)?;
    let granularity = match &stds.granularity {
        Some(g) => Some(g.clone()),
        None => compute_granularity(stds.temporal_type, &maps)?,
    };

    let mut snapped = Vec::new();
    for (i, map) in maps.iter().enumerate() {
        let temporal = match maps.get(i + 1) {
            Some(next) => end_at_start_of(&map.temporal, &next.temporal),
            None => match granularity.as_deref() {
                Some(g) if map.temporal.is_instant() => close_instant(&map.temporal, g)?,
                _ => map.temporal.clone(),
            },
        };
        if temporal != map.temporal {
            let mut map = map.clone();
            map.temporal = temporal;
            snapped.push(map);
        }
    }

    let count = snapped.len();
    let stds = apply_retimed(conn, stds_type, stds_id, snapped)?;
    info!(stds = %stds_id, changed = count, "snapped space-time dataset");
    Ok(stds)
}

fn end_at_start_of(extent: &TemporalExtent, next: &TemporalExtent) -> TemporalExtent {
    match (extent, next) {
        (TemporalExtent::Absolute(t), TemporalExtent::Absolute(n)) if t.start != n.start => {
            AbsoluteTime::new(t.start, n.start, t.timezone).into()
        }
        (TemporalExtent::Relative(t), TemporalExtent::Relative(n)) if t.start != n.start => {
            RelativeTime::new(t.start, n.start, t.unit.clone()).into()
        }
        _ => extent.clone(),
    }
}

fn close_instant(extent: &TemporalExtent, granularity: &str) -> TgisResult<TemporalExtent> {
    Ok(match extent {
        TemporalExtent::Absolute(t) => AbsoluteTime::new(
            t.start,
            increment_datetime_by_string(t.start, granularity, 1)?,
            t.timezone,
        )
        .into(),
        TemporalExtent::Relative(t) => {
            let step = relative_increment(granularity, &t.unit)?;
            let end = t.start.checked_add(step).ok_or_else(|| {
                TemporalError::InvalidTemporalBounds(format!(
                    "relative time {} + {step} is out of range",
                    t.start
                ))
            })?;
            RelativeTime::new(t.start, end, t.unit.clone()).into()
        }
    })
}

/// Write re-timed maps of one dataset and refresh it together with every
/// other dataset those maps belong to.
fn apply_retimed(
    conn: &Connection,
    stds_type: StdsType,
    stds_id: &DatasetId,
    maps: Vec<MapDataset>,
) -> TgisResult<SpaceTimeDataset> {
    for map in &maps {
        validation::validate_map(map)?;
    }
    let mut touched = BTreeSet::new();
    for map in maps {
        touched.extend(write_retimed(conn, map)?);
    }
    touched.remove(stds_id);
    for other in &touched {
        refresh::refresh_derived(conn, stds_type, other)?;
    }
    refresh::refresh_derived(conn, stds_type, stds_id)
}

/// Store a map with new valid time. Returns the datasets it belongs to.
fn write_retimed(conn: &Connection, mut map: MapDataset) -> TgisResult<Vec<DatasetId>> {
    check_unit_in_datasets(conn, &map)?;
    map.base.modification_time = Local::now().naive_local();
    map.base.revision += 1;
    map_crud::update_map(conn, &map)?;
    debug!(map = %map.id(), "updated valid time");
    registered_datasets(conn, map.map_type, map.id())
}

// ─── Rename ─────────────────────────────────────────────────────────────────

/// Rename a space-time dataset within its mapset. The register table moves
/// to the new name and every member map lists the new id.
pub fn rename_stds(
    conn: &Connection,
    stds_type: StdsType,
    old_id: &DatasetId,
    new_id: &DatasetId,
) -> TgisResult<SpaceTimeDataset> {
    if old_id.mapset() != new_id.mapset() {
        return Err(TgisError::ValidationError(format!(
            "space-time dataset <{old_id}> can only be renamed within mapset {}",
            old_id.mapset()
        )));
    }
    let stds = load_stds(conn, stds_type, old_id)?;
    if old_id == new_id {
        return Ok(stds);
    }
    if base_ops::exists(conn, DatasetType::Stds(stds_type), new_id)? {
        return Err(TgisError::DatasetExists {
            id: new_id.to_string(),
        });
    }

    let mut renamed = stds.clone();
    renamed.base.id = new_id.clone();
    renamed.base.modification_time = Local::now().naive_local();
    renamed.base.revision += 1;
    renamed.map_register = None;
    let mut members = Vec::new();
    if let Some(table) = &stds.map_register {
        if register_ops::table_exists(conn, table)? {
            members = register_ops::list_members(conn, table)?;
            renamed.map_register = Some(register_ops::rename_register_table(
                conn,
                table,
                &stds_register_table(stds_type, new_id),
                new_id,
            )?);
        }
    }

    stds_crud::insert_stds(conn, &renamed)?;
    stds_crud::delete_stds(conn, stds_type, old_id)?;

    let map_type = stds_type.map_type();
    for map_id in &members {
        let Some(map) = map_crud::select_map(conn, map_type, map_id)? else {
            continue;
        };
        let Some(table) = map.stds_register else {
            continue;
        };
        register_ops::remove_member(conn, &table, old_id)?;
        if !register_ops::is_member(conn, &table, new_id)? {
            register_ops::add_member(conn, &table, new_id)?;
        }
    }

    let stds = refresh::refresh_derived(conn, stds_type, new_id)?;
    info!(from = %old_id, to = %new_id, maps = members.len(), "renamed space-time dataset");
    Ok(stds)
}
