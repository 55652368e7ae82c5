//! Temporal topology of a map list.
//!
//! Functions take maps ordered by start (see [`sort_by_start`]) and look at
//! each map relative to its predecessors.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use tgis_core::models::{
    AbsoluteTime, MapDataset, RelativeTime, TemporalExtent, TemporalRelation, TimelineEntry,
};

use crate::relation::temporal_relation;

/// Kind of valid time found in a map list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTime {
    /// Only time instants.
    Point,
    /// Only proper intervals.
    Interval,
    Mixed,
    /// No maps.
    Invalid,
}

impl MapTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapTime::Point => "point",
            MapTime::Interval => "interval",
            MapTime::Mixed => "mixed",
            MapTime::Invalid => "invalid",
        }
    }
}

impl fmt::Display for MapTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order maps by start, then end. Absolute maps sort before relative ones.
pub fn sort_by_start(maps: &mut [MapDataset]) {
    maps.sort_by(|a, b| compare_start(&a.temporal, &b.temporal));
}

fn compare_start(a: &TemporalExtent, b: &TemporalExtent) -> Ordering {
    match (a, b) {
        (TemporalExtent::Absolute(a), TemporalExtent::Absolute(b)) => {
            a.start.cmp(&b.start).then(a.end.cmp(&b.end))
        }
        (TemporalExtent::Relative(a), TemporalExtent::Relative(b)) => {
            a.start.cmp(&b.start).then(a.end.cmp(&b.end))
        }
        (TemporalExtent::Absolute(_), TemporalExtent::Relative(_)) => Ordering::Less,
        (TemporalExtent::Relative(_), TemporalExtent::Absolute(_)) => Ordering::Greater,
    }
}

/// `matrix[i][j]` is the relation of map `i` to map `j`.
pub fn relation_matrix(maps: &[MapDataset]) -> Vec<Vec<Option<TemporalRelation>>> {
    maps.iter()
        .map(|a| {
            maps.iter()
                .map(|b| temporal_relation(&a.temporal, &b.temporal))
                .collect()
        })
        .collect()
}

/// Count the relations of every map to the maps that follow it.
///
/// The scan from map `i` stops at the first later map that follows or is
/// after it; later maps cannot relate to `i` in any other way.
pub fn count_relations(maps: &[MapDataset]) -> BTreeMap<TemporalRelation, usize> {
    let mut counts = BTreeMap::new();
    for (i, earlier) in maps.iter().enumerate() {
        for later in &maps[i + 1..] {
            let Some(relation) = temporal_relation(&later.temporal, &earlier.temporal) else {
                continue;
            };
            *counts.entry(relation).or_insert(0) += 1;
            if matches!(relation, TemporalRelation::Follows | TemporalRelation::After) {
                break;
            }
        }
    }
    counts
}

/// Number of gaps between temporal neighbours.
pub fn count_gaps(maps: &[MapDataset]) -> usize {
    maps.windows(2)
        .filter(|w| {
            temporal_relation(&w[1].temporal, &w[0].temporal) == Some(TemporalRelation::After)
        })
        .count()
}

/// Interleave the maps with the gaps between temporal neighbours. A gap
/// runs from the end of one map to the start of the next.
pub fn with_gaps(maps: Vec<MapDataset>) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(maps.len() * 2);
    let mut previous: Option<TemporalExtent> = None;
    for map in maps {
        if let Some(prev) = &previous {
            if temporal_relation(&map.temporal, prev) == Some(TemporalRelation::After) {
                if let Some(gap) = gap_between(prev, &map.temporal) {
                    entries.push(TimelineEntry::Gap(gap));
                }
            }
        }
        previous = Some(map.temporal.clone());
        entries.push(TimelineEntry::Map(Box::new(map)));
    }
    entries
}

fn gap_between(earlier: &TemporalExtent, later: &TemporalExtent) -> Option<TemporalExtent> {
    match (earlier, later) {
        (TemporalExtent::Absolute(a), TemporalExtent::Absolute(b)) => {
            Some(AbsoluteTime::new(a.end, b.start, a.timezone).into())
        }
        (TemporalExtent::Relative(a), TemporalExtent::Relative(b)) => {
            Some(RelativeTime::new(a.end, b.start, a.unit.clone()).into())
        }
        _ => None,
    }
}

pub fn map_time(maps: &[MapDataset]) -> MapTime {
    let points = maps.iter().filter(|m| m.temporal.is_instant()).count();
    match (points, maps.len()) {
        (_, 0) => MapTime::Invalid,
        (p, n) if p == n => MapTime::Point,
        (0, _) => MapTime::Interval,
        _ => MapTime::Mixed,
    }
}

/// True when no two maps share time.
///
/// Interval and mixed lists may only contain `after`, `before`, `follows`
/// and `precedes`. Point lists may not contain `equivalent`.
pub fn check_temporal_topology(maps: &[MapDataset]) -> bool {
    let relations = count_relations(maps);
    match map_time(maps) {
        MapTime::Interval | MapTime::Mixed => relations.keys().all(|r| {
            matches!(
                r,
                TemporalRelation::After
                    | TemporalRelation::Before
                    | TemporalRelation::Follows
                    | TemporalRelation::Precedes
            )
        }),
        MapTime::Point => !relations.contains_key(&TemporalRelation::Equivalent),
        MapTime::Invalid => false,
    }
}
