//! Map datasets and space-time datasets.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{
    DatasetId, MapMetadata, MapType, SpatialExtent, StdsType, TemporalExtent, TemporalType,
};

/// Identity and bookkeeping shared by every dataset kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetBase {
    pub id: DatasetId,
    pub creator: String,
    pub creation_time: NaiveDateTime,
    pub modification_time: NaiveDateTime,
    /// Starts at 1, incremented on every update.
    pub revision: i64,
}

impl DatasetBase {
    pub fn new(id: DatasetId, creator: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        Self {
            id,
            creator: creator.into(),
            creation_time: now,
            modification_time: now,
            revision: 1,
        }
    }
}

/// A raster, 3D raster or vector map known to the temporal database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDataset {
    pub map_type: MapType,
    pub base: DatasetBase,
    pub temporal: TemporalExtent,
    pub spatial: SpatialExtent,
    pub metadata: MapMetadata,
    /// Register table listing the space-time datasets this map belongs to.
    pub stds_register: Option<String>,
}

impl MapDataset {
    pub fn new(
        base: DatasetBase,
        temporal: TemporalExtent,
        spatial: SpatialExtent,
        metadata: MapMetadata,
    ) -> Self {
        Self {
            map_type: metadata.map_type(),
            base,
            temporal,
            spatial,
            metadata,
            stds_register: None,
        }
    }

    pub fn id(&self) -> &DatasetId {
        &self.base.id
    }

    pub fn temporal_type(&self) -> TemporalType {
        self.temporal.temporal_type()
    }
}

/// Time span covered by the maps of a space-time dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemporalRange {
    Absolute {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Relative {
        start: i64,
        end: i64,
    },
}

/// Values derived from the registered maps. Recomputed on read, never
/// authoritative.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StdsDerived {
    pub number_of_maps: i64,
    pub temporal_range: Option<TemporalRange>,
    pub spatial: Option<SpatialExtent>,
    pub min_min: Option<f64>,
    pub min_max: Option<f64>,
    pub max_min: Option<f64>,
    pub max_max: Option<f64>,
    pub nsres_min: Option<f64>,
    pub nsres_max: Option<f64>,
    pub ewres_min: Option<f64>,
    pub ewres_max: Option<f64>,
    pub tbres_min: Option<f64>,
    pub tbres_max: Option<f64>,
}

/// A named, typed collection of time-stamped maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceTimeDataset {
    pub stds_type: StdsType,
    pub base: DatasetBase,
    pub semantic_type: String,
    pub temporal_type: TemporalType,
    /// `"<n> <unit>"`, e.g. `"1 day"`.
    pub granularity: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Unit shared by the member maps of a relative dataset. Set by the
    /// first registration and kept when the dataset is emptied.
    pub relative_unit: Option<String>,
    /// Register table listing the member maps.
    pub map_register: Option<String>,
    pub derived: StdsDerived,
}

impl SpaceTimeDataset {
    pub fn new(
        stds_type: StdsType,
        base: DatasetBase,
        temporal_type: TemporalType,
        semantic_type: impl Into<String>,
    ) -> Self {
        Self {
            stds_type,
            base,
            semantic_type: semantic_type.into(),
            temporal_type,
            granularity: None,
            title: None,
            description: None,
            relative_unit: None,
            map_register: None,
            derived: StdsDerived::default(),
        }
    }

    pub fn id(&self) -> &DatasetId {
        &self.base.id
    }

    pub fn map_type(&self) -> MapType {
        self.stds_type.map_type()
    }
}

/// One row of a gap-aware map listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineEntry {
    Map(Box<MapDataset>),
    /// Unregistered time between two maps.
    Gap(TemporalExtent),
}

impl TimelineEntry {
    pub fn temporal(&self) -> &TemporalExtent {
        match self {
            TimelineEntry::Map(map) => &map.temporal,
            TimelineEntry::Gap(extent) => extent,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, TimelineEntry::Gap(_))
    }
}
