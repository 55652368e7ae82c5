//! Builders for maps and space-time datasets used across test suites.

use chrono::{NaiveDate, NaiveDateTime};

use tgis_core::models::{
    AbsoluteTime, DatasetBase, DatasetId, MapDataset, MapMetadata, MapType, Projection,
    Raster3dMetadata, RasterMetadata, RelativeTime, SpaceTimeDataset, SpatialExtent, StdsType,
    TemporalExtent, TemporalType, VectorMetadata,
};

pub const MAPSET: &str = "PERMANENT";
pub const CREATOR: &str = "tester";

/// `name@PERMANENT`.
pub fn id(name: &str) -> DatasetId {
    DatasetId::new(name, MAPSET).expect("fixture names are valid")
}

/// Midnight on the given day.
pub fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("fixture dates are valid")
}

pub fn absolute(start: NaiveDateTime, end: NaiveDateTime) -> TemporalExtent {
    AbsoluteTime::new(start, end, None).into()
}

pub fn relative(start: i64, end: i64, unit: &str) -> TemporalExtent {
    RelativeTime::new(start, end, unit).into()
}

pub fn relative_instant(at: i64, unit: &str) -> TemporalExtent {
    RelativeTime::instant(at, unit).into()
}

/// 100 x 100 cell region in `XY` with 10 m resolution.
pub fn region() -> SpatialExtent {
    SpatialExtent::new(1000.0, 0.0, 1000.0, 0.0, 100.0, 0.0, Projection::XY)
}

/// Builder for map datasets with sensible defaults.
pub struct MapBuilder {
    map_type: MapType,
    id: DatasetId,
    temporal: TemporalExtent,
    spatial: SpatialExtent,
    range: Option<(f64, f64)>,
}

impl MapBuilder {
    pub fn new(map_type: MapType, name: &str) -> Self {
        Self {
            map_type,
            id: id(name),
            temporal: absolute(day(2001, 1, 1), day(2001, 1, 2)),
            spatial: region(),
            range: None,
        }
    }

    pub fn mapset(mut self, mapset: &str) -> Self {
        self.id = DatasetId::new(self.id.name(), mapset).expect("fixture names are valid");
        self
    }

    pub fn temporal(mut self, temporal: TemporalExtent) -> Self {
        self.temporal = temporal;
        self
    }

    pub fn spatial(mut self, spatial: SpatialExtent) -> Self {
        self.spatial = spatial;
        self
    }

    /// Cell value range, raster kinds only.
    pub fn values(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn build(self) -> MapDataset {
        let metadata = match self.map_type {
            MapType::Raster => {
                let mut meta = RasterMetadata::from_region(&self.spatial, 10.0, 10.0);
                meta.datatype = Some("DCELL".to_string());
                meta.min = self.range.map(|r| r.0);
                meta.max = self.range.map(|r| r.1);
                MapMetadata::Raster(meta)
            }
            MapType::Raster3d => {
                let mut meta = Raster3dMetadata::from_region(&self.spatial, 10.0, 10.0, 10.0);
                meta.datatype = Some("DCELL".to_string());
                meta.min = self.range.map(|r| r.0);
                meta.max = self.range.map(|r| r.1);
                MapMetadata::Raster3d(meta)
            }
            MapType::Vector => MapMetadata::Vector(VectorMetadata::default()),
        };
        MapDataset::new(
            DatasetBase::new(self.id, CREATOR),
            self.temporal,
            self.spatial,
            metadata,
        )
    }
}

pub fn raster(name: &str, start: NaiveDateTime, end: NaiveDateTime) -> MapDataset {
    MapBuilder::new(MapType::Raster, name)
        .temporal(absolute(start, end))
        .build()
}

pub fn stds(stds_type: StdsType, name: &str, temporal_type: TemporalType) -> SpaceTimeDataset {
    let mut stds = SpaceTimeDataset::new(
        stds_type,
        DatasetBase::new(id(name), CREATOR),
        temporal_type,
        "mean",
    );
    stds.title = Some(format!("{name} series"));
    stds
}

pub fn strds(name: &str) -> SpaceTimeDataset {
    stds(StdsType::Strds, name, TemporalType::Absolute)
}

/// `count` consecutive daily rasters starting 2001-01-01.
pub fn daily_rasters(prefix: &str, count: u32) -> Vec<MapDataset> {
    (0..count)
        .map(|i| {
            let start = day(2001, 1, 1) + chrono::Duration::days(i64::from(i));
            raster(
                &format!("{prefix}_{i}"),
                start,
                start + chrono::Duration::days(1),
            )
        })
        .collect()
}
