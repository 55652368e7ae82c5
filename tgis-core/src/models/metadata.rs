//! Map-kind specific metadata.

use serde::{Deserialize, Serialize};

use super::{MapType, SpatialExtent};

/// Raster map metadata: grid geometry and value range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RasterMetadata {
    /// Cell type (`CELL`, `FCELL`, `DCELL`).
    pub datatype: Option<String>,
    pub cols: Option<i64>,
    pub rows: Option<i64>,
    pub number_of_cells: Option<i64>,
    pub nsres: Option<f64>,
    pub ewres: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RasterMetadata {
    /// Derive rows, cols and cell count from a region and its resolution.
    pub fn from_region(extent: &SpatialExtent, nsres: f64, ewres: f64) -> Self {
        let rows = grid_count(extent.height(), nsres);
        let cols = grid_count(extent.width(), ewres);
        Self {
            rows,
            cols,
            number_of_cells: rows.zip(cols).map(|(r, c)| r * c),
            nsres: Some(nsres),
            ewres: Some(ewres),
            ..Default::default()
        }
    }
}

/// 3D raster metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Raster3dMetadata {
    pub datatype: Option<String>,
    pub cols: Option<i64>,
    pub rows: Option<i64>,
    pub depths: Option<i64>,
    pub number_of_cells: Option<i64>,
    pub nsres: Option<f64>,
    pub ewres: Option<f64>,
    pub tbres: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Raster3dMetadata {
    pub fn from_region(extent: &SpatialExtent, nsres: f64, ewres: f64, tbres: f64) -> Self {
        let rows = grid_count(extent.height(), nsres);
        let cols = grid_count(extent.width(), ewres);
        let depths = grid_count(extent.top - extent.bottom, tbres);
        Self {
            rows,
            cols,
            depths,
            number_of_cells: match (rows, cols, depths) {
                (Some(r), Some(c), Some(d)) => Some(r * c * d),
                _ => None,
            },
            nsres: Some(nsres),
            ewres: Some(ewres),
            tbres: Some(tbres),
            ..Default::default()
        }
    }
}

/// Vector maps carry no extra metadata in the temporal database.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VectorMetadata {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapMetadata {
    Raster(RasterMetadata),
    Raster3d(Raster3dMetadata),
    Vector(VectorMetadata),
}

impl MapMetadata {
    /// Metadata with every field unset.
    pub fn empty(map_type: MapType) -> Self {
        match map_type {
            MapType::Raster => MapMetadata::Raster(RasterMetadata::default()),
            MapType::Raster3d => MapMetadata::Raster3d(Raster3dMetadata::default()),
            MapType::Vector => MapMetadata::Vector(VectorMetadata::default()),
        }
    }

    pub fn map_type(&self) -> MapType {
        match self {
            MapMetadata::Raster(_) => MapType::Raster,
            MapMetadata::Raster3d(_) => MapType::Raster3d,
            MapMetadata::Vector(_) => MapType::Vector,
        }
    }
}

fn grid_count(length: f64, res: f64) -> Option<i64> {
    if res > 0.0 && length.is_finite() {
        Some((length / res).round() as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Projection;

    #[test]
    fn raster_grid_from_region() {
        let region = SpatialExtent::new_2d(100.0, 0.0, 50.0, 0.0, Projection::XY);
        let meta = RasterMetadata::from_region(&region, 10.0, 5.0);
        assert_eq!(meta.rows, Some(10));
        assert_eq!(meta.cols, Some(10));
        assert_eq!(meta.number_of_cells, Some(100));
    }

    #[test]
    fn raster3d_grid_from_region() {
        let region = SpatialExtent::new(100.0, 0.0, 50.0, 0.0, 20.0, 0.0, Projection::XY);
        let meta = Raster3dMetadata::from_region(&region, 10.0, 10.0, 5.0);
        assert_eq!(meta.depths, Some(4));
        assert_eq!(meta.number_of_cells, Some(10 * 5 * 4));
    }

    #[test]
    fn zero_resolution_leaves_counts_unset() {
        let region = SpatialExtent::new_2d(1.0, 0.0, 1.0, 0.0, Projection::XY);
        let meta = RasterMetadata::from_region(&region, 0.0, 1.0);
        assert_eq!(meta.rows, None);
        assert_eq!(meta.number_of_cells, None);
    }
}
