//! Bounding boxes of maps and space-time datasets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TgisError;

/// Coordinate system family of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    /// Planar coordinates.
    XY,
    /// Latitude/longitude; longitudes may wrap at the antimeridian.
    LL,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::XY => "XY",
            Projection::LL => "LL",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Projection {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XY" | "xy" => Ok(Projection::XY),
            "LL" | "ll" => Ok(Projection::LL),
            other => Err(TgisError::ValidationError(format!(
                "unknown projection tag: {other}"
            ))),
        }
    }
}

/// Six-sided bounding box plus projection tag.
///
/// In `LL` an extent with `east < west` crosses the antimeridian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub top: f64,
    pub bottom: f64,
    pub proj: Projection,
}

impl SpatialExtent {
    pub fn new(
        north: f64,
        south: f64,
        east: f64,
        west: f64,
        top: f64,
        bottom: f64,
        proj: Projection,
    ) -> Self {
        Self {
            north,
            south,
            east,
            west,
            top,
            bottom,
            proj,
        }
    }

    /// Extent with `top = bottom = 0`.
    pub fn new_2d(north: f64, south: f64, east: f64, west: f64, proj: Projection) -> Self {
        Self::new(north, south, east, west, 0.0, 0.0, proj)
    }

    /// East-west extent, unwrapped across the antimeridian for `LL`.
    pub fn width(&self) -> f64 {
        if self.proj == Projection::LL && self.east < self.west {
            self.east + 360.0 - self.west
        } else {
            self.east - self.west
        }
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn area_2d(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when the two extents share a region of positive area.
    /// Touching edges do not count.
    pub fn overlaps_2d(&self, other: &SpatialExtent) -> bool {
        if self.proj != other.proj {
            return false;
        }
        if self.south >= other.north || other.south >= self.north {
            return false;
        }
        let (a0, a1) = self.lon_range();
        let (b0, b1) = other.lon_range();
        self.lon_shifts()
            .iter()
            .any(|shift| a0 < b1 + shift && b0 + shift < a1)
    }

    /// True when `other` lies inside this extent (edges inclusive).
    pub fn contains_2d(&self, other: &SpatialExtent) -> bool {
        if self.proj != other.proj {
            return false;
        }
        if other.north > self.north || other.south < self.south {
            return false;
        }
        let (a0, a1) = self.lon_range();
        let (b0, b1) = other.lon_range();
        self.lon_shifts()
            .iter()
            .any(|shift| a0 <= b0 + shift && b1 + shift <= a1)
    }

    /// Smallest extent covering both, `None` for differing projections.
    pub fn union(&self, other: &SpatialExtent) -> Option<SpatialExtent> {
        if self.proj != other.proj {
            return None;
        }
        let north = self.north.max(other.north);
        let south = self.south.min(other.south);
        let top = self.top.max(other.top);
        let bottom = self.bottom.min(other.bottom);

        let (east, west) = match self.proj {
            Projection::XY => (self.east.max(other.east), self.west.min(other.west)),
            Projection::LL => {
                let (a0, a1) = self.lon_range();
                let (b0, b1) = other.lon_range();
                // Place `other` where the covering range is narrowest.
                let (start, end) = [-360.0, 0.0, 360.0]
                    .into_iter()
                    .map(|shift| (a0.min(b0 + shift), a1.max(b1 + shift)))
                    .min_by(|x, y| (x.1 - x.0).total_cmp(&(y.1 - y.0)))
                    .unwrap_or((a0.min(b0), a1.max(b1)));
                if end - start >= 360.0 {
                    (180.0, -180.0)
                } else {
                    (wrap_longitude(end), wrap_longitude(start))
                }
            }
        };

        Some(SpatialExtent::new(north, south, east, west, top, bottom, self.proj))
    }

    fn lon_range(&self) -> (f64, f64) {
        (self.west, self.west + self.width())
    }

    fn lon_shifts(&self) -> &'static [f64] {
        match self.proj {
            Projection::XY => &[0.0],
            Projection::LL => &[-360.0, 0.0, 360.0],
        }
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xy_overlap_excludes_touching_edges() {
        let a = SpatialExtent::new_2d(10.0, 0.0, 10.0, 0.0, Projection::XY);
        let b = SpatialExtent::new_2d(10.0, 0.0, 20.0, 10.0, Projection::XY);
        let c = SpatialExtent::new_2d(5.0, -5.0, 15.0, 5.0, Projection::XY);
        assert!(!a.overlaps_2d(&b));
        assert!(a.overlaps_2d(&c));
        assert!(c.overlaps_2d(&b));
    }

    #[test]
    fn ll_extent_across_antimeridian() {
        let pacific = SpatialExtent::new_2d(10.0, -10.0, -170.0, 170.0, Projection::LL);
        assert_eq!(pacific.width(), 20.0);
        assert_eq!(pacific.area_2d(), 400.0);
        let fiji = SpatialExtent::new_2d(-5.0, -15.0, -178.0, 177.0, Projection::LL);
        assert!(pacific.overlaps_2d(&fiji));
        let east_part = SpatialExtent::new_2d(5.0, 0.0, -172.0, -175.0, Projection::LL);
        assert!(pacific.contains_2d(&east_part));
    }

    #[test]
    fn union_covers_both() {
        let a = SpatialExtent::new(10.0, 0.0, 10.0, 0.0, 5.0, 0.0, Projection::XY);
        let b = SpatialExtent::new(20.0, 5.0, 30.0, -5.0, 2.0, -1.0, Projection::XY);
        let u = a.union(&b).unwrap();
        assert_eq!(u, SpatialExtent::new(20.0, 0.0, 30.0, -5.0, 5.0, -1.0, Projection::XY));
        assert!(u.contains_2d(&a) && u.contains_2d(&b));
    }

    #[test]
    fn ll_union_wraps() {
        let a = SpatialExtent::new_2d(10.0, 0.0, 180.0, 170.0, Projection::LL);
        let b = SpatialExtent::new_2d(10.0, 0.0, -170.0, -180.0, Projection::LL);
        let u = a.union(&b).unwrap();
        assert_eq!(u.west, 170.0);
        assert_eq!(u.east, -170.0);
        assert_eq!(u.width(), 20.0);
    }

    #[test]
    fn ll_union_takes_the_narrow_side() {
        let a = SpatialExtent::new_2d(10.0, 0.0, 10.0, -10.0, Projection::LL);
        let b = SpatialExtent::new_2d(10.0, 0.0, 179.0, 170.0, Projection::LL);
        for u in [a.union(&b).unwrap(), b.union(&a).unwrap()] {
            assert_eq!(u.west, -10.0);
            assert_eq!(u.east, 179.0);
            assert_eq!(u.width(), 189.0);
        }
    }

    #[test]
    fn union_rejects_mixed_projections() {
        let a = SpatialExtent::new_2d(1.0, 0.0, 1.0, 0.0, Projection::XY);
        let b = SpatialExtent::new_2d(1.0, 0.0, 1.0, 0.0, Projection::LL);
        assert!(a.union(&b).is_none());
    }
}
