//! Validation rules for extents and datasets.

use tgis_core::errors::{TemporalError, TgisError, TgisResult};
use tgis_core::models::{
    AbsoluteTime, MapDataset, Projection, RelativeTime, SpaceTimeDataset, SpatialExtent,
    TemporalExtent, TemporalType,
};

use crate::granularity::{check_granularity_string, normalize_unit};

/// Validate absolute bounds: `start <= end`, timezone within `-12..=14`.
///
/// `start == end` is a time instant and valid.
pub fn validate_absolute_time(time: &AbsoluteTime) -> TgisResult<()> {
    if time.start > time.end {
        return Err(TemporalError::InvalidTemporalBounds(format!(
            "start ({}) must be <= end ({})",
            time.start, time.end
        ))
        .into());
    }
    if let Some(tz) = time.timezone {
        if !(-12..=14).contains(&tz) {
            return Err(TemporalError::InvalidTemporalBounds(format!(
                "timezone offset {tz} outside -12..=14"
            ))
            .into());
        }
    }
    Ok(())
}

/// Validate a relative time: `start <= end` and a known unit.
pub fn validate_relative_time(time: &RelativeTime) -> TgisResult<()> {
    if time.start > time.end {
        return Err(TemporalError::InvalidTemporalBounds(format!(
            "relative start ({}) must be <= end ({})",
            time.start, time.end
        ))
        .into());
    }
    normalize_unit(&time.unit)?;
    Ok(())
}

pub fn validate_temporal_extent(extent: &TemporalExtent) -> TgisResult<()> {
    match extent {
        TemporalExtent::Absolute(t) => validate_absolute_time(t),
        TemporalExtent::Relative(t) => validate_relative_time(t),
    }
}

/// Validate a bounding box.
///
/// `north >= south` and `top >= bottom` always hold. `XY` needs
/// `east >= west`; `LL` accepts `east < west` across the antimeridian but
/// bounds latitudes to `[-90, 90]` and longitudes to `[-360, 360]`.
pub fn validate_spatial_extent(extent: &SpatialExtent) -> TgisResult<()> {
    let values = [
        extent.north,
        extent.south,
        extent.east,
        extent.west,
        extent.top,
        extent.bottom,
    ];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(invalid_extent("coordinates must be finite"));
    }
    if extent.north < extent.south {
        return Err(invalid_extent(format!(
            "north ({}) must be >= south ({})",
            extent.north, extent.south
        )));
    }
    if extent.top < extent.bottom {
        return Err(invalid_extent(format!(
            "top ({}) must be >= bottom ({})",
            extent.top, extent.bottom
        )));
    }
    match extent.proj {
        Projection::XY => {
            if extent.east < extent.west {
                return Err(invalid_extent(format!(
                    "east ({}) must be >= west ({})",
                    extent.east, extent.west
                )));
            }
        }
        Projection::LL => {
            for lat in [extent.north, extent.south] {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(invalid_extent(format!("latitude {lat} outside [-90, 90]")));
                }
            }
            for lon in [extent.east, extent.west] {
                if !(-360.0..=360.0).contains(&lon) {
                    return Err(invalid_extent(format!(
                        "longitude {lon} outside [-360, 360]"
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Validate a map before it is written.
pub fn validate_map(map: &MapDataset) -> TgisResult<()> {
    if map.metadata.map_type() != map.map_type {
        return Err(TgisError::ValidationError(format!(
            "{} map <{}> carries {} metadata",
            map.map_type,
            map.id(),
            map.metadata.map_type()
        )));
    }
    validate_temporal_extent(&map.temporal)?;
    validate_spatial_extent(&map.spatial)
}

/// Validate a space-time dataset before it is written.
pub fn validate_stds(stds: &SpaceTimeDataset) -> TgisResult<()> {
    if stds.semantic_type.trim().is_empty() {
        return Err(TgisError::ValidationError(format!(
            "space-time dataset <{}> needs a semantic type",
            stds.id()
        )));
    }
    if let Some(granularity) = &stds.granularity {
        check_granularity_string(granularity, stds.temporal_type)?;
    }
    if let Some(unit) = &stds.relative_unit {
        if stds.temporal_type != TemporalType::Relative {
            return Err(TgisError::ValidationError(format!(
                "{} dataset <{}> cannot carry a relative unit",
                stds.temporal_type,
                stds.id()
            )));
        }
        normalize_unit(unit)?;
    }
    Ok(())
}

/// A dataset keeps its temporal type for its lifetime.
pub fn validate_temporal_type_immutability(
    old: TemporalType,
    new: TemporalType,
) -> TgisResult<()> {
    if old != new {
        return Err(TemporalError::ImmutableFieldViolation(format!(
            "temporal type cannot be modified (was {old}, attempted {new})"
        ))
        .into());
    }
    Ok(())
}

fn invalid_extent(msg: impl Into<String>) -> TgisError {
    TgisError::ValidationError(format!("invalid spatial extent: {}", msg.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2001, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn absolute_bounds() {
        assert!(validate_absolute_time(&AbsoluteTime::new(ts(1), ts(2), None)).is_ok());
        assert!(validate_absolute_time(&AbsoluteTime::instant(ts(1))).is_ok());
        let err = validate_absolute_time(&AbsoluteTime::new(ts(2), ts(1), None)).unwrap_err();
        assert!(matches!(
            err,
            TgisError::TemporalError(TemporalError::InvalidTemporalBounds(_))
        ));
        assert!(validate_absolute_time(&AbsoluteTime::new(ts(1), ts(2), Some(15))).is_err());
    }

    #[test]
    fn relative_time() {
        assert!(validate_relative_time(&RelativeTime::new(3, 3, "day")).is_ok());
        assert!(validate_relative_time(&RelativeTime::new(-4, 2, "days")).is_ok());
        assert!(validate_relative_time(&RelativeTime::new(5, 2, "days")).is_err());
        assert!(validate_relative_time(&RelativeTime::new(1, 2, "fortnights")).is_err());
    }

    #[test]
    fn xy_extent() {
        let ok = SpatialExtent::new_2d(10.0, 0.0, 10.0, 0.0, Projection::XY);
        assert!(validate_spatial_extent(&ok).is_ok());
        let flipped = SpatialExtent::new_2d(10.0, 0.0, 0.0, 10.0, Projection::XY);
        assert!(validate_spatial_extent(&flipped).is_err());
        let upside_down = SpatialExtent::new_2d(0.0, 10.0, 10.0, 0.0, Projection::XY);
        assert!(validate_spatial_extent(&upside_down).is_err());
    }

    #[test]
    fn ll_extent_may_cross_antimeridian() {
        let pacific = SpatialExtent::new_2d(10.0, -10.0, -170.0, 170.0, Projection::LL);
        assert!(validate_spatial_extent(&pacific).is_ok());
        let bad_lat = SpatialExtent::new_2d(95.0, 0.0, 10.0, 0.0, Projection::LL);
        assert!(validate_spatial_extent(&bad_lat).is_err());
        let bad_lon = SpatialExtent::new_2d(10.0, 0.0, 400.0, 0.0, Projection::LL);
        assert!(validate_spatial_extent(&bad_lon).is_err());
    }

    #[test]
    fn temporal_type_is_immutable() {
        assert!(
            validate_temporal_type_immutability(TemporalType::Absolute, TemporalType::Absolute)
                .is_ok()
        );
        let err =
            validate_temporal_type_immutability(TemporalType::Absolute, TemporalType::Relative)
                .unwrap_err();
        assert!(matches!(
            err,
            TgisError::TemporalError(TemporalError::ImmutableFieldViolation(_))
        ));
    }
}
