//! Granularity of space-time datasets.
//!
//! A granularity is written `"<n> <unit>"`, e.g. `"1 day"` or `"6 hours"`.
//! The computed granularity of a map list is the greatest common divisor
//! of its interval lengths and the gaps between consecutive maps.

use chrono::{Datelike, Duration, Months, NaiveDateTime, Timelike};

use tgis_core::errors::{TemporalError, TgisResult};
use tgis_core::models::{
    AbsoluteTime, MapDataset, TemporalExtent, TemporalRelation, TemporalType,
};

use crate::relation::classify_interval;

const UNITS: [(&str, &str); 7] = [
    ("second", "seconds"),
    ("minute", "minutes"),
    ("hour", "hours"),
    ("day", "days"),
    ("week", "weeks"),
    ("month", "months"),
    ("year", "years"),
];

/// Seconds per unit, largest first, for the fixed-length units.
const FIXED_UNITS: [(&str, i64); 4] = [("day", 86_400), ("hour", 3_600), ("minute", 60), ("second", 1)];

const SECONDS_PER_WEEK: i64 = 604_800;

/// Map a singular or plural unit name to its plural form.
pub fn normalize_unit(unit: &str) -> TgisResult<&'static str> {
    let unit = unit.trim().to_ascii_lowercase();
    UNITS
        .iter()
        .find(|(singular, plural)| unit == *singular || unit == *plural)
        .map(|(_, plural)| *plural)
        .ok_or_else(|| TemporalError::InvalidGranularity(format!("unknown time unit {unit:?}")).into())
}

/// Parse `"<n> <unit>"`. Relative granularities may omit the unit.
pub fn parse_granularity(
    granularity: &str,
    temporal_type: TemporalType,
) -> TgisResult<(i64, Option<&'static str>)> {
    parse_count_and_unit(granularity, temporal_type, false)
}

/// Like [`parse_granularity`] but the count may be negative, for moving
/// maps back in time.
pub fn parse_shift(
    granularity: &str,
    temporal_type: TemporalType,
) -> TgisResult<(i64, Option<&'static str>)> {
    parse_count_and_unit(granularity, temporal_type, true)
}

fn parse_count_and_unit(
    granularity: &str,
    temporal_type: TemporalType,
    signed: bool,
) -> TgisResult<(i64, Option<&'static str>)> {
    let invalid = || {
        TemporalError::InvalidGranularity(format!(
            "{granularity:?} is not a valid {temporal_type} granularity"
        ))
    };
    let mut parts = granularity.split_whitespace();
    let count: i64 = parts
        .next()
        .and_then(|n| n.parse().ok())
        .filter(|n: &i64| if signed { *n != 0 } else { *n > 0 })
        .ok_or_else(invalid)?;
    let unit = parts.next().map(normalize_unit).transpose()?;
    if parts.next().is_some() {
        return Err(invalid().into());
    }
    match (temporal_type, unit) {
        (TemporalType::Absolute, None) => Err(invalid().into()),
        _ => Ok((count, unit)),
    }
}

/// Validate a granularity string for the given temporal type.
pub fn check_granularity_string(granularity: &str, temporal_type: TemporalType) -> TgisResult<()> {
    parse_granularity(granularity, temporal_type).map(|_| ())
}

/// `"1 day"`, `"3 days"`.
pub fn format_granularity(count: i64, unit: &str) -> String {
    let singular = UNITS
        .iter()
        .find(|(s, p)| unit == *s || unit == *p)
        .map_or(unit, |(s, _)| *s);
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while a != 0 {
        (a, b) = (b % a, a);
    }
    b
}

pub fn gcd_list(values: &[i64]) -> i64 {
    values.iter().copied().fold(0, gcd)
}

/// Granularity of a map list, `None` when there is nothing to measure.
pub fn compute_granularity(
    temporal_type: TemporalType,
    maps: &[MapDataset],
) -> TgisResult<Option<String>> {
    match temporal_type {
        TemporalType::Absolute => {
            let times = maps
                .iter()
                .map(|m| {
                    m.temporal.as_absolute().cloned().ok_or_else(|| {
                        TemporalError::TemporalTypeMismatch {
                            expected: TemporalType::Absolute.to_string(),
                            found: m.temporal_type().to_string(),
                        }
                        .into()
                    })
                })
                .collect::<TgisResult<Vec<_>>>()?;
            Ok(compute_absolute_granularity(&times))
        }
        TemporalType::Relative => compute_relative_granularity(maps),
    }
}

/// Relative granularity: the gcd of the integer interval lengths and gaps,
/// in the maps' common unit.
pub fn compute_relative_granularity(maps: &[MapDataset]) -> TgisResult<Option<String>> {
    let mut unit: Option<&'static str> = None;
    let mut times = Vec::with_capacity(maps.len());
    for map in maps {
        let TemporalExtent::Relative(t) = &map.temporal else {
            return Err(TemporalError::TemporalTypeMismatch {
                expected: TemporalType::Relative.to_string(),
                found: map.temporal_type().to_string(),
            }
            .into());
        };
        let map_unit = normalize_unit(&t.unit)?;
        match unit {
            Some(u) if u != map_unit => {
                return Err(TemporalError::UnitMismatch {
                    expected: u.to_string(),
                    found: map_unit.to_string(),
                }
                .into())
            }
            _ => unit = Some(map_unit),
        }
        times.push((t.start, t.end));
    }

    let lengths: Vec<i64> = spans(&mut times).iter().map(|(a, b)| b - a).collect();
    let granularity = gcd_list(&lengths);
    Ok(match (granularity, unit) {
        (0, _) | (_, None) => None,
        (g, Some(u)) => Some(format_granularity(g, u)),
    })
}

/// Sort `times` by start and return the proper interval lengths plus the
/// gaps between consecutive maps, as `(from, to)` pairs.
fn spans<T: Ord + Copy>(times: &mut [(T, T)]) -> Vec<(T, T)> {
    times.sort();
    let mut spans: Vec<(T, T)> = times
        .iter()
        .filter(|(start, end)| end > start)
        .copied()
        .collect();
    for pair in times.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if classify_interval(&next.0, &next.1, &prev.0, &prev.1) == Some(TemporalRelation::After) {
            spans.push((prev.1, next.0));
        }
    }
    spans
}

/// Absolute granularity.
///
/// When every boundary falls on the first of a month at midnight the
/// result is counted in months (or years if all steps are whole years).
/// Otherwise it is the gcd in seconds expressed in the largest fixed unit
/// (day, hour, minute, second) that divides it.
pub fn compute_absolute_granularity(times: &[AbsoluteTime]) -> Option<String> {
    let mut times: Vec<_> = times.iter().map(|t| (t.start, t.end)).collect();
    let spans = spans(&mut times);
    if spans.is_empty() {
        return None;
    }

    let calendar = spans
        .iter()
        .all(|(a, b)| is_month_start(a) && is_month_start(b));
    if calendar {
        let months: Vec<i64> = spans
            .iter()
            .map(|(a, b)| month_index(b) - month_index(a))
            .collect();
        let g = gcd_list(&months);
        return Some(if g % 12 == 0 {
            format_granularity(g / 12, "year")
        } else {
            format_granularity(g, "month")
        });
    }

    let seconds: Vec<i64> = spans.iter().map(|(a, b)| (*b - *a).num_seconds()).collect();
    let g = gcd_list(&seconds);
    if g == 0 {
        return None;
    }
    FIXED_UNITS
        .iter()
        .find(|(_, secs)| g % secs == 0)
        .map(|(unit, secs)| format_granularity(g / secs, unit))
}

/// Add `count` units to a timestamp. Months and years are calendar steps
/// that clamp to the last day of a shorter month.
pub fn increment_datetime(t: NaiveDateTime, count: i64, unit: &str) -> TgisResult<NaiveDateTime> {
    let unit = normalize_unit(unit)?;
    let overflow =
        || TemporalError::InvalidTemporalBounds(format!("{t} + {count} {unit} is out of range"));
    if unit == "months" || unit == "years" {
        let months = if unit == "years" {
            count.checked_mul(12).ok_or_else(overflow)?
        } else {
            count
        };
        let step = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| overflow())?);
        let shifted = if months >= 0 {
            t.checked_add_months(step)
        } else {
            t.checked_sub_months(step)
        };
        return shifted.ok_or_else(|| overflow().into());
    }

    let per_unit = match unit {
        "weeks" => SECONDS_PER_WEEK,
        _ => FIXED_UNITS
            .iter()
            .find(|(singular, _)| unit.starts_with(singular))
            .map_or(1, |(_, secs)| *secs),
    };
    let delta = count
        .checked_mul(per_unit)
        .and_then(Duration::try_seconds)
        .ok_or_else(overflow)?;
    t.checked_add_signed(delta).ok_or_else(|| overflow().into())
}

/// Add `mult` times an increment such as `"1 month"` or
/// `"1 month, 15 days"` to a timestamp. Parts are applied left to right.
pub fn increment_datetime_by_string(
    t: NaiveDateTime,
    increment: &str,
    mult: i64,
) -> TgisResult<NaiveDateTime> {
    let mut out = t;
    for part in increment.split(',') {
        let (count, unit) = parse_shift(part, TemporalType::Absolute)?;
        let count = count.checked_mul(mult).ok_or_else(|| {
            TemporalError::InvalidGranularity(format!("{increment:?} times {mult} overflows"))
        })?;
        if count == 0 {
            continue;
        }
        out = increment_datetime(out, count, unit.unwrap_or("days"))?;
    }
    Ok(out)
}

/// Integer increment of a relative granularity such as `"3"` or
/// `"3 days"`. A unit, when given, must match `unit`.
pub fn relative_increment(increment: &str, unit: &str) -> TgisResult<i64> {
    let (count, given) = parse_shift(increment, TemporalType::Relative)?;
    if let Some(given) = given {
        let expected = normalize_unit(unit)?;
        if given != expected {
            return Err(TemporalError::UnitMismatch {
                expected: expected.to_string(),
                found: given.to_string(),
            }
            .into());
        }
    }
    Ok(count)
}

fn is_month_start(t: &NaiveDateTime) -> bool {
    t.day() == 1 && t.num_seconds_from_midnight() == 0 && t.nanosecond() == 0
}

fn month_index(t: &NaiveDateTime) -> i64 {
    i64::from(t.year()) * 12 + i64::from(t.month0())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use tgis_core::models::{
        DatasetBase, DatasetId, MapMetadata, MapType, Projection, RelativeTime, SpatialExtent,
    };

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn rel_map(i: usize, start: i64, end: i64, unit: &str) -> MapDataset {
        MapDataset::new(
            DatasetBase::new(DatasetId::new(format!("r{i}"), "P").unwrap(), "t"),
            RelativeTime::new(start, end, unit).into(),
            SpatialExtent::new_2d(1.0, 0.0, 1.0, 0.0, Projection::XY),
            MapMetadata::empty(MapType::Raster),
        )
    }

    #[test]
    fn granularity_strings() {
        assert!(check_granularity_string("1 year", TemporalType::Absolute).is_ok());
        assert!(check_granularity_string("5 days", TemporalType::Absolute).is_ok());
        assert!(check_granularity_string("2 seconds", TemporalType::Absolute).is_ok());
        assert!(check_granularity_string("1 secondo", TemporalType::Absolute).is_err());
        assert!(check_granularity_string("bla second", TemporalType::Absolute).is_err());
        assert!(check_granularity_string("bla", TemporalType::Absolute).is_err());
        assert!(check_granularity_string("3", TemporalType::Absolute).is_err());
        assert!(check_granularity_string("1", TemporalType::Relative).is_ok());
        assert!(check_granularity_string("4 days", TemporalType::Relative).is_ok());
        assert!(check_granularity_string("bla", TemporalType::Relative).is_err());
        assert!(check_granularity_string("0 days", TemporalType::Absolute).is_err());
    }

    #[test]
    fn units_normalise_to_plural() {
        assert_eq!(normalize_unit("day").unwrap(), "days");
        assert_eq!(normalize_unit("Hours").unwrap(), "hours");
        assert!(normalize_unit("fortnight").is_err());
        assert_eq!(format_granularity(1, "days"), "1 day");
        assert_eq!(format_granularity(6, "hour"), "6 hours");
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(8, 12), 4);
        assert_eq!(gcd_list(&[8, 24, 12]), 4);
        assert_eq!(gcd_list(&[]), 0);
    }

    #[test]
    fn absolute_daily_series() {
        let times: Vec<_> = (0..5)
            .map(|i| {
                let s = dt(2001, 1, 1, 0) + Duration::days(i);
                AbsoluteTime::new(s, s + Duration::days(1), None)
            })
            .collect();
        assert_eq!(compute_absolute_granularity(&times).as_deref(), Some("1 day"));
    }

    #[test]
    fn absolute_gaps_count() {
        let times = vec![
            AbsoluteTime::new(dt(2001, 1, 1, 0), dt(2001, 1, 1, 6), None),
            AbsoluteTime::new(dt(2001, 1, 1, 12), dt(2001, 1, 1, 18), None),
        ];
        assert_eq!(compute_absolute_granularity(&times).as_deref(), Some("6 hours"));
    }

    #[test]
    fn absolute_instants_use_distance_between_points() {
        let times = vec![
            AbsoluteTime::instant(dt(2001, 1, 1, 0)),
            AbsoluteTime::instant(dt(2001, 1, 1, 3)),
            AbsoluteTime::instant(dt(2001, 1, 1, 9)),
        ];
        assert_eq!(compute_absolute_granularity(&times).as_deref(), Some("3 hours"));
        assert_eq!(compute_absolute_granularity(&times[..1]), None);
    }

    #[test]
    fn absolute_calendar_months_and_years() {
        let monthly = vec![
            AbsoluteTime::new(dt(2001, 1, 1, 0), dt(2001, 2, 1, 0), None),
            AbsoluteTime::new(dt(2001, 2, 1, 0), dt(2001, 3, 1, 0), None),
        ];
        assert_eq!(compute_absolute_granularity(&monthly).as_deref(), Some("1 month"));

        let yearly = vec![
            AbsoluteTime::new(dt(2001, 1, 1, 0), dt(2002, 1, 1, 0), None),
            AbsoluteTime::new(dt(2003, 1, 1, 0), dt(2004, 1, 1, 0), None),
        ];
        assert_eq!(compute_absolute_granularity(&yearly).as_deref(), Some("1 year"));
    }

    #[test]
    fn relative_points() {
        let maps: Vec<_> = [0, 8, 12, 24]
            .iter()
            .enumerate()
            .map(|(i, at)| rel_map(i, *at, *at, "minutes"))
            .collect();
        assert_eq!(
            compute_relative_granularity(&maps).unwrap().as_deref(),
            Some("4 minutes")
        );
    }

    #[test]
    fn relative_intervals_and_gaps() {
        // Lengths 2 and 4, gap 6: gcd 2.
        let maps = vec![rel_map(0, 0, 2, "days"), rel_map(1, 8, 12, "days")];
        assert_eq!(
            compute_relative_granularity(&maps).unwrap().as_deref(),
            Some("2 days")
        );
        // Consecutive unit intervals.
        let steps = vec![
            rel_map(0, 0, 1, "day"),
            rel_map(1, 1, 2, "day"),
            rel_map(2, 2, 3, "day"),
        ];
        assert_eq!(
            compute_relative_granularity(&steps).unwrap().as_deref(),
            Some("1 day")
        );
        // Adjacent intervals have no gap.
        let halves = vec![rel_map(0, 0, 3, "days"), rel_map(1, 3, 6, "days")];
        assert_eq!(
            compute_relative_granularity(&halves).unwrap().as_deref(),
            Some("3 days")
        );
    }

    #[test]
    fn relative_unit_mismatch() {
        let maps = vec![rel_map(0, 0, 0, "days"), rel_map(1, 2, 2, "hours")];
        assert!(matches!(
            compute_relative_granularity(&maps).unwrap_err(),
            tgis_core::TgisError::TemporalError(TemporalError::UnitMismatch { .. })
        ));
    }

    #[test]
    fn shifts_may_be_negative() {
        assert_eq!(
            parse_shift("-2 days", TemporalType::Absolute).unwrap(),
            (-2, Some("days"))
        );
        assert_eq!(parse_shift("-3", TemporalType::Relative).unwrap(), (-3, None));
        assert!(parse_shift("0 days", TemporalType::Absolute).is_err());
        assert!(parse_granularity("-2 days", TemporalType::Absolute).is_err());
    }

    #[test]
    fn calendar_increments() {
        let jan31 = dt(2001, 1, 31, 0);
        assert_eq!(increment_datetime(jan31, 1, "month").unwrap(), dt(2001, 2, 28, 0));
        assert_eq!(increment_datetime(jan31, 1, "year").unwrap(), dt(2002, 1, 31, 0));
        assert_eq!(increment_datetime(jan31, -2, "months").unwrap(), dt(2000, 11, 30, 0));
        assert_eq!(increment_datetime(jan31, 2, "weeks").unwrap(), dt(2001, 2, 14, 0));
        assert_eq!(increment_datetime(jan31, 6, "hours").unwrap(), dt(2001, 1, 31, 6));
        assert_eq!(
            increment_datetime(jan31, 90, "minutes").unwrap(),
            dt(2001, 1, 31, 1) + Duration::minutes(30)
        );
        assert!(increment_datetime(jan31, 1, "fortnight").is_err());
    }

    #[test]
    fn increments_by_string() {
        let start = dt(2001, 1, 1, 0);
        assert_eq!(
            increment_datetime_by_string(start, "1 month, 2 days", 1).unwrap(),
            dt(2001, 2, 3, 0)
        );
        assert_eq!(
            increment_datetime_by_string(start, "1 month", 12).unwrap(),
            dt(2002, 1, 1, 0)
        );
        assert_eq!(increment_datetime_by_string(start, "1 day", 0).unwrap(), start);
        assert!(increment_datetime_by_string(start, "1 month,", 1).is_err());
    }

    #[test]
    fn relative_increment_checks_unit() {
        assert_eq!(relative_increment("3", "days").unwrap(), 3);
        assert_eq!(relative_increment("3 day", "days").unwrap(), 3);
        assert!(relative_increment("3 hours", "days").is_err());
        assert!(relative_increment("1.5", "days").is_err());
    }
}
