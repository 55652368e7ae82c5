//! Absolute and relative temporal extents.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::TgisError;

/// Whether a dataset is stamped with calendar time or with a plain number.
///
/// Fixed for the lifetime of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalType {
    Absolute,
    Relative,
}

impl TemporalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalType::Absolute => "absolute",
            TemporalType::Relative => "relative",
        }
    }
}

impl fmt::Display for TemporalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemporalType {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(TemporalType::Absolute),
            "relative" => Ok(TemporalType::Relative),
            other => Err(TgisError::InvalidType {
                type_name: other.to_string(),
            }),
        }
    }
}

/// Calendar valid time `[start, end]`.
///
/// A time instant is stored as `start == end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteTime {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Hour offset from UTC.
    pub timezone: Option<i32>,
}

impl AbsoluteTime {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, timezone: Option<i32>) -> Self {
        Self {
            start,
            end,
            timezone,
        }
    }

    pub fn instant(at: NaiveDateTime) -> Self {
        Self::new(at, at, None)
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}

/// Relative valid time `[start, end]` on an integer time axis.
///
/// As with [`AbsoluteTime`], an instant is stored as `start == end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeTime {
    pub start: i64,
    pub end: i64,
    /// Unit the axis is counted in (`days`, `hours`, ...).
    pub unit: String,
}

impl RelativeTime {
    pub fn new(start: i64, end: i64, unit: impl Into<String>) -> Self {
        Self {
            start,
            end,
            unit: unit.into(),
        }
    }

    pub fn instant(at: i64, unit: impl Into<String>) -> Self {
        Self::new(at, at, unit)
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }
}

/// The valid time of a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemporalExtent {
    Absolute(AbsoluteTime),
    Relative(RelativeTime),
}

impl TemporalExtent {
    pub fn temporal_type(&self) -> TemporalType {
        match self {
            TemporalExtent::Absolute(_) => TemporalType::Absolute,
            TemporalExtent::Relative(_) => TemporalType::Relative,
        }
    }

    pub fn as_absolute(&self) -> Option<&AbsoluteTime> {
        match self {
            TemporalExtent::Absolute(t) => Some(t),
            TemporalExtent::Relative(_) => None,
        }
    }

    pub fn as_relative(&self) -> Option<&RelativeTime> {
        match self {
            TemporalExtent::Relative(t) => Some(t),
            TemporalExtent::Absolute(_) => None,
        }
    }

    pub fn is_instant(&self) -> bool {
        match self {
            TemporalExtent::Absolute(t) => t.is_instant(),
            TemporalExtent::Relative(t) => t.is_instant(),
        }
    }
}

impl From<AbsoluteTime> for TemporalExtent {
    fn from(value: AbsoluteTime) -> Self {
        TemporalExtent::Absolute(value)
    }
}

impl From<RelativeTime> for TemporalExtent {
    fn from(value: RelativeTime) -> Self {
        TemporalExtent::Relative(value)
    }
}

/// A start point on either time axis, used when valid time is assigned
/// to maps in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TimePoint {
    Absolute(NaiveDateTime),
    Relative(i64),
}

impl TimePoint {
    pub fn temporal_type(&self) -> TemporalType {
        match self {
            TimePoint::Absolute(_) => TemporalType::Absolute,
            TimePoint::Relative(_) => TemporalType::Relative,
        }
    }
}

/// Valid time handed out to a list of maps during registration.
///
/// Map `i` (0-based) starts at `start + i * increment`. With `interval`
/// set it ends one increment later; otherwise it ends at `end`, or is an
/// instant when no end is given. Without an increment every map receives
/// the same extent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAssignment {
    pub start: TimePoint,
    pub end: Option<TimePoint>,
    /// `"<n> <unit>"` for absolute time, `"<n>"` for relative time.
    pub increment: Option<String>,
    pub interval: bool,
    /// Unit of relative time, defaulting to the dataset's unit.
    pub unit: Option<String>,
}

impl TimeAssignment {
    pub fn starting_at(start: TimePoint) -> Self {
        Self {
            start,
            end: None,
            increment: None,
            interval: false,
            unit: None,
        }
    }

    pub fn with_increment(mut self, increment: impl Into<String>, interval: bool) -> Self {
        self.increment = Some(increment.into());
        self.interval = interval;
        self
    }
}
