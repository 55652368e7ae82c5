//! The named relations of Allen's interval algebra.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TgisError;

/// Relation of interval A to interval B.
///
/// ```text
/// during      A   |---|        follows     A         |---|
///             B  |-------|                 B  |-----|
///
/// overlaps    A |-----|        starts      A  |---|
///             B    |-----|                 B  |-------|
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalRelation {
    Equivalent,
    During,
    Contains,
    Overlaps,
    Overlapped,
    After,
    Before,
    Starts,
    Finishes,
    Started,
    Finished,
    Follows,
    Precedes,
}

impl TemporalRelation {
    /// All relations in classification priority order.
    pub const ALL: [TemporalRelation; 13] = [
        TemporalRelation::Equivalent,
        TemporalRelation::During,
        TemporalRelation::Contains,
        TemporalRelation::Overlaps,
        TemporalRelation::Overlapped,
        TemporalRelation::After,
        TemporalRelation::Before,
        TemporalRelation::Starts,
        TemporalRelation::Finishes,
        TemporalRelation::Started,
        TemporalRelation::Finished,
        TemporalRelation::Follows,
        TemporalRelation::Precedes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalRelation::Equivalent => "equivalent",
            TemporalRelation::During => "during",
            TemporalRelation::Contains => "contains",
            TemporalRelation::Overlaps => "overlaps",
            TemporalRelation::Overlapped => "overlapped",
            TemporalRelation::After => "after",
            TemporalRelation::Before => "before",
            TemporalRelation::Starts => "starts",
            TemporalRelation::Finishes => "finishes",
            TemporalRelation::Started => "started",
            TemporalRelation::Finished => "finished",
            TemporalRelation::Follows => "follows",
            TemporalRelation::Precedes => "precedes",
        }
    }

    /// The relation of B to A when `self` is the relation of A to B.
    pub fn inverse(&self) -> TemporalRelation {
        match self {
            TemporalRelation::Equivalent => TemporalRelation::Equivalent,
            TemporalRelation::During => TemporalRelation::Contains,
            TemporalRelation::Contains => TemporalRelation::During,
            TemporalRelation::Overlaps => TemporalRelation::Overlapped,
            TemporalRelation::Overlapped => TemporalRelation::Overlaps,
            TemporalRelation::After => TemporalRelation::Before,
            TemporalRelation::Before => TemporalRelation::After,
            TemporalRelation::Starts => TemporalRelation::Started,
            TemporalRelation::Started => TemporalRelation::Starts,
            TemporalRelation::Finishes => TemporalRelation::Finished,
            TemporalRelation::Finished => TemporalRelation::Finishes,
            TemporalRelation::Follows => TemporalRelation::Precedes,
            TemporalRelation::Precedes => TemporalRelation::Follows,
        }
    }
}

impl fmt::Display for TemporalRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemporalRelation {
    type Err = TgisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemporalRelation::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| TgisError::ValidationError(format!("unknown temporal relation: {s}")))
    }
}
