//! Allen interval relations between temporal extents.
//!
//! An extent is the closed interval `[start, end]`; a time instant is the
//! zero-length interval `start == end`, on either time axis.

use tgis_core::models::{TemporalExtent, TemporalRelation};

use crate::granularity::normalize_unit;

/// Relation of interval A `[sa, ea]` to interval B `[sb, eb]`.
///
/// Tests run in a fixed priority order and the first match wins:
/// equivalent, during, contains, overlaps, overlapped, after, before,
/// starts, finishes, started, finished, follows, precedes.
/// Returns `None` when nothing matches, which only happens with
/// incomparable values such as NaN.
pub fn classify_interval<T: PartialOrd>(sa: &T, ea: &T, sb: &T, eb: &T) -> Option<TemporalRelation> {
    use TemporalRelation::*;

    if sa == sb && ea == eb {
        Some(Equivalent)
    } else if sa > sb && ea < eb {
        Some(During)
    } else if sa < sb && ea > eb {
        Some(Contains)
    } else if sa < sb && ea > sb && ea < eb {
        Some(Overlaps)
    } else if sa > sb && sa < eb && ea > eb {
        Some(Overlapped)
    } else if sa > eb {
        Some(After)
    } else if ea < sb {
        Some(Before)
    } else if sa == sb && ea < eb {
        Some(Starts)
    } else if ea == eb && sa > sb {
        Some(Finishes)
    } else if sa == sb && ea > eb {
        Some(Started)
    } else if ea == eb && sa < sb {
        Some(Finished)
    } else if sa == eb {
        Some(Follows)
    } else if ea == sb {
        Some(Precedes)
    } else {
        None
    }
}

/// Relation of extent `a` to extent `b`.
///
/// `None` when the extents are of different temporal types, or relative
/// with different units.
pub fn temporal_relation(a: &TemporalExtent, b: &TemporalExtent) -> Option<TemporalRelation> {
    match (a, b) {
        (TemporalExtent::Absolute(a), TemporalExtent::Absolute(b)) => {
            classify_interval(&a.start, &a.end, &b.start, &b.end)
        }
        (TemporalExtent::Relative(a), TemporalExtent::Relative(b)) => {
            if !same_unit(&a.unit, &b.unit) {
                return None;
            }
            classify_interval(&a.start, &a.end, &b.start, &b.end)
        }
        _ => None,
    }
}

fn same_unit(a: &str, b: &str) -> bool {
    match (normalize_unit(a), normalize_unit(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
