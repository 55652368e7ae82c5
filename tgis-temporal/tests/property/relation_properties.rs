//! Property tests for the interval relation classifier.

use proptest::prelude::*;

use test_fixtures::{absolute, day, relative, relative_instant};
use tgis_core::models::TemporalRelation;
use tgis_temporal::{classify_interval, temporal_relation};

/// A proper interval `[start, end]` with `start < end`.
fn interval() -> impl Strategy<Value = (i64, i64)> {
    (-1000i64..1000, 1i64..500).prop_map(|(start, len)| (start, start + len))
}

/// An interval that may collapse to an instant.
fn extent() -> impl Strategy<Value = (i64, i64)> {
    (-1000i64..1000, 0i64..500).prop_map(|(start, len)| (start, start + len))
}

proptest! {
    #[test]
    fn prop_totally_ordered_values_always_classify((sa, ea) in extent(), (sb, eb) in extent()) {
        prop_assert!(classify_interval(&sa, &ea, &sb, &eb).is_some());
    }

    #[test]
    fn prop_inverse_consistency((sa, ea) in interval(), (sb, eb) in interval()) {
        let ab = classify_interval(&sa, &ea, &sb, &eb).unwrap();
        let ba = classify_interval(&sb, &eb, &sa, &ea).unwrap();
        prop_assert_eq!(ab.inverse(), ba);
    }

    #[test]
    fn prop_self_is_equivalent((s, e) in extent()) {
        prop_assert_eq!(classify_interval(&s, &e, &s, &e), Some(TemporalRelation::Equivalent));
    }

    #[test]
    fn prop_shift_invariance((sa, ea) in interval(), (sb, eb) in interval(), shift in -500i64..500) {
        prop_assert_eq!(
            classify_interval(&sa, &ea, &sb, &eb),
            classify_interval(&(sa + shift), &(ea + shift), &(sb + shift), &(eb + shift))
        );
    }

    #[test]
    fn prop_disjoint_intervals_are_ordered((sa, ea) in interval(), gap in 1i64..100, len in 1i64..100) {
        let sb = ea + gap;
        let eb = sb + len;
        prop_assert_eq!(classify_interval(&sa, &ea, &sb, &eb), Some(TemporalRelation::Before));
        prop_assert_eq!(classify_interval(&sb, &eb, &sa, &ea), Some(TemporalRelation::After));
    }

    #[test]
    fn prop_relative_points_follow_numeric_order(a in -100i64..100, b in -100i64..100) {
        let expected = match a.cmp(&b) {
            std::cmp::Ordering::Less => TemporalRelation::Before,
            std::cmp::Ordering::Equal => TemporalRelation::Equivalent,
            std::cmp::Ordering::Greater => TemporalRelation::After,
        };
        let ra = relative_instant(a, "days");
        let rb = relative_instant(b, "day");
        prop_assert_eq!(temporal_relation(&ra, &rb), Some(expected));
    }

    #[test]
    fn prop_relative_intervals_match_classifier((sa, ea) in interval(), (sb, eb) in interval()) {
        let ra = relative(sa, ea, "years");
        let rb = relative(sb, eb, "years");
        prop_assert_eq!(temporal_relation(&ra, &rb), classify_interval(&sa, &ea, &sb, &eb));
    }

    #[test]
    fn prop_mixed_kinds_never_relate(offset in 0i64..365, at in -100i64..100) {
        let start = day(2001, 1, 1) + chrono::Duration::days(offset);
        let abs = absolute(start, start + chrono::Duration::days(1));
        let rel = relative_instant(at, "days");
        prop_assert_eq!(temporal_relation(&abs, &rel), None);
        prop_assert_eq!(temporal_relation(&rel, &abs), None);
    }

    #[test]
    fn prop_different_units_never_relate((sa, ea) in extent(), b in -100i64..100) {
        let ra = relative(sa, ea, "days");
        let rb = relative_instant(b, "hours");
        prop_assert_eq!(temporal_relation(&ra, &rb), None);
    }
}
