//! Tests for period bucketing
//! Verifies deterministic labels and ISO week-year handling at year boundaries

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use shared::{bucket_key, bucket_key_str, Granularity};

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

// =============================================================================
// ISO week reference table
// =============================================================================

mod iso_weeks {
    use super::*;

    #[test]
    fn year_boundary_reference_table() {
        let table = [
            ((2024, 12, 29), "2024-W52"),
            ((2024, 12, 30), "2025-W01"),
            ((2024, 12, 31), "2025-W01"),
            ((2025, 1, 1), "2025-W01"),
            ((2020, 12, 31), "2020-W53"),
            ((2021, 1, 3), "2020-W53"),
            ((2021, 1, 4), "2021-W01"),
            ((2026, 12, 31), "2026-W53"),
            ((2027, 1, 3), "2026-W53"),
            ((2018, 12, 31), "2019-W01"),
        ];

        for ((y, m, d), expected) in table {
            assert_eq!(
                bucket_key(&utc(y, m, d), Granularity::Weekly),
                expected,
                "{}-{}-{}",
                y,
                m,
                d
            );
        }
    }

    #[test]
    fn string_timestamp_at_midnight_utc() {
        assert_eq!(
            bucket_key_str("2024-12-31T00:00:00Z", Granularity::Weekly).unwrap(),
            "2025-W01"
        );
    }

    #[test]
    fn single_digit_weeks_are_padded() {
        assert_eq!(
            bucket_key(&utc(2024, 3, 5), Granularity::Weekly),
            "2024-W10"
        );
        assert_eq!(
            bucket_key(&utc(2024, 1, 8), Granularity::Weekly),
            "2024-W02"
        );
    }
}

// =============================================================================
// Other granularities
// =============================================================================

mod calendar_buckets {
    use super::*;

    #[test]
    fn yearly_monthly_daily_labels() {
        let ts = utc(2024, 3, 7);
        assert_eq!(bucket_key(&ts, Granularity::Yearly), "2024");
        assert_eq!(bucket_key(&ts, Granularity::Monthly), "2024-03");
        assert_eq!(bucket_key(&ts, Granularity::Daily), "2024-03-07");
    }

    #[test]
    fn daily_uses_the_timestamp_own_date() {
        assert_eq!(
            bucket_key_str("2024-03-07T23:30:00-05:00", Granularity::Daily).unwrap(),
            "2024-03-07"
        );
        assert_eq!(
            bucket_key_str("2024-03-08T02:00:00+05:30", Granularity::Monthly).unwrap(),
            "2024-03"
        );
    }

    #[test]
    fn unparseable_timestamp_is_an_error() {
        assert!(bucket_key_str("not a date", Granularity::Daily).is_err());
        assert!(bucket_key_str("", Granularity::Yearly).is_err());
    }
}

// =============================================================================
// Properties
// =============================================================================

mod property_tests {
    use super::*;

    fn granularity_strategy() -> impl Strategy<Value = Granularity> {
        prop_oneof![
            Just(Granularity::Daily),
            Just(Granularity::Weekly),
            Just(Granularity::Monthly),
            Just(Granularity::Yearly),
        ]
    }

    proptest! {
        /// Same timestamp and granularity always give the same label
        #[test]
        fn prop_bucket_is_deterministic(
            secs in 0i64..4_102_444_800,
            granularity in granularity_strategy(),
        ) {
            let ts = Utc.timestamp_opt(secs, 0).unwrap();
            prop_assert_eq!(bucket_key(&ts, granularity), bucket_key(&ts, granularity));

            let text = ts.to_rfc3339();
            prop_assert_eq!(
                bucket_key_str(&text, granularity).unwrap(),
                bucket_key(&ts, granularity)
            );
        }

        /// Labels sort in time order, so a BTreeMap walk is chronological
        #[test]
        fn prop_labels_sort_chronologically(
            a in 0i64..4_102_444_800,
            b in 0i64..4_102_444_800,
            granularity in granularity_strategy(),
        ) {
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            let early = bucket_key(&Utc.timestamp_opt(early, 0).unwrap(), granularity);
            let late = bucket_key(&Utc.timestamp_opt(late, 0).unwrap(), granularity);
            prop_assert!(early <= late);
        }

        /// ISO week numbers stay within 1..=53
        #[test]
        fn prop_week_number_in_range(secs in 0i64..4_102_444_800) {
            let label = bucket_key(&Utc.timestamp_opt(secs, 0).unwrap(), Granularity::Weekly);
            let week: u32 = label[6..].parse().unwrap();
            prop_assert!((1..=53).contains(&week));
        }
    }
}
