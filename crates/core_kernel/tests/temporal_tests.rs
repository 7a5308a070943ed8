//! Unit tests for the calendar module
//!
//! Tests cover MonthKey arithmetic and parsing, month-end helpers and
//! the overflowing month addition used by the calendar-pinned schedules.

use chrono::NaiveDate;
use core_kernel::temporal::{
    add_months_clamped, add_months_overflowing, days_in_month, is_last_day_of_month,
    last_day_of_month,
};
use core_kernel::{MonthKey, TemporalError, Timezone};
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod month_key {
    use super::*;

    #[test]
    fn test_new_rejects_month_zero_and_thirteen() {
        assert!(matches!(
            MonthKey::new(2025, 0),
            Err(TemporalError::InvalidMonthKey(_))
        ));
        assert!(MonthKey::new(2025, 13).is_err());
    }

    #[test]
    fn test_from_date_and_contains() {
        let key = MonthKey::from_date(date(2025, 3, 31));
        assert_eq!(key.to_string(), "2025-03");
        assert!(key.contains(date(2025, 3, 1)));
        assert!(!key.contains(date(2025, 4, 1)));
    }

    #[test]
    fn test_btree_iterates_chronologically() {
        let mut map = BTreeMap::new();
        map.insert(MonthKey::new(2026, 1).unwrap(), "c");
        map.insert(MonthKey::new(2025, 2).unwrap(), "a");
        map.insert(MonthKey::new(2025, 12).unwrap(), "b");

        let order: Vec<_> = map.values().copied().collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_day_anchors() {
        let key = MonthKey::new(2024, 2).unwrap();
        assert_eq!(key.first_day(), date(2024, 2, 1));
        assert_eq!(key.mid_month(), date(2024, 2, 15));
        assert_eq!(key.last_day(), date(2024, 2, 29));
    }

    #[test]
    fn test_label() {
        assert_eq!(MonthKey::new(2025, 1).unwrap().label(), "January 2025");
        assert_eq!(MonthKey::new(2024, 12).unwrap().label(), "December 2024");
    }

    #[test]
    fn test_offset_across_many_years() {
        let key = MonthKey::new(2025, 6).unwrap();
        assert_eq!(key.offset(120), MonthKey::new(2035, 6).unwrap());
        assert_eq!(key.offset(-6), MonthKey::new(2024, 12).unwrap());
    }

    #[test]
    fn test_parse_round_trip() {
        let key: MonthKey = "2030-09".parse().unwrap();
        assert_eq!(key.year(), 2030);
        assert_eq!(key.month(), 9);
        assert_eq!(key.to_string(), "2030-09");
    }
}

mod month_arithmetic {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
    }

    #[test]
    fn test_last_day_detection() {
        assert!(is_last_day_of_month(date(2025, 4, 30)));
        assert!(!is_last_day_of_month(date(2025, 4, 29)));
        assert_eq!(last_day_of_month(date(2025, 12, 1)), date(2025, 12, 31));
    }

    #[test]
    fn test_overflowing_from_month_end() {
        // Aug 31 + 1 month spills past Sep 30
        assert_eq!(add_months_overflowing(date(2025, 8, 31), 1).unwrap(), date(2025, 10, 1));
        assert_eq!(add_months_overflowing(date(2025, 8, 30), 1).unwrap(), date(2025, 9, 30));
    }

    #[test]
    fn test_overflowing_matches_clamped_for_short_days() {
        for months in 0..24 {
            assert_eq!(
                add_months_overflowing(date(2025, 5, 10), months).unwrap(),
                add_months_clamped(date(2025, 5, 10), months)
            );
        }
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_default_is_utc() {
        assert_eq!(Timezone::default().0, chrono_tz::UTC);
    }

    #[test]
    fn test_serde_uses_iana_name() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"America/New_York\"");
    }
}
