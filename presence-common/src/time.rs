//! Timestamp utilities
//!
//! Two concerns live here:
//! - wall clock access through the [`Clock`] trait, so that TTL-based code can
//!   be driven by a controllable clock in tests
//! - time-of-day arithmetic on naive times, expressed as whole seconds since
//!   midnight
//!
//! Interval arithmetic only looks at the time-of-day component. Passing full
//! timestamps whose dates differ does NOT yield elapsed time:
//!
//! ```
//! use chrono::NaiveTime;
//! use presence_common::time::interval;
//!
//! let start = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
//! let end = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
//! assert_eq!(interval(&start, &end), 14_400 - 86_400);
//! ```

use chrono::{DateTime, Timelike, Utc};

/// Number of seconds in one day
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

/// Seconds elapsed since midnight for a time-of-day or timestamp.
///
/// Only the time-of-day component is used. Sub-second precision is
/// truncated, so the result is always in `[0, 86400)`.
pub fn seconds_since_midnight<T: Timelike>(time: &T) -> u32 {
    time.num_seconds_from_midnight()
}

/// Signed interval in seconds between two times of day.
///
/// Computed as `seconds_since_midnight(end) - seconds_since_midnight(start)`.
/// Negative when `end` is earlier in the day than `start`.
pub fn interval<T: Timelike>(start: &T, end: &T) -> i64 {
    i64::from(seconds_since_midnight(end)) - i64::from(seconds_since_midnight(start))
}

/// Convert seconds to milliseconds
pub fn seconds_to_millis(seconds: f64) -> f64 {
    seconds * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2013, 9, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = SystemClock.now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() < 4_102_444_800); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_seconds_since_midnight() {
        assert_eq!(seconds_since_midnight(&hms(0, 0, 0)), 0);
        assert_eq!(seconds_since_midnight(&hms(0, 0, 1)), 1);
        assert_eq!(seconds_since_midnight(&hms(12, 0, 0)), 43_200);
        assert_eq!(seconds_since_midnight(&hms(23, 59, 59)), SECONDS_PER_DAY - 1);
    }

    #[test]
    fn test_seconds_since_midnight_ignores_date() {
        assert_eq!(seconds_since_midnight(&at(10, 12, 0, 0)), 43_200);
        assert_eq!(seconds_since_midnight(&at(11, 0, 0, 1)), 1);
    }

    #[test]
    fn test_seconds_since_midnight_truncates_fraction() {
        let time = NaiveTime::from_hms_milli_opt(0, 0, 1, 999).unwrap();
        assert_eq!(seconds_since_midnight(&time), 1);
    }

    #[test]
    fn test_interval_same_instant_is_zero() {
        assert_eq!(interval(&hms(9, 39, 5), &hms(9, 39, 5)), 0);
        assert_eq!(interval(&at(10, 17, 59, 52), &at(10, 17, 59, 52)), 0);
    }

    #[test]
    fn test_interval_same_day() {
        assert_eq!(interval(&at(10, 8, 0, 0), &at(10, 12, 0, 0)), 14_400);
        assert_eq!(interval(&hms(12, 0, 0), &hms(8, 0, 0)), -14_400);
    }

    #[test]
    fn test_interval_backward_over_midnight() {
        // Date components are discarded; only times of day are subtracted
        assert_eq!(interval(&at(10, 20, 0, 0), &at(11, 0, 0, 0)), 14_400 - 86_400);
    }

    #[test]
    fn test_seconds_to_millis() {
        assert_eq!(seconds_to_millis(0.0), 0.0);
        assert_eq!(seconds_to_millis(34_745.0), 34_745_000.0);
        assert_eq!(seconds_to_millis(1.5), 1_500.0);
    }
}
