//! Weekday aggregation of a user's presence
//!
//! All bucket-based reports cover the full week, Monday first. The
//! start/end report instead omits weekdays without any entries.

use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::records::{AttendanceCalendar, UserCalendar, UserId};
use crate::stats::{mean, Mean};
use crate::time::{interval, seconds_since_midnight, seconds_to_millis};
use crate::{Error, Result};

/// Weekday abbreviations, Monday first
pub const WEEKDAY_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Header row of the presentation form of [`sum_by_weekday`]
pub const PRESENCE_HEADER: (&str, &str) = ("Weekday", "Presence (s)");

/// Interval lists for each day of the week, indexed 0 (Monday) to 6 (Sunday)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayBuckets([Vec<i64>; 7]);

impl WeekdayBuckets {
    pub fn get(&self, weekday: Weekday) -> &[i64] {
        &self.0[weekday.num_days_from_monday() as usize]
    }

    fn push(&mut self, weekday: Weekday, value: i64) {
        self.0[weekday.num_days_from_monday() as usize].push(value);
    }

    /// All seven buckets as `(weekday index, intervals)`, Monday first
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[i64])> + '_ {
        self.0.iter().enumerate().map(|(index, values)| (index, values.as_slice()))
    }
}

/// Mean start and end of presence on one weekday
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StartEndMean(pub &'static str, pub f64, pub f64);

/// Group a user's presence intervals by weekday of the date.
pub fn group_by_weekday(calendar: &UserCalendar) -> WeekdayBuckets {
    let mut buckets = WeekdayBuckets::default();
    for (date, presence) in calendar {
        buckets.push(date.weekday(), interval(&presence.start, &presence.end));
    }
    buckets
}

/// Mean interval per weekday, all seven days
pub fn mean_by_weekday(buckets: &WeekdayBuckets) -> Vec<(&'static str, Mean)> {
    buckets
        .iter()
        .map(|(index, intervals)| (WEEKDAY_ABBR[index], mean(intervals.iter().copied())))
        .collect()
}

/// Total interval per weekday, all seven days
pub fn sum_by_weekday(buckets: &WeekdayBuckets) -> Vec<(&'static str, i64)> {
    buckets
        .iter()
        .map(|(index, intervals)| (WEEKDAY_ABBR[index], intervals.iter().sum()))
        .collect()
}

/// Mean start and end time per weekday for one user, in milliseconds
/// since midnight.
///
/// Weekdays without entries are left out. Fails with [`Error::NotFound`]
/// when the user has no calendar at all.
pub fn start_end_mean_time(
    calendar: &AttendanceCalendar,
    user_id: UserId,
) -> Result<Vec<StartEndMean>> {
    let user_calendar = calendar
        .get(&user_id)
        .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;

    let mut starts: [Vec<i64>; 7] = Default::default();
    let mut ends: [Vec<i64>; 7] = Default::default();

    for (date, presence) in user_calendar {
        let index = date.weekday().num_days_from_monday() as usize;
        starts[index].push(i64::from(seconds_since_midnight(&presence.start)));
        ends[index].push(i64::from(seconds_since_midnight(&presence.end)));
    }

    Ok(starts
        .iter()
        .zip(ends.iter())
        .enumerate()
        .filter(|(_, (start, _))| !start.is_empty())
        .map(|(index, (start, end))| {
            StartEndMean(
                WEEKDAY_ABBR[index],
                seconds_to_millis(mean(start.iter().copied()).as_f64()),
                seconds_to_millis(mean(end.iter().copied()).as_f64()),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Presence;
    use chrono::{NaiveDate, NaiveTime};

    fn presence(start: (u32, u32, u32), end: (u32, u32, u32)) -> Presence {
        Presence {
            start: NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    /// 2013-09-09 is a Monday
    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 9, d).unwrap()
    }

    fn sample_calendar() -> UserCalendar {
        let mut calendar = UserCalendar::new();
        calendar.insert(day(9), presence((9, 0, 0), (17, 0, 0))); // Mon 28800
        calendar.insert(day(16), presence((8, 0, 0), (12, 0, 0))); // Mon 14400
        calendar.insert(day(10), presence((10, 0, 0), (18, 30, 0))); // Tue 30600
        calendar.insert(day(13), presence((7, 0, 0), (15, 0, 0))); // Fri 28800
        calendar
    }

    #[test]
    fn test_group_by_weekday_has_seven_buckets() {
        let buckets = group_by_weekday(&sample_calendar());
        assert_eq!(buckets.iter().count(), 7);

        assert_eq!(buckets.get(Weekday::Mon), &[28_800, 14_400]);
        assert_eq!(buckets.get(Weekday::Tue), &[30_600]);
        assert!(buckets.get(Weekday::Wed).is_empty());
        assert!(buckets.get(Weekday::Thu).is_empty());
        assert_eq!(buckets.get(Weekday::Fri), &[28_800]);
        assert!(buckets.get(Weekday::Sat).is_empty());
        assert!(buckets.get(Weekday::Sun).is_empty());
    }

    #[test]
    fn test_group_by_weekday_empty_calendar() {
        let buckets = group_by_weekday(&UserCalendar::new());
        assert_eq!(buckets.iter().count(), 7);
        assert!(buckets.iter().all(|(_, values)| values.is_empty()));
    }

    #[test]
    fn test_mean_by_weekday() {
        let result = mean_by_weekday(&group_by_weekday(&sample_calendar()));

        assert_eq!(result.len(), 7);
        assert_eq!(result[0], ("Mon", Mean::Value(21_600.0)));
        assert_eq!(result[1], ("Tue", Mean::Value(30_600.0)));
        assert_eq!(result[2], ("Wed", Mean::Zero));
        assert_eq!(result[4], ("Fri", Mean::Value(28_800.0)));
        assert_eq!(result[6], ("Sun", Mean::Zero));
    }

    #[test]
    fn test_sum_by_weekday() {
        let result = sum_by_weekday(&group_by_weekday(&sample_calendar()));

        assert_eq!(
            result,
            vec![
                ("Mon", 43_200),
                ("Tue", 30_600),
                ("Wed", 0),
                ("Thu", 0),
                ("Fri", 28_800),
                ("Sat", 0),
                ("Sun", 0),
            ]
        );
    }

    #[test]
    fn test_start_end_mean_time_omits_empty_weekdays() {
        let mut calendar = AttendanceCalendar::new();
        calendar.insert(10, sample_calendar());

        let result = start_end_mean_time(&calendar, 10).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0], StartEndMean("Mon", 30_600_000.0, 52_200_000.0));
        assert_eq!(result[1], StartEndMean("Tue", 36_000_000.0, 66_600_000.0));
        assert_eq!(result[2], StartEndMean("Fri", 25_200_000.0, 54_000_000.0));
    }

    #[test]
    fn test_start_end_mean_time_unknown_user() {
        let calendar = AttendanceCalendar::new();
        assert!(matches!(
            start_end_mean_time(&calendar, 42),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_start_end_mean_serializes_as_tuple() {
        let value = serde_json::to_value(StartEndMean("Mon", 1000.0, 2000.0)).unwrap();
        assert_eq!(value, serde_json::json!(["Mon", 1000.0, 2000.0]));
    }
}
