//! # Calendar Module
//!
//! Local-day arithmetic shared by the forecaster and the aggregator.
//!
//! Sales are stamped in UTC but the bar thinks in local calendar days: a sale
//! at 23:59 belongs to "yesterday" even if it is already tomorrow in UTC. Every
//! function here takes the time zone from the caller-supplied `now`, so the
//! same code runs against `chrono::Local` in the host and against a fixed
//! offset in tests.
//!
//! ## Trailing Window
//! ```text
//!   days = 4, now = Thu 15:30 local
//!
//!   ┌────────┬────────┬────────┬────────┐
//!   │  Mon   │  Tue   │  Wed   │  Thu   │
//!   │ [0,24) │ [0,24) │ [0,24) │ [0,24) │
//!   └────────┴────────┴────────┴────────┘
//!    index 0                   index 3 (today, inclusive)
//! ```

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};

/// A half-open `[start, end)` interval covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayBucket {
    /// Builds the bucket for `day` in time zone `tz`.
    pub fn for_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
        DayBucket {
            day,
            start: local_day_start(day, tz),
            end: local_day_start(next, tz),
        }
    }

    /// Half-open membership: `start <= instant < end`.
    #[inline]
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// Returns the instant a local calendar day begins.
///
/// Where midnight does not exist (a DST gap) the earliest valid reading is
/// used; if the zone cannot resolve the wall time at all, the naive midnight
/// is read as UTC.
pub fn local_day_start<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// `days` consecutive local-day buckets ending with the day containing `now`,
/// oldest first.
pub fn day_window<Tz: TimeZone>(now: &DateTime<Tz>, days: usize) -> Vec<DayBucket> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset as u64)))
        .map(|day| DayBucket::for_day(day, &tz))
        .collect()
}

/// Calendar-day equality in `now`'s time zone.
///
/// This is day equality, not a rolling 24 hour window.
pub fn same_local_day<Tz: TimeZone>(instant: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    instant.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn bogota() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    #[test]
    fn test_day_window_is_oldest_first_and_ends_today() {
        let now = bogota().with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
        let window = day_window(&now, 30);

        assert_eq!(window.len(), 30);
        assert_eq!(window[29].day, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(window[0].day, NaiveDate::from_ymd_opt(2024, 4, 11).unwrap());
        assert!(window.windows(2).all(|pair| pair[0].end == pair[1].start));
    }

    #[test]
    fn test_bucket_boundaries_follow_local_midnight() {
        let tz = bogota();
        let bucket = DayBucket::for_day(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), &tz);

        // Local midnight in UTC-5 is 05:00 UTC.
        assert_eq!(bucket.start, Utc.with_ymd_and_hms(2024, 5, 10, 5, 0, 0).unwrap());
        assert_eq!(bucket.end, Utc.with_ymd_and_hms(2024, 5, 11, 5, 0, 0).unwrap());

        assert!(bucket.contains(&bucket.start));
        assert!(!bucket.contains(&bucket.end));
    }

    #[test]
    fn test_same_local_day() {
        let tz = bogota();
        let now = tz.with_ymd_and_hms(2024, 5, 10, 0, 30, 0).unwrap();

        let yesterday_late = tz
            .with_ymd_and_hms(2024, 5, 9, 23, 59, 0)
            .unwrap()
            .with_timezone(&Utc);
        let today_early = tz
            .with_ymd_and_hms(2024, 5, 10, 0, 1, 0)
            .unwrap()
            .with_timezone(&Utc);

        assert!(!same_local_day(&yesterday_late, &now));
        assert!(same_local_day(&today_early, &now));
    }

    #[test]
    fn test_zero_day_window_is_empty() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert!(day_window(&now, 0).is_empty());
    }
}
