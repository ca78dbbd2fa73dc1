use chrono::{DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::entities::{DateRange, DateRangePreset, RecordFilter};

/// Concrete bounds for a preset, computed on the wall clock of `now`'s time zone.
///
/// Both ends are inclusive: the start is local midnight and the end is 23:59:59.999
/// local time. `All` and `Custom` have no bounds.
pub fn range_for<Tz: TimeZone>(preset: DateRangePreset, now: &DateTime<Tz>) -> Option<DateRange> {
    let tz = now.timezone();
    let today = now.date_naive();

    let (first_day, last_day) = match preset {
        DateRangePreset::Last7Days => (today.checked_sub_days(Days::new(7))?, today),
        DateRangePreset::Last30Days => (today.checked_sub_days(Days::new(30))?, today),
        DateRangePreset::Last90Days => (today.checked_sub_days(Days::new(90))?, today),
        DateRangePreset::ThisMonth => (today.with_day(1)?, today),
        DateRangePreset::LastMonth => {
            let last_of_previous = today.with_day(1)?.pred_opt()?;
            (last_of_previous.with_day(1)?, last_of_previous)
        }
        DateRangePreset::All | DateRangePreset::Custom => return None,
    };

    Some(DateRange {
        start_date: start_of_day(&tz, first_day)?,
        end_date: end_of_day(&tz, last_day)?,
    })
}

/// Bounds a listing should apply.
///
/// A preset other than `All` takes priority over an explicit range, so `Custom`
/// yields no bound even when a range is supplied. Without such a preset the
/// explicit range applies.
pub fn resolve_bounds<Tz: TimeZone>(filter: &RecordFilter, now: &DateTime<Tz>) -> Option<DateRange> {
    match filter.preset {
        Some(preset) if preset != DateRangePreset::All => range_for(preset, now),
        _ => filter.date_range,
    }
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    local_to_utc(tz, day.and_hms_opt(0, 0, 0)?)
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    local_to_utc(tz, day.and_hms_milli_opt(23, 59, 59, 999)?)
}

/// Ambiguous local times take the earlier instant. A time skipped by a DST jump
/// moves forward by an hour.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_local_datetime(&(local + Duration::hours(1))).earliest()?,
    };
    Some(resolved.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    fn march_10_utc() -> DateTime<Utc> {
        utc("2024-03-10T14:25:00Z")
    }

    #[test]
    fn test_last_7_days() {
        let range = range_for(DateRangePreset::Last7Days, &march_10_utc()).unwrap();
        assert_eq!(range.start_date, utc("2024-03-03T00:00:00.000Z"));
        assert_eq!(range.end_date, utc("2024-03-10T23:59:59.999Z"));
    }

    #[test]
    fn test_last_30_and_90_days() {
        let range = range_for(DateRangePreset::Last30Days, &march_10_utc()).unwrap();
        assert_eq!(range.start_date, utc("2024-02-09T00:00:00Z"));

        let range = range_for(DateRangePreset::Last90Days, &march_10_utc()).unwrap();
        assert_eq!(range.start_date, utc("2023-12-11T00:00:00Z"));
        assert_eq!(range.end_date, utc("2024-03-10T23:59:59.999Z"));
    }

    #[test]
    fn test_this_month() {
        let range = range_for(DateRangePreset::ThisMonth, &march_10_utc()).unwrap();
        assert_eq!(range.start_date, utc("2024-03-01T00:00:00Z"));
        assert_eq!(range.end_date, utc("2024-03-10T23:59:59.999Z"));
    }

    #[test]
    fn test_last_month_handles_leap_february_and_january() {
        let range = range_for(DateRangePreset::LastMonth, &march_10_utc()).unwrap();
        assert_eq!(range.start_date, utc("2024-02-01T00:00:00Z"));
        assert_eq!(range.end_date, utc("2024-02-29T23:59:59.999Z"));

        let range = range_for(DateRangePreset::LastMonth, &utc("2024-01-15T09:00:00Z")).unwrap();
        assert_eq!(range.start_date, utc("2023-12-01T00:00:00Z"));
        assert_eq!(range.end_date, utc("2023-12-31T23:59:59.999Z"));
    }

    #[test]
    fn test_all_and_custom_have_no_range() {
        assert!(range_for(DateRangePreset::All, &march_10_utc()).is_none());
        assert!(range_for(DateRangePreset::Custom, &march_10_utc()).is_none());
    }

    #[test]
    fn test_local_wall_clock_is_used() {
        let bangkok = FixedOffset::east_opt(7 * 3600).unwrap();
        // 2024-03-10 06:00 in Bangkok is still 2024-03-09 in UTC
        let now = bangkok.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();

        let range = range_for(DateRangePreset::Last7Days, &now).unwrap();
        assert_eq!(range.start_date, utc("2024-03-03T00:00:00+07:00"));
        assert_eq!(range.end_date, utc("2024-03-10T23:59:59.999+07:00"));
    }

    #[test]
    fn test_preset_takes_priority_over_explicit_range() {
        let explicit = DateRange {
            start_date: utc("2023-01-01T00:00:00Z"),
            end_date: utc("2023-01-31T23:59:59.999Z"),
        };

        let filter = RecordFilter {
            preset: Some(DateRangePreset::ThisMonth),
            date_range: Some(explicit),
            ..RecordFilter::default()
        };
        let bounds = resolve_bounds(&filter, &march_10_utc()).unwrap();
        assert_eq!(bounds.start_date, utc("2024-03-01T00:00:00Z"));

        // Custom is a preset too, and it carries no bounds of its own
        let custom = RecordFilter {
            preset: Some(DateRangePreset::Custom),
            ..filter.clone()
        };
        assert!(resolve_bounds(&custom, &march_10_utc()).is_none());

        // All defers to the explicit range
        let all = RecordFilter {
            preset: Some(DateRangePreset::All),
            ..filter.clone()
        };
        assert_eq!(resolve_bounds(&all, &march_10_utc()), Some(explicit));

        assert_eq!(resolve_bounds(&RecordFilter::range(explicit), &march_10_utc()), Some(explicit));
        assert!(resolve_bounds(&RecordFilter::default(), &march_10_utc()).is_none());
    }
}
