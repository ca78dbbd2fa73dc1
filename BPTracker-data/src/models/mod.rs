//! Storage models. Rows carry timestamps as canonical RFC 3339 text.

pub mod records;
pub mod reminders;
pub mod settings;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

pub use records::{BPRecordChanges, BPRecordRow, NewBPRecord, RecordQuery, StatisticsRow, TimeBounds};
pub use reminders::{NewReminder, ReminderChanges, ReminderKind, ReminderRow};
pub use settings::{ProfileChanges, ProfileRow, SettingsChanges, SettingsRow};

/// Canonical text form of an instant: UTC, millisecond precision, `Z` suffix.
///
/// Every stored timestamp uses this form so that lexical order matches time order.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current instant in canonical form
pub fn timestamp_now() -> String {
    format_timestamp(&Utc::now())
}

/// Parse a stored timestamp. Accepts RFC 3339 and the bare `YYYY-MM-DD HH:MM:SS` form (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_is_millisecond_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 8, 5, 0).unwrap();
        assert_eq!(format_timestamp(&instant), "2024-03-10T08:05:00.000Z");
    }

    #[test]
    fn test_parse_timestamp_accepts_offsets_and_sqlite_format() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-10T08:00:00+07:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-10 01:00:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_canonical_form_sorts_chronologically() {
        let earlier = format_timestamp(&Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap());
        let later = format_timestamp(&Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        assert!(earlier < later);
    }
}
