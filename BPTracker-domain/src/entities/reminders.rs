use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub use bp_tracker_data::models::ReminderKind;

/// Every day of the week, 0 = Sunday
pub const ALL_DAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

/// A medication or measurement reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub kind: ReminderKind,
    /// Medication name or measurement reminder name
    pub label: String,
    /// Medication reminders only
    pub dosage: Option<String>,
    /// Local time of day, `HH:MM`
    pub time: String,
    /// Weekdays the reminder fires on, 0 = Sunday
    pub days_of_week: BTreeSet<u8>,
    pub is_enabled: bool,
    /// Id of the scheduled notification while the reminder is enabled
    pub notification_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Hour and minute of `time`
    pub fn hour_minute(&self) -> Option<(u32, u32)> {
        parse_time(&self.time)
    }
}

/// Values for a new reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReminderInput {
    #[validate(length(min = 1, max = 200, message = "Please enter a name"))]
    pub label: String,

    #[validate(length(max = 200, message = "Dosage cannot exceed 200 characters"))]
    pub dosage: Option<String>,

    #[validate(custom = "validate_time")]
    pub time: String,

    #[validate(custom = "validate_days")]
    pub days_of_week: BTreeSet<u8>,

    pub is_enabled: bool,
}

/// Partial reminder update. The notification id is managed by the reminder service.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ReminderPatch {
    #[validate(length(min = 1, max = 200, message = "Please enter a name"))]
    pub label: Option<String>,

    pub dosage: Option<Option<String>>,

    #[validate(custom = "validate_time")]
    pub time: Option<String>,

    #[validate(custom = "validate_days")]
    pub days_of_week: Option<BTreeSet<u8>>,

    pub is_enabled: Option<bool>,
}

impl ReminderPatch {
    /// Whether the schedule itself (time or days) changes
    pub fn changes_schedule(&self) -> bool {
        self.time.is_some() || self.days_of_week.is_some()
    }
}

/// Parse `HH:MM` into hour and minute
pub fn parse_time(raw: &str) -> Option<(u32, u32)> {
    use chrono::Timelike;

    if raw.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .ok()
        .map(|time| (time.hour(), time.minute()))
}

fn validate_time(time: &str) -> Result<(), ValidationError> {
    match parse_time(time) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("time_format");
            error.message = Some("Time must be HH:MM".into());
            Err(error)
        }
    }
}

fn validate_days(days: &BTreeSet<u8>) -> Result<(), ValidationError> {
    if days.is_empty() || days.iter().any(|day| *day > 6) {
        let mut error = ValidationError::new("days_of_week");
        error.message = Some("Choose at least one day between 0 and 6".into());
        return Err(error);
    }
    Ok(())
}

/// Short English description of a weekday set
pub fn describe_days(days: &BTreeSet<u8>) -> String {
    const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    if days.len() == 7 {
        return "Every day".to_string();
    }
    if days.len() == 5 && !days.contains(&0) && !days.contains(&6) {
        return "Weekdays".to_string();
    }
    if days.len() == 2 && days.contains(&0) && days.contains(&6) {
        return "Weekends".to_string();
    }
    days.iter()
        .filter_map(|day| NAMES.get(usize::from(*day)))
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(time: &str, days: &[u8]) -> ReminderInput {
        ReminderInput {
            label: "Amlodipine".to_string(),
            dosage: Some("5 mg".to_string()),
            time: time.to_string(),
            days_of_week: days.iter().copied().collect(),
            is_enabled: true,
        }
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:30"), Some((8, 30)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("8:30"), None);
        assert_eq!(parse_time("morning"), None);
    }

    #[test]
    fn test_reminder_input_validation() {
        assert!(input("08:00", &ALL_DAYS).validate().is_ok());

        let errors = input("8 am", &[]).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("time"));
        assert!(fields.contains_key("days_of_week"));

        assert!(input("08:00", &[7]).validate().is_err());
    }

    #[test]
    fn test_patch_validation_skips_missing_fields() {
        assert!(ReminderPatch::default().validate().is_ok());

        let patch = ReminderPatch {
            time: Some("25:00".to_string()),
            ..ReminderPatch::default()
        };
        assert!(patch.validate().is_err());
        assert!(patch.changes_schedule());
    }

    #[test]
    fn test_describe_days() {
        assert_eq!(describe_days(&ALL_DAYS.into_iter().collect()), "Every day");
        assert_eq!(describe_days(&[1, 2, 3, 4, 5].into_iter().collect()), "Weekdays");
        assert_eq!(describe_days(&[0, 6].into_iter().collect()), "Weekends");
        assert_eq!(describe_days(&[1, 3].into_iter().collect()), "Mon, Wed");
    }
}
