use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use bp_tracker_data::models::{
    format_timestamp, parse_timestamp, BPRecordChanges, BPRecordRow, NewBPRecord, NewReminder,
    ProfileChanges, ProfileRow, RecordQuery, ReminderChanges, ReminderRow, SettingsChanges, SettingsRow,
    StatisticsRow, TimeBounds,
};

use crate::entities::{
    AppSettings, AppSettingsPatch, BPRecord, BPRecordPatch, BPStatistics, BPThreshold, DarkMode, DateRange,
    RecordFilter, Reminder, ReminderInput, ReminderPatch, UserProfile, UserProfilePatch,
};

// Conversion functions between domain entities and data models.
// They follow the pattern convert_to_[target_layer]_[model_name].

/// A stored value that does not fit the domain type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid timestamp in column {column}: {value:?}")]
    Timestamp { column: &'static str, value: String },

    #[error("Invalid value in column {column}: {value:?}")]
    Value { column: &'static str, value: String },
}

fn timestamp(column: &'static str, raw: &str) -> Result<DateTime<Utc>, ConversionError> {
    parse_timestamp(raw).ok_or_else(|| ConversionError::Timestamp {
        column,
        value: raw.to_string(),
    })
}

/// Parse the stored comma separated weekday list (0 = Sunday)
pub fn parse_days_of_week(raw: &str) -> Result<BTreeSet<u8>, ConversionError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u8>() {
            Ok(day) if day <= 6 => Ok(day),
            _ => Err(ConversionError::Value {
                column: "days_of_week",
                value: raw.to_string(),
            }),
        })
        .collect()
}

/// Stored form of a weekday set, ascending
pub fn format_days_of_week(days: &BTreeSet<u8>) -> String {
    days.iter().map(u8::to_string).collect::<Vec<_>>().join(",")
}

pub fn convert_to_domain_record(row: BPRecordRow) -> Result<BPRecord, ConversionError> {
    Ok(BPRecord {
        id: row.id,
        systolic: row.systolic,
        diastolic: row.diastolic,
        pulse: row.pulse,
        measured_at: timestamp("measured_at", &row.measured_at)?,
        note: row.note,
        image_path: row.image_path,
        created_at: timestamp("created_at", &row.created_at)?,
        updated_at: timestamp("updated_at", &row.updated_at)?,
    })
}

pub fn convert_to_data_new_record(
    systolic: i32,
    diastolic: i32,
    pulse: i32,
    measured_at: &DateTime<Utc>,
    note: Option<String>,
    image_path: Option<String>,
) -> NewBPRecord {
    NewBPRecord {
        systolic,
        diastolic,
        pulse,
        measured_at: format_timestamp(measured_at),
        note,
        image_path,
    }
}

pub fn convert_to_data_record_changes(patch: BPRecordPatch) -> BPRecordChanges {
    BPRecordChanges {
        systolic: patch.systolic,
        diastolic: patch.diastolic,
        pulse: patch.pulse,
        measured_at: patch.measured_at.as_ref().map(format_timestamp),
        note: patch.note,
        image_path: patch.image_path,
    }
}

/// Inclusive store bounds for a resolved range; `None` is unbounded
pub fn convert_to_data_bounds(range: Option<&DateRange>) -> TimeBounds {
    match range {
        Some(range) => TimeBounds::between(format_timestamp(&range.start_date), format_timestamp(&range.end_date)),
        None => TimeBounds::default(),
    }
}

pub fn convert_to_data_record_query(filter: &RecordFilter, range: Option<&DateRange>) -> RecordQuery {
    RecordQuery {
        bounds: convert_to_data_bounds(range),
        limit: filter.limit,
        offset: filter.offset,
    }
}

pub fn convert_to_domain_statistics(row: StatisticsRow) -> BPStatistics {
    BPStatistics {
        total: row.total.max(0) as u64,
        avg_systolic: row.avg_systolic,
        avg_diastolic: row.avg_diastolic,
        avg_pulse: row.avg_pulse,
        max_systolic: row.max_systolic,
        min_systolic: row.min_systolic,
        max_diastolic: row.max_diastolic,
        min_diastolic: row.min_diastolic,
        max_pulse: row.max_pulse,
        min_pulse: row.min_pulse,
        normal_count: row.normal_count.max(0) as u64,
        elevated_count: row.elevated_count.max(0) as u64,
        hypertension_count: row.hypertension_count.max(0) as u64,
    }
}

pub fn convert_to_domain_reminder(row: ReminderRow) -> Result<Reminder, ConversionError> {
    Ok(Reminder {
        id: row.id,
        kind: row.kind,
        label: row.label,
        dosage: row.dosage,
        days_of_week: parse_days_of_week(&row.days_of_week)?,
        time: row.time,
        is_enabled: row.is_enabled,
        notification_id: row.notification_id,
        created_at: timestamp("created_at", &row.created_at)?,
        updated_at: timestamp("updated_at", &row.updated_at)?,
    })
}

pub fn convert_to_data_new_reminder(input: &ReminderInput) -> NewReminder {
    NewReminder {
        label: input.label.clone(),
        dosage: input.dosage.clone(),
        time: input.time.clone(),
        days_of_week: format_days_of_week(&input.days_of_week),
        is_enabled: input.is_enabled,
    }
}

/// Data-layer changes for a patch; the notification id is left untouched
pub fn convert_to_data_reminder_changes(patch: &ReminderPatch) -> ReminderChanges {
    ReminderChanges {
        label: patch.label.clone(),
        dosage: patch.dosage.clone(),
        time: patch.time.clone(),
        days_of_week: patch.days_of_week.as_ref().map(format_days_of_week),
        is_enabled: patch.is_enabled,
        notification_id: None,
    }
}

pub fn convert_to_domain_profile(row: ProfileRow) -> Result<UserProfile, ConversionError> {
    let gender = match row.gender.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse().map_err(|_| ConversionError::Value {
            column: "gender",
            value: raw.to_string(),
        })?),
    };

    Ok(UserProfile {
        name: row.name,
        age: row.age,
        gender,
        medical_conditions: row.medical_conditions,
        created_at: timestamp("created_at", &row.created_at)?,
        updated_at: timestamp("updated_at", &row.updated_at)?,
    })
}

pub fn convert_to_data_profile_changes(patch: UserProfilePatch) -> ProfileChanges {
    ProfileChanges {
        name: patch.name,
        age: patch.age,
        gender: patch.gender.map(|gender| gender.map(|g| g.as_str().to_string())),
        medical_conditions: patch.medical_conditions,
    }
}

pub fn convert_to_domain_settings(row: SettingsRow) -> Result<AppSettings, ConversionError> {
    let dark_mode: DarkMode = row.dark_mode.parse().map_err(|_| ConversionError::Value {
        column: "dark_mode",
        value: row.dark_mode.clone(),
    })?;

    Ok(AppSettings {
        pressure_unit: row.pressure_unit,
        notifications_enabled: row.notifications_enabled,
        abnormal_alert_enabled: row.abnormal_alert_enabled,
        bp_threshold: BPThreshold {
            high_systolic: row.bp_threshold_high_systolic,
            high_diastolic: row.bp_threshold_high_diastolic,
            low_systolic: row.bp_threshold_low_systolic,
            low_diastolic: row.bp_threshold_low_diastolic,
        },
        dark_mode,
        cloud_sync_enabled: row.cloud_sync_enabled,
        created_at: timestamp("created_at", &row.created_at)?,
        updated_at: timestamp("updated_at", &row.updated_at)?,
    })
}

/// The threshold is written as its four columns
pub fn convert_to_data_settings_changes(patch: AppSettingsPatch) -> SettingsChanges {
    let threshold = patch.bp_threshold;
    SettingsChanges {
        pressure_unit: patch.pressure_unit,
        notifications_enabled: patch.notifications_enabled,
        abnormal_alert_enabled: patch.abnormal_alert_enabled,
        bp_threshold_high_systolic: threshold.map(|t| t.high_systolic),
        bp_threshold_high_diastolic: threshold.map(|t| t.high_diastolic),
        bp_threshold_low_systolic: threshold.map(|t| t.low_systolic),
        bp_threshold_low_diastolic: threshold.map(|t| t.low_diastolic),
        dark_mode: patch.dark_mode.map(|mode| mode.as_str().to_string()),
        cloud_sync_enabled: patch.cloud_sync_enabled,
    }
}
