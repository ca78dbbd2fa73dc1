use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use bp_tracker_domain::entities::{describe_days, Reminder, ReminderInput, ReminderPatch};

use super::common::double_option;

/// Public representation of a reminder
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReminderResponse {
    pub id: i64,
    /// `medication` or `measurement`
    pub kind: String,
    /// Medication name or measurement reminder name
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    /// Local time of day, `HH:MM`
    pub time: String,
    /// Weekdays, 0 = Sunday
    pub days_of_week: Vec<u8>,
    /// `Every day`, `Weekdays`, `Weekends` or a day list
    pub days_description: String,
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderResponse {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            kind: reminder.kind.as_str().to_string(),
            label: reminder.label,
            dosage: reminder.dosage,
            time: reminder.time,
            days_description: describe_days(&reminder.days_of_week),
            days_of_week: reminder.days_of_week.into_iter().collect(),
            is_enabled: reminder.is_enabled,
            notification_id: reminder.notification_id,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateReminderRequest {
    pub label: String,
    /// Ignored for measurement reminders
    pub dosage: Option<String>,
    pub time: String,
    pub days_of_week: Vec<u8>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

impl From<CreateReminderRequest> for ReminderInput {
    fn from(request: CreateReminderRequest) -> Self {
        ReminderInput {
            label: request.label,
            dosage: request.dosage,
            time: request.time,
            days_of_week: request.days_of_week.into_iter().collect(),
            is_enabled: request.is_enabled,
        }
    }
}

/// Partial update. `null` clears the dosage.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateReminderRequest {
    pub label: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub dosage: Option<Option<String>>,
    pub time: Option<String>,
    pub days_of_week: Option<Vec<u8>>,
    pub is_enabled: Option<bool>,
}

impl From<UpdateReminderRequest> for ReminderPatch {
    fn from(request: UpdateReminderRequest) -> Self {
        ReminderPatch {
            label: request.label,
            dosage: request.dosage,
            time: request.time,
            days_of_week: request.days_of_week.map(|days| days.into_iter().collect()),
            is_enabled: request.is_enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToggleReminderRequest {
    pub enabled: bool,
}
