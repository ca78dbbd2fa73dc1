use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two reminder tables share a layout apart from the label column and dosage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Medication,
    Measurement,
}

impl ReminderKind {
    pub fn table(self) -> &'static str {
        match self {
            ReminderKind::Medication => "medication_reminders",
            ReminderKind::Measurement => "measurement_reminders",
        }
    }

    pub fn label_column(self) -> &'static str {
        match self {
            ReminderKind::Medication => "medication_name",
            ReminderKind::Measurement => "name",
        }
    }

    pub fn has_dosage(self) -> bool {
        matches!(self, ReminderKind::Medication)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderKind::Medication => "medication",
            ReminderKind::Measurement => "measurement",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medication" => Ok(ReminderKind::Medication),
            "measurement" => Ok(ReminderKind::Measurement),
            other => Err(format!("unknown reminder kind: {other}")),
        }
    }
}

/// Storage model for either reminder table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRow {
    pub id: i64,
    pub kind: ReminderKind,
    /// `medication_name` or `name`, depending on the kind
    pub label: String,
    /// Always `None` for measurement reminders
    pub dosage: Option<String>,
    /// Local wall-clock time, `HH:MM`
    pub time: String,
    /// Comma separated weekday numbers, 0 = Sunday
    pub days_of_week: String,
    pub is_enabled: bool,
    pub notification_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub label: String,
    pub dosage: Option<String>,
    pub time: String,
    pub days_of_week: String,
    pub is_enabled: bool,
}

/// Partial update for a reminder row. Nested options distinguish "leave" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderChanges {
    pub label: Option<String>,
    pub dosage: Option<Option<String>>,
    pub time: Option<String>,
    pub days_of_week: Option<String>,
    pub is_enabled: Option<bool>,
    pub notification_id: Option<Option<String>>,
}
