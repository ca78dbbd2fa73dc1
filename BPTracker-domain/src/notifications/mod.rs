//! Notification port.
//!
//! The OS notification scheduler is an external collaborator reached through the
//! [`Notifier`] trait. [`LogNotifier`] is the in-process implementation used when no
//! platform scheduler is attached, and by tests.

mod log_notifier;
mod scheduler;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{Reminder, ReminderKind};
use crate::services::classification::format_reading_with_unit;

pub use log_notifier::{LogNotifier, ScheduledNotification};
pub use scheduler::ReminderScheduler;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// The user has not granted notification permission
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The scheduler rejected or lost the request
    #[error("Notification scheduling failed: {0}")]
    Failed(String),
}

/// What a notification is about, carried in its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Medication,
    Measurement,
    AbnormalBp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub data: NotificationPayload,
}

/// Repeats every week on `weekday` (1-7, Sunday = 1) at `hour:minute` local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTrigger {
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
}

impl WeeklyTrigger {
    /// Trigger for a stored weekday (0 = Sunday)
    pub fn for_day(day: u8, hour: u32, minute: u32) -> Self {
        Self {
            weekday: u32::from(day) + 1,
            hour,
            minute,
        }
    }
}

/// External notification scheduler
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Schedule a weekly notification and return its external id
    async fn schedule_weekly(
        &self,
        content: &NotificationContent,
        trigger: WeeklyTrigger,
    ) -> Result<String, NotificationError>;

    /// Cancel a scheduled notification. Unknown ids are not an error.
    async fn cancel(&self, external_id: &str) -> Result<(), NotificationError>;

    /// Cancel everything this application scheduled
    async fn cancel_all(&self) -> Result<(), NotificationError>;

    /// Deliver a notification now
    async fn fire_immediate(&self, content: &NotificationContent) -> Result<String, NotificationError>;
}

/// Content of the weekly notification for a reminder
pub fn reminder_content(reminder: &Reminder) -> NotificationContent {
    let (title, body, kind) = match reminder.kind {
        ReminderKind::Medication => {
            let body = match reminder.dosage.as_deref().filter(|d| !d.is_empty()) {
                Some(dosage) => format!("{} ({})", reminder.label, dosage),
                None => reminder.label.clone(),
            };
            ("Time to take your medication", body, NotificationType::Medication)
        }
        ReminderKind::Measurement => {
            let body = if reminder.label.is_empty() {
                "Don't forget to record your blood pressure today".to_string()
            } else {
                reminder.label.clone()
            };
            ("Time to measure your blood pressure", body, NotificationType::Measurement)
        }
    };

    NotificationContent {
        title: title.to_string(),
        body,
        data: NotificationPayload {
            kind,
            record_id: None,
            reminder_id: Some(reminder.id),
        },
    }
}

/// Content of the immediate alert after an abnormal reading is saved
pub fn abnormal_alert_content(systolic: i32, diastolic: i32, record_id: Option<i64>) -> NotificationContent {
    NotificationContent {
        title: "Abnormal blood pressure!".to_string(),
        body: format!(
            "Blood pressure {} needs attention. Please consult a doctor.",
            format_reading_with_unit(systolic, diastolic, "mmHg")
        ),
        data: NotificationPayload {
            kind: NotificationType::AbnormalBp,
            record_id,
            reminder_id: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reminder(kind: ReminderKind, label: &str, dosage: Option<&str>) -> Reminder {
        Reminder {
            id: 3,
            kind,
            label: label.to_string(),
            dosage: dosage.map(str::to_string),
            time: "08:00".to_string(),
            days_of_week: [1].into_iter().collect(),
            is_enabled: true,
            notification_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_medication_content() {
        let content = reminder_content(&reminder(ReminderKind::Medication, "Amlodipine", Some("5 mg")));
        assert_eq!(content.body, "Amlodipine (5 mg)");
        assert_eq!(content.data.kind, NotificationType::Medication);
        assert_eq!(content.data.reminder_id, Some(3));

        let content = reminder_content(&reminder(ReminderKind::Medication, "Amlodipine", None));
        assert_eq!(content.body, "Amlodipine");
    }

    #[test]
    fn test_measurement_content_falls_back_when_unnamed() {
        let content = reminder_content(&reminder(ReminderKind::Measurement, "", None));
        assert_eq!(content.body, "Don't forget to record your blood pressure today");
        assert_eq!(content.title, "Time to measure your blood pressure");
    }

    #[test]
    fn test_abnormal_alert_payload() {
        let content = abnormal_alert_content(185, 100, Some(12));
        assert!(content.body.starts_with("Blood pressure 185/100 mmHg"));

        let payload = serde_json::to_value(&content.data).unwrap();
        assert_eq!(payload, serde_json::json!({"type": "abnormal_bp", "record_id": 12}));
    }

    #[test]
    fn test_weekday_numbering_starts_at_sunday_one() {
        assert_eq!(WeeklyTrigger::for_day(0, 8, 30).weekday, 1);
        assert_eq!(WeeklyTrigger::for_day(6, 8, 30).weekday, 7);
    }
}
