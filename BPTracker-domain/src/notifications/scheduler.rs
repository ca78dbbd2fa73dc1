use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{reminder_content, NotificationError, Notifier, WeeklyTrigger};
use crate::entities::Reminder;

/// Turns reminders into weekly notifications.
///
/// One notification is scheduled per selected weekday. Only the first external id
/// is returned, so later cancellation reaches that notification alone.
#[derive(Clone)]
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Schedule the reminder on each of its weekdays.
    ///
    /// A weekday that fails is logged and skipped. When no weekday could be
    /// scheduled because permission is missing, the denial is returned.
    pub async fn schedule(&self, reminder: &Reminder) -> Result<Option<String>, NotificationError> {
        let (hour, minute) = reminder
            .hour_minute()
            .ok_or_else(|| NotificationError::Failed(format!("invalid reminder time {:?}", reminder.time)))?;
        let content = reminder_content(reminder);

        let mut first_id = None;
        let mut denied = false;
        for day in &reminder.days_of_week {
            let trigger = WeeklyTrigger::for_day(*day, hour, minute);
            match self.notifier.schedule_weekly(&content, trigger).await {
                Ok(id) => {
                    debug!("Reminder {} scheduled for weekday {} as {}", reminder.id, trigger.weekday, id);
                    first_id.get_or_insert(id);
                }
                Err(err) => {
                    warn!("Failed to schedule reminder {} on day {}: {}", reminder.id, day, err);
                    denied |= err == NotificationError::PermissionDenied;
                }
            }
        }

        match first_id {
            Some(id) => {
                info!("Reminder {} scheduled with notification {}", reminder.id, id);
                Ok(Some(id))
            }
            None if denied => Err(NotificationError::PermissionDenied),
            None => Ok(None),
        }
    }

    /// Cancel a stored notification id. Failures are logged only.
    pub async fn cancel(&self, notification_id: Option<&str>) {
        let Some(id) = notification_id else {
            return;
        };
        if let Err(err) = self.notifier.cancel(id).await {
            warn!("Failed to cancel notification {}: {}", id, err);
        }
    }
}
