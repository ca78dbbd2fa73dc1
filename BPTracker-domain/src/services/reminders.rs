use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use bp_tracker_data::models::ReminderChanges;
use bp_tracker_data::repository::ReminderRepositoryTrait;

use crate::entities::conversions::{
    convert_to_data_new_reminder, convert_to_data_reminder_changes, convert_to_domain_reminder,
};
use crate::entities::{Reminder, ReminderInput, ReminderKind, ReminderPatch};
use crate::errors::ServiceError;
use crate::notifications::{NotificationError, ReminderScheduler};
use crate::services::validation::check;

/// Reminder operations for both kinds.
///
/// Store writes and notifier calls are sequenced but not atomic: a failure between
/// them can leave a stored reminder without a scheduled notification.
#[async_trait]
pub trait ReminderServiceTrait: Send + Sync {
    /// Store a reminder and schedule it when enabled
    async fn add(&self, kind: ReminderKind, input: ReminderInput) -> Result<Reminder, ServiceError>;

    /// Apply a patch and reschedule when what the notification shows or when it fires changes
    async fn edit(&self, kind: ReminderKind, id: i64, patch: ReminderPatch) -> Result<Reminder, ServiceError>;

    /// Enable or disable. The old notification is cancelled before anything is rescheduled.
    async fn toggle(&self, kind: ReminderKind, id: i64, enabled: bool) -> Result<Reminder, ServiceError>;

    /// Cancel the notification, then delete
    async fn remove(&self, kind: ReminderKind, id: i64) -> Result<(), ServiceError>;

    async fn get(&self, kind: ReminderKind, id: i64) -> Result<Reminder, ServiceError>;

    /// Ordered by time of day
    async fn list(&self, kind: ReminderKind) -> Result<Vec<Reminder>, ServiceError>;

    async fn list_enabled(&self, kind: ReminderKind) -> Result<Vec<Reminder>, ServiceError>;
}

pub struct ReminderService {
    reminders: Arc<dyn ReminderRepositoryTrait>,
    scheduler: ReminderScheduler,
}

impl ReminderService {
    pub fn new(reminders: Arc<dyn ReminderRepositoryTrait>, scheduler: ReminderScheduler) -> Self {
        Self { reminders, scheduler }
    }

    async fn store_notification_id(
        &self,
        kind: ReminderKind,
        id: i64,
        notification_id: Option<String>,
    ) -> Result<(), ServiceError> {
        let changes = ReminderChanges {
            notification_id: Some(notification_id),
            ..ReminderChanges::default()
        };
        if !self.reminders.update(kind, id, changes).await? {
            return Err(ServiceError::not_found("Reminder", id));
        }
        Ok(())
    }

    /// Cancel whatever is scheduled and schedule again when enabled.
    ///
    /// The stored notification id always ends up matching what was scheduled, even
    /// when permission is missing and the denial is returned.
    async fn reschedule(&self, reminder: &Reminder) -> Result<(), ServiceError> {
        self.scheduler.cancel(reminder.notification_id.as_deref()).await;

        let (notification_id, denied) = if reminder.is_enabled {
            match self.scheduler.schedule(reminder).await {
                Ok(id) => (id, None),
                Err(err @ NotificationError::PermissionDenied) => (None, Some(err)),
                Err(err) => {
                    warn!("Reminder {} could not be scheduled: {}", reminder.id, err);
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        self.store_notification_id(reminder.kind, reminder.id, notification_id)
            .await?;
        match denied {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReminderServiceTrait for ReminderService {
    async fn add(&self, kind: ReminderKind, mut input: ReminderInput) -> Result<Reminder, ServiceError> {
        check(&input)?;
        if !kind.has_dosage() {
            input.dosage = None;
        }

        let id = self
            .reminders
            .create(kind, convert_to_data_new_reminder(&input))
            .await?;
        info!("Created {} reminder {}", kind, id);

        let reminder = self.get(kind, id).await?;
        if reminder.is_enabled {
            self.reschedule(&reminder).await?;
        }
        self.get(kind, id).await
    }

    async fn edit(&self, kind: ReminderKind, id: i64, patch: ReminderPatch) -> Result<Reminder, ServiceError> {
        check(&patch)?;
        // Surfaces NotFound before any write
        self.get(kind, id).await?;

        let needs_reschedule =
            patch.changes_schedule() || patch.label.is_some() || patch.dosage.is_some() || patch.is_enabled.is_some();

        if !self
            .reminders
            .update(kind, id, convert_to_data_reminder_changes(&patch))
            .await?
        {
            return Err(ServiceError::not_found("Reminder", id));
        }
        info!("Updated {} reminder {}", kind, id);

        if needs_reschedule {
            let updated = self.get(kind, id).await?;
            self.reschedule(&updated).await?;
        }
        self.get(kind, id).await
    }

    async fn toggle(&self, kind: ReminderKind, id: i64, enabled: bool) -> Result<Reminder, ServiceError> {
        let existing = self.get(kind, id).await?;

        let changes = ReminderChanges {
            is_enabled: Some(enabled),
            ..ReminderChanges::default()
        };
        if !self.reminders.update(kind, id, changes).await? {
            return Err(ServiceError::not_found("Reminder", id));
        }

        let toggled = Reminder {
            is_enabled: enabled,
            ..existing
        };
        self.reschedule(&toggled).await?;
        info!("{} reminder {} {}", kind, id, if enabled { "enabled" } else { "disabled" });
        self.get(kind, id).await
    }

    async fn remove(&self, kind: ReminderKind, id: i64) -> Result<(), ServiceError> {
        let existing = self.get(kind, id).await?;
        self.scheduler.cancel(existing.notification_id.as_deref()).await;

        if !self.reminders.delete(kind, id).await? {
            return Err(ServiceError::not_found("Reminder", id));
        }
        info!("Deleted {} reminder {}", kind, id);
        Ok(())
    }

    async fn get(&self, kind: ReminderKind, id: i64) -> Result<Reminder, ServiceError> {
        let row = self
            .reminders
            .get_by_id(kind, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Reminder", id))?;
        Ok(convert_to_domain_reminder(row)?)
    }

    async fn list(&self, kind: ReminderKind) -> Result<Vec<Reminder>, ServiceError> {
        let rows = self.reminders.list(kind).await?;
        Ok(rows
            .into_iter()
            .map(convert_to_domain_reminder)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn list_enabled(&self, kind: ReminderKind) -> Result<Vec<Reminder>, ServiceError> {
        let rows = self.reminders.list_enabled(kind).await?;
        Ok(rows
            .into_iter()
            .map(convert_to_domain_reminder)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_data::database::Database;
    use bp_tracker_data::repository::SqliteReminderRepository;

    use crate::entities::ALL_DAYS;
    use crate::notifications::LogNotifier;
    use crate::services::validation::ValidationField;

    fn fixture() -> (ReminderService, Arc<LogNotifier>) {
        let db = Database::open_in_memory().unwrap();
        let notifier = Arc::new(LogNotifier::new());
        let service = ReminderService::new(
            Arc::new(SqliteReminderRepository::new(db)),
            ReminderScheduler::new(notifier.clone()),
        );
        (service, notifier)
    }

    fn medication(time: &str, days: &[u8], enabled: bool) -> ReminderInput {
        ReminderInput {
            label: "Amlodipine".to_string(),
            dosage: Some("5 mg".to_string()),
            time: time.to_string(),
            days_of_week: days.iter().copied().collect(),
            is_enabled: enabled,
        }
    }

    #[tokio::test]
    async fn test_add_enabled_schedules_each_day() {
        let (service, notifier) = fixture();
        let reminder = service
            .add(ReminderKind::Medication, medication("08:00", &ALL_DAYS, true))
            .await
            .unwrap();

        let id = reminder.notification_id.clone().unwrap();
        assert!(notifier.is_scheduled(&id));
        assert_eq!(notifier.scheduled().len(), 7);
        assert_eq!(reminder.dosage.as_deref(), Some("5 mg"));
    }

    #[tokio::test]
    async fn test_add_disabled_schedules_nothing() {
        let (service, notifier) = fixture();
        let reminder = service
            .add(ReminderKind::Medication, medication("08:00", &[1], false))
            .await
            .unwrap();
        assert!(reminder.notification_id.is_none());
        assert!(notifier.scheduled().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let (service, _) = fixture();
        let err = service
            .add(ReminderKind::Measurement, medication("8:00", &[], true))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(report) => {
                assert!(report.message(ValidationField::Time).is_some());
                assert!(report.message(ValidationField::DaysOfWeek).is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(service.list(ReminderKind::Measurement).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_measurement_drops_dosage() {
        let (service, _) = fixture();
        let reminder = service
            .add(ReminderKind::Measurement, medication("07:30", &[1, 3, 5], true))
            .await
            .unwrap();
        assert_eq!(reminder.kind, ReminderKind::Measurement);
        assert_eq!(reminder.dosage, None);
    }

    #[tokio::test]
    async fn test_toggle_off_then_on_gets_fresh_id() {
        let (service, notifier) = fixture();
        let reminder = service
            .add(ReminderKind::Medication, medication("08:00", &[1], true))
            .await
            .unwrap();
        let first_id = reminder.notification_id.clone().unwrap();

        let off = service.toggle(ReminderKind::Medication, reminder.id, false).await.unwrap();
        assert!(!off.is_enabled);
        assert!(off.notification_id.is_none());
        assert!(!notifier.is_scheduled(&first_id));

        let on = service.toggle(ReminderKind::Medication, reminder.id, true).await.unwrap();
        let second_id = on.notification_id.unwrap();
        assert_ne!(second_id, first_id);
        assert!(notifier.is_scheduled(&second_id));
    }

    #[tokio::test]
    async fn test_edit_time_reschedules() {
        let (service, notifier) = fixture();
        let reminder = service
            .add(ReminderKind::Medication, medication("08:00", &[2], true))
            .await
            .unwrap();
        let old_id = reminder.notification_id.clone().unwrap();

        let edited = service
            .edit(
                ReminderKind::Medication,
                reminder.id,
                ReminderPatch {
                    time: Some("20:45".to_string()),
                    ..ReminderPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.time, "20:45");
        let new_id = edited.notification_id.unwrap();
        assert_ne!(new_id, old_id);
        assert!(!notifier.is_scheduled(&old_id));

        let scheduled = notifier.scheduled();
        assert_eq!(scheduled.len(), 1);
        assert_eq!((scheduled[0].trigger.hour, scheduled[0].trigger.minute), (20, 45));
    }

    #[tokio::test]
    async fn test_edit_without_schedule_change_keeps_id() {
        let (service, _) = fixture();
        let reminder = service
            .add(ReminderKind::Medication, medication("08:00", &[2], true))
            .await
            .unwrap();

        let edited = service
            .edit(ReminderKind::Medication, reminder.id, ReminderPatch::default())
            .await
            .unwrap();
        assert_eq!(edited.notification_id, reminder.notification_id);
    }

    #[tokio::test]
    async fn test_remove_cancels() {
        let (service, notifier) = fixture();
        let reminder = service
            .add(ReminderKind::Medication, medication("08:00", &[4], true))
            .await
            .unwrap();

        service.remove(ReminderKind::Medication, reminder.id).await.unwrap();
        assert!(notifier.scheduled().is_empty());
        assert!(matches!(
            service.get(ReminderKind::Medication, reminder.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_permission_denied_keeps_reminder() {
        let (service, notifier) = fixture();
        notifier.set_permission(false);

        let err = service
            .add(ReminderKind::Medication, medication("08:00", &[1], true))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Permission(_)));

        let stored = service.list(ReminderKind::Medication).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].notification_id.is_none());
    }

    #[tokio::test]
    async fn test_list_enabled_by_time() {
        let (service, _) = fixture();
        service
            .add(ReminderKind::Medication, medication("21:00", &[1], true))
            .await
            .unwrap();
        service
            .add(ReminderKind::Medication, medication("07:00", &[1], true))
            .await
            .unwrap();
        service
            .add(ReminderKind::Medication, medication("12:00", &[1], false))
            .await
            .unwrap();

        let times: Vec<String> = service
            .list(ReminderKind::Medication)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.time)
            .collect();
        assert_eq!(times, vec!["07:00", "12:00", "21:00"]);

        let enabled = service.list_enabled(ReminderKind::Medication).await.unwrap();
        assert_eq!(enabled.len(), 2);
        assert!(service.list(ReminderKind::Measurement).await.unwrap().is_empty());
    }
}
