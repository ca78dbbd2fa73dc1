// Testing utilities for crates built on the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::Arc;

use bp_tracker_data::database::{Database, DatabaseError};
use bp_tracker_data::repository::{SqliteRecordRepository, SqliteReminderRepository, SqliteSettingsRepository};

use crate::health::HealthService;
use crate::notifications::{LogNotifier, ReminderScheduler};
use crate::services::{RecordService, ReminderService, SettingsService};

/// Real services over a fresh in-memory database, with the notifier exposed
pub struct TestServices {
    pub db: Database,
    pub notifier: Arc<LogNotifier>,
    pub records: Arc<RecordService>,
    pub reminders: Arc<ReminderService>,
    pub settings: Arc<SettingsService>,
    pub health: Arc<HealthService>,
}

impl TestServices {
    pub fn new() -> Result<Self, DatabaseError> {
        let db = Database::open_in_memory()?;
        let notifier = Arc::new(LogNotifier::new());
        let settings_repo = Arc::new(SqliteSettingsRepository::new(db.clone()));

        Ok(Self {
            records: Arc::new(RecordService::new(
                Arc::new(SqliteRecordRepository::new(db.clone())),
                settings_repo.clone(),
                notifier.clone(),
            )),
            reminders: Arc::new(ReminderService::new(
                Arc::new(SqliteReminderRepository::new(db.clone())),
                ReminderScheduler::new(notifier.clone()),
            )),
            settings: Arc::new(SettingsService::new(settings_repo)),
            health: Arc::new(HealthService::new(db.clone())),
            notifier,
            db,
        })
    }
}
