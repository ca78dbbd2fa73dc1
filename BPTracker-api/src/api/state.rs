use std::path::Path;
use std::sync::Arc;

use bp_tracker_data::database::Database;
use bp_tracker_data::files::ImageStore;
use bp_tracker_data::repository::{SqliteRecordRepository, SqliteReminderRepository, SqliteSettingsRepository};
use bp_tracker_domain::health::{HealthService, HealthServiceTrait};
use bp_tracker_domain::notifications::{Notifier, ReminderScheduler};
use bp_tracker_domain::services::{
    RecordService, RecordServiceTrait, ReminderService, ReminderServiceTrait, SettingsService, SettingsServiceTrait,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordServiceTrait>,
    pub reminders: Arc<dyn ReminderServiceTrait>,
    pub settings: Arc<dyn SettingsServiceTrait>,
    pub health: Arc<dyn HealthServiceTrait>,
    pub images: ImageStore,
}

impl AppState {
    /// Wire the SQLite stores, the notifier and the image directory under `data_dir`
    pub fn new(db: Database, notifier: Arc<dyn Notifier>, data_dir: impl AsRef<Path>) -> Self {
        let settings_repo = Arc::new(SqliteSettingsRepository::new(db.clone()));

        Self {
            records: Arc::new(RecordService::new(
                Arc::new(SqliteRecordRepository::new(db.clone())),
                settings_repo.clone(),
                notifier.clone(),
            )),
            reminders: Arc::new(ReminderService::new(
                Arc::new(SqliteReminderRepository::new(db.clone())),
                ReminderScheduler::new(notifier),
            )),
            settings: Arc::new(SettingsService::new(settings_repo)),
            health: Arc::new(HealthService::new(db)),
            images: ImageStore::new(data_dir),
        }
    }
}
