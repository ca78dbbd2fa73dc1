use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use bp_tracker_data::repository::SettingsRepositoryTrait;

use crate::entities::conversions::{
    convert_to_data_profile_changes, convert_to_data_settings_changes, convert_to_domain_profile,
    convert_to_domain_settings,
};
use crate::entities::{AppSettings, AppSettingsPatch, BPThreshold, UserProfile, UserProfilePatch};
use crate::errors::ServiceError;
use crate::services::validation::check;

/// Profile and settings singletons. Missing rows come back with defaults.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    async fn profile(&self) -> Result<UserProfile, ServiceError>;

    async fn update_profile(&self, patch: UserProfilePatch) -> Result<UserProfile, ServiceError>;

    async fn settings(&self) -> Result<AppSettings, ServiceError>;

    async fn update_settings(&self, patch: AppSettingsPatch) -> Result<AppSettings, ServiceError>;

    async fn threshold(&self) -> Result<BPThreshold, ServiceError>;

    async fn update_threshold(&self, threshold: BPThreshold) -> Result<BPThreshold, ServiceError>;
}

pub struct SettingsService {
    settings: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    async fn profile(&self) -> Result<UserProfile, ServiceError> {
        Ok(convert_to_domain_profile(self.settings.profile().await?)?)
    }

    async fn update_profile(&self, patch: UserProfilePatch) -> Result<UserProfile, ServiceError> {
        check(&patch)?;
        let row = self
            .settings
            .update_profile(convert_to_data_profile_changes(patch))
            .await?;
        info!("Profile updated");
        Ok(convert_to_domain_profile(row)?)
    }

    async fn settings(&self) -> Result<AppSettings, ServiceError> {
        Ok(convert_to_domain_settings(self.settings.settings().await?)?)
    }

    async fn update_settings(&self, patch: AppSettingsPatch) -> Result<AppSettings, ServiceError> {
        check(&patch)?;
        let row = self
            .settings
            .update_settings(convert_to_data_settings_changes(patch))
            .await?;
        info!("Settings updated");
        Ok(convert_to_domain_settings(row)?)
    }

    async fn threshold(&self) -> Result<BPThreshold, ServiceError> {
        Ok(self.settings().await?.bp_threshold)
    }

    async fn update_threshold(&self, threshold: BPThreshold) -> Result<BPThreshold, ServiceError> {
        let patch = AppSettingsPatch {
            bp_threshold: Some(threshold),
            ..AppSettingsPatch::default()
        };
        Ok(self.update_settings(patch).await?.bp_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_data::database::Database;
    use bp_tracker_data::repository::SqliteSettingsRepository;

    use crate::entities::{DarkMode, Gender};
    use crate::services::validation::ValidationField;

    fn service() -> SettingsService {
        let db = Database::open_in_memory().unwrap();
        SettingsService::new(Arc::new(SqliteSettingsRepository::new(db)))
    }

    #[tokio::test]
    async fn test_defaults() {
        let service = service();
        let settings = service.settings().await.unwrap();
        assert_eq!(settings.bp_threshold, BPThreshold::default());
        assert_eq!(settings.dark_mode, DarkMode::System);
        assert!(settings.abnormal_alert_enabled);

        let profile = service.profile().await.unwrap();
        assert!(profile.name.is_empty());
        assert!(profile.gender.is_none());
    }

    #[tokio::test]
    async fn test_update_threshold() {
        let service = service();
        let threshold = BPThreshold {
            high_systolic: 135,
            high_diastolic: 85,
            low_systolic: 95,
            low_diastolic: 65,
        };
        assert_eq!(service.update_threshold(threshold).await.unwrap(), threshold);
        assert_eq!(service.threshold().await.unwrap(), threshold);
    }

    #[tokio::test]
    async fn test_inverted_threshold_is_rejected() {
        let service = service();
        let err = service
            .update_threshold(BPThreshold {
                low_systolic: 150,
                ..BPThreshold::default()
            })
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(report) => assert!(report.message(ValidationField::BpThreshold).is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.threshold().await.unwrap(), BPThreshold::default());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let service = service();
        let profile = service
            .update_profile(UserProfilePatch {
                name: Some("Somchai".to_string()),
                age: Some(Some(64)),
                gender: Some(Some(Gender::Male)),
                ..UserProfilePatch::default()
            })
            .await
            .unwrap();
        assert_eq!(profile.name, "Somchai");
        assert_eq!(profile.age, Some(64));
        assert_eq!(profile.gender, Some(Gender::Male));

        let err = service
            .update_profile(UserProfilePatch {
                age: Some(Some(200)),
                ..UserProfilePatch::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_settings_keeps_other_fields() {
        let service = service();
        let settings = service
            .update_settings(AppSettingsPatch {
                dark_mode: Some(DarkMode::Dark),
                abnormal_alert_enabled: Some(false),
                ..AppSettingsPatch::default()
            })
            .await
            .unwrap();
        assert_eq!(settings.dark_mode, DarkMode::Dark);
        assert!(!settings.abnormal_alert_enabled);
        assert!(settings.notifications_enabled);
        assert_eq!(settings.pressure_unit, "mmHg");
    }
}
