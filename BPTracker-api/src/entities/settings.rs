use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use bp_tracker_domain::entities::{
    AppSettings, AppSettingsPatch, BPThreshold, DarkMode, Gender, UserProfile, UserProfilePatch,
};

use super::common::double_option;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub medical_conditions: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: profile.name,
            age: profile.age,
            gender: profile.gender,
            medical_conditions: profile.medical_conditions,
            updated_at: profile.updated_at,
        }
    }
}

/// Partial profile update. `null` clears the optional fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Gender>)]
    pub gender: Option<Option<Gender>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub medical_conditions: Option<Option<String>>,
}

impl From<UpdateProfileRequest> for UserProfilePatch {
    fn from(request: UpdateProfileRequest) -> Self {
        UserProfilePatch {
            name: request.name,
            age: request.age,
            gender: request.gender,
            medical_conditions: request.medical_conditions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub pressure_unit: String,
    pub notifications_enabled: bool,
    pub abnormal_alert_enabled: bool,
    pub bp_threshold: BPThreshold,
    pub dark_mode: DarkMode,
    pub cloud_sync_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<AppSettings> for SettingsResponse {
    fn from(settings: AppSettings) -> Self {
        Self {
            pressure_unit: settings.pressure_unit,
            notifications_enabled: settings.notifications_enabled,
            abnormal_alert_enabled: settings.abnormal_alert_enabled,
            bp_threshold: settings.bp_threshold,
            dark_mode: settings.dark_mode,
            cloud_sync_enabled: settings.cloud_sync_enabled,
            updated_at: settings.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub pressure_unit: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub abnormal_alert_enabled: Option<bool>,
    pub bp_threshold: Option<BPThreshold>,
    pub dark_mode: Option<DarkMode>,
    pub cloud_sync_enabled: Option<bool>,
}

impl From<UpdateSettingsRequest> for AppSettingsPatch {
    fn from(request: UpdateSettingsRequest) -> Self {
        AppSettingsPatch {
            pressure_unit: request.pressure_unit,
            notifications_enabled: request.notifications_enabled,
            abnormal_alert_enabled: request.abnormal_alert_enabled,
            bp_threshold: request.bp_threshold,
            dark_mode: request.dark_mode,
            cloud_sync_enabled: request.cloud_sync_enabled,
        }
    }
}
