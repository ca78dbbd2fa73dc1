use serde::{Deserialize, Serialize};

/// Singleton `user_profile` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub medical_conditions: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub age: Option<Option<i32>>,
    pub gender: Option<Option<String>>,
    pub medical_conditions: Option<Option<String>>,
}

/// Singleton `app_settings` row; the threshold is stored as four columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow {
    pub pressure_unit: String,
    pub notifications_enabled: bool,
    pub abnormal_alert_enabled: bool,
    pub bp_threshold_high_systolic: i32,
    pub bp_threshold_high_diastolic: i32,
    pub bp_threshold_low_systolic: i32,
    pub bp_threshold_low_diastolic: i32,
    pub dark_mode: String,
    pub cloud_sync_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsChanges {
    pub pressure_unit: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub abnormal_alert_enabled: Option<bool>,
    pub bp_threshold_high_systolic: Option<i32>,
    pub bp_threshold_high_diastolic: Option<i32>,
    pub bp_threshold_low_systolic: Option<i32>,
    pub bp_threshold_low_diastolic: Option<i32>,
    pub dark_mode: Option<String>,
    pub cloud_sync_enabled: Option<bool>,
}
