use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Configurable cut points used by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[validate(schema(function = "validate_threshold_order"))]
pub struct BPThreshold {
    #[validate(range(min = 60, max = 250, message = "High systolic must be between 60 and 250"))]
    pub high_systolic: i32,
    #[validate(range(min = 40, max = 150, message = "High diastolic must be between 40 and 150"))]
    pub high_diastolic: i32,
    #[validate(range(min = 40, max = 250, message = "Low systolic must be between 40 and 250"))]
    pub low_systolic: i32,
    #[validate(range(min = 20, max = 150, message = "Low diastolic must be between 20 and 150"))]
    pub low_diastolic: i32,
}

impl Default for BPThreshold {
    fn default() -> Self {
        Self {
            high_systolic: 140,
            high_diastolic: 90,
            low_systolic: 90,
            low_diastolic: 60,
        }
    }
}

fn validate_threshold_order(threshold: &BPThreshold) -> Result<(), ValidationError> {
    if threshold.low_systolic >= threshold.high_systolic || threshold.low_diastolic >= threshold.high_diastolic {
        let mut error = ValidationError::new("threshold_order");
        error.message = Some("Low limits must be below high limits".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DarkMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl DarkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DarkMode::System => "system",
            DarkMode::Light => "light",
            DarkMode::Dark => "dark",
        }
    }
}

impl FromStr for DarkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(DarkMode::System),
            "light" => Ok(DarkMode::Light),
            "dark" => Ok(DarkMode::Dark),
            other => Err(format!("unknown dark mode: {other}")),
        }
    }
}

impl fmt::Display for DarkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer_not_to_say",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer_not_to_say" => Ok(Gender::PreferNotToSay),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// Application settings singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub pressure_unit: String,
    pub notifications_enabled: bool,
    /// Fire an immediate notification when a saved reading needs attention
    pub abnormal_alert_enabled: bool,
    pub bp_threshold: BPThreshold,
    pub dark_mode: DarkMode,
    pub cloud_sync_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct AppSettingsPatch {
    #[validate(length(min = 1, max = 16, message = "Pressure unit cannot be empty"))]
    pub pressure_unit: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub abnormal_alert_enabled: Option<bool>,
    #[validate]
    pub bp_threshold: Option<BPThreshold>,
    pub dark_mode: Option<DarkMode>,
    pub cloud_sync_enabled: Option<bool>,
}

/// User profile singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub medical_conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UserProfilePatch {
    #[validate(length(max = 100, message = "Name cannot exceed 100 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<Option<i32>>,
    pub gender: Option<Option<Gender>>,
    #[validate(length(max = 1000, message = "Medical conditions cannot exceed 1000 characters"))]
    pub medical_conditions: Option<Option<String>>,
}
