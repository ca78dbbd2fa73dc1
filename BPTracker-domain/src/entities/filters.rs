use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Inclusive range of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DateRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Named shorthand for a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum DateRangePreset {
    #[serde(rename = "7_days")]
    Last7Days,
    #[serde(rename = "30_days")]
    Last30Days,
    #[serde(rename = "90_days")]
    Last90Days,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "last_month")]
    LastMonth,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "all")]
    All,
}

/// What to list: a preset or an explicit range, plus pagination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub preset: Option<DateRangePreset>,
    pub date_range: Option<DateRange>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl RecordFilter {
    pub fn preset(preset: DateRangePreset) -> Self {
        Self {
            preset: Some(preset),
            ..Self::default()
        }
    }

    pub fn range(date_range: DateRange) -> Self {
        Self {
            date_range: Some(date_range),
            ..Self::default()
        }
    }
}
