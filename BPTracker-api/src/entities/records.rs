use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use bp_tracker_domain::entities::{
    BPRecord, BPRecordInput, BPRecordPatch, BPStatistics, BPStatus, BPStatusInfo, DateRange, DateRangePreset,
    RecordFilter,
};
use bp_tracker_domain::services::ValidationReport;

use super::common::double_option;

/// Public representation of a blood pressure record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordResponse {
    pub id: i64,
    /// Systolic pressure (the higher number), mmHg
    pub systolic: i32,
    /// Diastolic pressure (the lower number), mmHg
    pub diastolic: i32,
    /// Pulse in beats per minute
    pub pulse: i32,
    /// When the reading was taken
    pub measured_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Status against the stored threshold
    pub status: BPStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordResponse {
    pub fn from_domain(record: BPRecord, status: BPStatus) -> Self {
        Self {
            id: record.id,
            systolic: record.systolic,
            diastolic: record.diastolic,
            pulse: record.pulse,
            measured_at: record.measured_at,
            note: record.note,
            image_path: record.image_path,
            status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Request payload for a new reading
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRecordRequest {
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
    /// When the reading was taken. Defaults to now.
    pub measured_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    /// Permanent path returned by `POST /api/v1/images`
    pub image_path: Option<String>,
}

impl From<CreateRecordRequest> for BPRecordInput {
    fn from(request: CreateRecordRequest) -> Self {
        BPRecordInput {
            systolic: request.systolic,
            diastolic: request.diastolic,
            pulse: request.pulse,
            measured_at: request.measured_at,
            note: request.note,
            image_path: request.image_path,
        }
    }
}

/// Partial update. Omitted fields stay; `null` clears `note` or `image_path`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRecordRequest {
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub pulse: Option<i32>,
    pub measured_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub note: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_path: Option<Option<String>>,
}

impl From<UpdateRecordRequest> for BPRecordPatch {
    fn from(request: UpdateRecordRequest) -> Self {
        BPRecordPatch {
            systolic: request.systolic,
            diastolic: request.diastolic,
            pulse: request.pulse,
            measured_at: request.measured_at,
            note: request.note,
            image_path: request.image_path,
        }
    }
}

/// Which records to return
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RecordListQuery {
    /// `7_days`, `30_days`, `90_days`, `this_month`, `last_month`, `custom` or `all`.
    /// Any preset other than `all` overrides the explicit dates.
    pub preset: Option<DateRangePreset>,
    /// Inclusive start, RFC 3339. Requires `end_date`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive end, RFC 3339. Requires `start_date`.
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl RecordListQuery {
    /// Domain filter; `None` when only one end of the range is given
    pub fn to_filter(&self) -> Option<RecordFilter> {
        let date_range = match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) => Some(DateRange { start_date, end_date }),
            (None, None) => None,
            _ => return None,
        };
        Some(RecordFilter {
            preset: self.preset,
            date_range,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Aggregates over a set of records
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub total: u64,
    pub has_data: bool,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    pub max_systolic: i32,
    pub min_systolic: i32,
    pub max_diastolic: i32,
    pub min_diastolic: i32,
    pub max_pulse: i32,
    pub min_pulse: i32,
    /// Below 120/80
    pub normal_count: u64,
    /// 120-129 systolic with diastolic below 80
    pub elevated_count: u64,
    /// 130 systolic or 80 diastolic and above
    pub hypertension_count: u64,
}

impl From<BPStatistics> for StatisticsResponse {
    fn from(stats: BPStatistics) -> Self {
        Self {
            total: stats.total,
            has_data: stats.has_data(),
            avg_systolic: stats.avg_systolic,
            avg_diastolic: stats.avg_diastolic,
            avg_pulse: stats.avg_pulse,
            max_systolic: stats.max_systolic,
            min_systolic: stats.min_systolic,
            max_diastolic: stats.max_diastolic,
            min_diastolic: stats.min_diastolic,
            max_pulse: stats.max_pulse,
            min_pulse: stats.min_pulse,
            normal_count: stats.normal_count,
            elevated_count: stats.elevated_count,
            hypertension_count: stats.hypertension_count,
        }
    }
}

/// One point of the trend chart
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    pub id: i64,
    pub measured_at: DateTime<Utc>,
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
}

impl From<BPRecord> for ChartPoint {
    fn from(record: BPRecord) -> Self {
        Self {
            id: record.id,
            measured_at: record.measured_at,
            systolic: record.systolic,
            diastolic: record.diastolic,
            pulse: record.pulse,
        }
    }
}

/// Status band with its display data
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: BPStatus,
    pub label: String,
    /// Thai label
    pub label_th: String,
    /// Hex RGB color
    pub color: String,
    pub description: String,
}

impl From<&BPStatusInfo> for StatusResponse {
    fn from(info: &BPStatusInfo) -> Self {
        Self {
            status: info.status,
            label: info.label.to_string(),
            label_th: info.label_th.to_string(),
            color: info.color.to_string(),
            description: info.description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ClassifyQuery {
    pub systolic: i32,
    pub diastolic: i32,
}

/// Classification of an ad hoc reading
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    /// `120/80` form
    pub reading: String,
    #[serde(flatten)]
    pub status: StatusResponse,
    /// Whether saving this reading would raise an immediate alert
    pub should_alert: bool,
    pub is_abnormal: bool,
    pub mean_arterial_pressure: i32,
    pub pulse_pressure: i32,
}

/// Raw form input, validated as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ValidateRequest {
    #[serde(default)]
    pub systolic: String,
    #[serde(default)]
    pub diastolic: String,
    #[serde(default)]
    pub pulse: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub valid: bool,
    /// Field name (`systolic`, `diastolic`, `pulse` or `general`) to message
    pub errors: HashMap<String, String>,
}

impl From<ValidationReport> for ValidateResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            valid: report.is_valid(),
            errors: report
                .errors
                .into_iter()
                .map(|(field, message)| (field.as_str().to_string(), message))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_tracker_domain::services::validation::validate;

    #[test]
    fn test_list_query_requires_both_dates() {
        let query = RecordListQuery {
            start_date: Some(Utc::now()),
            ..RecordListQuery::default()
        };
        assert!(query.to_filter().is_none());

        let filter = RecordListQuery {
            preset: Some(DateRangePreset::Last7Days),
            limit: Some(10),
            ..RecordListQuery::default()
        }
        .to_filter()
        .unwrap();
        assert_eq!(filter.preset, Some(DateRangePreset::Last7Days));
        assert_eq!(filter.limit, Some(10));
    }

    #[test]
    fn test_update_request_distinguishes_null() {
        let request: UpdateRecordRequest = serde_json::from_str(r#"{"pulse": 70, "note": null}"#).unwrap();
        let patch = BPRecordPatch::from(request);
        assert_eq!(patch.pulse, Some(70));
        assert_eq!(patch.note, Some(None));
        assert_eq!(patch.image_path, None);
    }

    #[test]
    fn test_validate_response_field_names() {
        let response = ValidateResponse::from(validate("120", "130", "70"));
        assert!(!response.valid);
        assert!(response.errors.contains_key("general"));
    }
}
