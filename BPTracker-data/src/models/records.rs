use serde::{Deserialize, Serialize};

/// Storage model for a blood pressure record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BPRecordRow {
    pub id: i64,
    /// Systolic pressure (the higher number), mmHg
    pub systolic: i32,
    /// Diastolic pressure (the lower number), mmHg
    pub diastolic: i32,
    /// Pulse rate in beats per minute
    pub pulse: i32,
    /// When the reading was taken
    pub measured_at: String,
    pub note: Option<String>,
    /// Permanent path of an attached photo of the cuff display
    pub image_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input data for inserting a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBPRecord {
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
    pub measured_at: String,
    pub note: Option<String>,
    pub image_path: Option<String>,
}

/// Partial update. `None` leaves a column untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BPRecordChanges {
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub pulse: Option<i32>,
    pub measured_at: Option<String>,
    pub note: Option<Option<String>>,
    pub image_path: Option<Option<String>>,
}

impl BPRecordChanges {
    pub fn is_empty(&self) -> bool {
        self.systolic.is_none()
            && self.diastolic.is_none()
            && self.pulse.is_none()
            && self.measured_at.is_none()
            && self.note.is_none()
            && self.image_path.is_none()
    }
}

/// Inclusive bounds on `measured_at`, in canonical timestamp form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TimeBounds {
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Whether a canonical timestamp falls inside the bounds
    pub fn contains(&self, timestamp: &str) -> bool {
        let after_start = self.start.as_deref().map_or(true, |start| timestamp >= start);
        let before_end = self.end.as_deref().map_or(true, |end| timestamp <= end);
        after_start && before_end
    }
}

/// Listing query: bounds plus optional pagination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub bounds: TimeBounds,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Aggregates computed by the store over a bounded record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRow {
    pub total: i64,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    pub max_systolic: i32,
    pub min_systolic: i32,
    pub max_diastolic: i32,
    pub min_diastolic: i32,
    pub max_pulse: i32,
    pub min_pulse: i32,
    pub normal_count: i64,
    pub elevated_count: i64,
    pub hypertension_count: i64,
}
