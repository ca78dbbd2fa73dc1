use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored blood pressure reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BPRecord {
    pub id: i64,
    /// Systolic pressure (the higher number), mmHg
    pub systolic: i32,
    /// Diastolic pressure (the lower number), mmHg
    pub diastolic: i32,
    /// Pulse rate in beats per minute
    pub pulse: i32,
    pub measured_at: DateTime<Utc>,
    pub note: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new reading. `measured_at` defaults to now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BPRecordInput {
    pub systolic: i32,
    pub diastolic: i32,
    pub pulse: i32,
    pub measured_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub image_path: Option<String>,
}

/// Partial update of a reading. `None` leaves a field unchanged; for the nullable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BPRecordPatch {
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub pulse: Option<i32>,
    pub measured_at: Option<DateTime<Utc>>,
    pub note: Option<Option<String>>,
    pub image_path: Option<Option<String>>,
}

impl BPRecordPatch {
    /// Whether any of the three measured values change
    pub fn touches_values(&self) -> bool {
        self.systolic.is_some() || self.diastolic.is_some() || self.pulse.is_some()
    }
}
