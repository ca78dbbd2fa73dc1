use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Aggregates over a set of readings.
///
/// Band counts use the fixed AHA cutoffs (120/80 and 130/80), not the configurable
/// classifier threshold. When `total` is zero the other fields carry no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BPStatistics {
    pub total: u64,
    pub avg_systolic: f64,
    pub avg_diastolic: f64,
    pub avg_pulse: f64,
    pub max_systolic: i32,
    pub min_systolic: i32,
    pub max_diastolic: i32,
    pub min_diastolic: i32,
    pub max_pulse: i32,
    pub min_pulse: i32,
    pub normal_count: u64,
    pub elevated_count: u64,
    pub hypertension_count: u64,
}

impl BPStatistics {
    /// False when there is nothing to display
    pub fn has_data(&self) -> bool {
        self.total > 0
    }
}
