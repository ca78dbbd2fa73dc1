use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Status band of a reading. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BPStatus {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "elevated")]
    Elevated,
    #[serde(rename = "hypertension_stage_1")]
    HypertensionStage1,
    #[serde(rename = "hypertension_stage_2")]
    HypertensionStage2,
    #[serde(rename = "hypertensive_crisis")]
    Crisis,
    #[serde(rename = "low")]
    Low,
}

/// Display data for a status: color and bilingual label
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct BPStatusInfo {
    pub status: BPStatus,
    pub label: &'static str,
    pub label_th: &'static str,
    /// Hex RGB color used by the UI
    pub color: &'static str,
    pub description: &'static str,
}

const STATUS_INFO: [BPStatusInfo; 6] = [
    BPStatusInfo {
        status: BPStatus::Normal,
        label: "Normal",
        label_th: "ปกติ",
        color: "#4CAF50",
        description: "Blood pressure is in the normal range",
    },
    BPStatusInfo {
        status: BPStatus::Elevated,
        label: "Elevated",
        label_th: "สูงเล็กน้อย",
        color: "#FFC107",
        description: "Blood pressure is slightly above normal, keep an eye on it",
    },
    BPStatusInfo {
        status: BPStatus::HypertensionStage1,
        label: "Hypertension Stage 1",
        label_th: "ความดันสูงระดับ 1",
        color: "#FF9800",
        description: "High blood pressure, consult a doctor",
    },
    BPStatusInfo {
        status: BPStatus::HypertensionStage2,
        label: "Hypertension Stage 2",
        label_th: "ความดันสูงระดับ 2",
        color: "#F44336",
        description: "Very high blood pressure, see a doctor soon",
    },
    BPStatusInfo {
        status: BPStatus::Crisis,
        label: "Hypertensive Crisis",
        label_th: "วิกฤต",
        color: "#9C27B0",
        description: "Blood pressure is at a critical level, seek medical care immediately",
    },
    BPStatusInfo {
        status: BPStatus::Low,
        label: "Low",
        label_th: "ต่ำ",
        color: "#2196F3",
        description: "Blood pressure is below normal",
    },
];

impl BPStatus {
    pub const ALL: [BPStatus; 6] = [
        BPStatus::Normal,
        BPStatus::Elevated,
        BPStatus::HypertensionStage1,
        BPStatus::HypertensionStage2,
        BPStatus::Crisis,
        BPStatus::Low,
    ];

    /// Static display data for this status
    pub fn info(self) -> &'static BPStatusInfo {
        let index = match self {
            BPStatus::Normal => 0,
            BPStatus::Elevated => 1,
            BPStatus::HypertensionStage1 => 2,
            BPStatus::HypertensionStage2 => 3,
            BPStatus::Crisis => 4,
            BPStatus::Low => 5,
        };
        &STATUS_INFO[index]
    }

    /// Wire name, e.g. `hypertension_stage_1`
    pub fn as_str(self) -> &'static str {
        match self {
            BPStatus::Normal => "normal",
            BPStatus::Elevated => "elevated",
            BPStatus::HypertensionStage1 => "hypertension_stage_1",
            BPStatus::HypertensionStage2 => "hypertension_stage_2",
            BPStatus::Crisis => "hypertensive_crisis",
            BPStatus::Low => "low",
        }
    }
}

impl std::fmt::Display for BPStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.info().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_status_has_matching_info() {
        for status in BPStatus::ALL {
            assert_eq!(status.info().status, status);
        }
    }

    #[test]
    fn test_colors_and_labels() {
        assert_eq!(BPStatus::Normal.info().color, "#4CAF50");
        assert_eq!(BPStatus::Crisis.info().label, "Hypertensive Crisis");
        assert_eq!(BPStatus::Crisis.info().label_th, "วิกฤต");
        assert_eq!(BPStatus::Low.info().color, "#2196F3");
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&BPStatus::Crisis).unwrap(), "\"hypertensive_crisis\"");
        for status in BPStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
    }
}
