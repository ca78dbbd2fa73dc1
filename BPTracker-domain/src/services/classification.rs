use crate::entities::{BPRecord, BPStatus, BPStatusInfo, BPThreshold};

/// Systolic above this is a crisis regardless of the configured threshold
pub const CRISIS_SYSTOLIC: i32 = 180;
/// Diastolic above this is a crisis regardless of the configured threshold
pub const CRISIS_DIASTOLIC: i32 = 120;

/// Classify a reading. The checks run in a fixed order and the first match wins.
pub fn classify(systolic: i32, diastolic: i32, threshold: &BPThreshold) -> BPStatus {
    if systolic < threshold.low_systolic || diastolic < threshold.low_diastolic {
        BPStatus::Low
    } else if systolic > CRISIS_SYSTOLIC || diastolic > CRISIS_DIASTOLIC {
        BPStatus::Crisis
    } else if systolic >= threshold.high_systolic || diastolic >= threshold.high_diastolic {
        BPStatus::HypertensionStage2
    } else if systolic >= 130 || diastolic >= 80 {
        BPStatus::HypertensionStage1
    } else if (120..130).contains(&systolic) && diastolic < 80 {
        BPStatus::Elevated
    } else {
        BPStatus::Normal
    }
}

/// Classify a stored record
pub fn classify_record(record: &BPRecord, threshold: &BPThreshold) -> BPStatus {
    classify(record.systolic, record.diastolic, threshold)
}

/// Status plus its display data
pub fn status_info(systolic: i32, diastolic: i32, threshold: &BPThreshold) -> &'static BPStatusInfo {
    classify(systolic, diastolic, threshold).info()
}

/// Whether saving a reading with this status should raise an immediate alert
pub fn should_alert(status: BPStatus) -> bool {
    matches!(
        status,
        BPStatus::HypertensionStage2 | BPStatus::Crisis | BPStatus::Low
    )
}

/// Anything outside Normal and Elevated
pub fn is_abnormal(status: BPStatus) -> bool {
    !matches!(status, BPStatus::Normal | BPStatus::Elevated)
}

/// MAP = DBP + (SBP - DBP) / 3, rounded. Computed in floating point so any input pair is accepted.
pub fn mean_arterial_pressure(systolic: i32, diastolic: i32) -> i32 {
    let (s, d) = (f64::from(systolic), f64::from(diastolic));
    (d + (s - d) / 3.0).round() as i32
}

/// SBP - DBP, saturating at the `i32` bounds
pub fn pulse_pressure(systolic: i32, diastolic: i32) -> i32 {
    systolic.saturating_sub(diastolic)
}

/// `120/80`
pub fn format_reading(systolic: i32, diastolic: i32) -> String {
    format!("{}/{}", systolic, diastolic)
}

/// `120/80 mmHg`
pub fn format_reading_with_unit(systolic: i32, diastolic: i32, unit: &str) -> String {
    format!("{} {}", format_reading(systolic, diastolic), unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_classify(systolic: i32, diastolic: i32) -> BPStatus {
        classify(systolic, diastolic, &BPThreshold::default())
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(default_classify(129, 79), BPStatus::Elevated);
        assert_eq!(default_classify(130, 79), BPStatus::HypertensionStage1);
        assert_eq!(default_classify(140, 90), BPStatus::HypertensionStage2);
        assert_eq!(default_classify(181, 70), BPStatus::Crisis);
        assert_eq!(default_classify(89, 60), BPStatus::Low);
        assert_eq!(default_classify(119, 79), BPStatus::Normal);
    }

    #[test]
    fn test_crisis_cutoffs_are_strict() {
        assert_eq!(default_classify(180, 100), BPStatus::HypertensionStage2);
        assert_eq!(default_classify(150, 121), BPStatus::Crisis);
        assert_eq!(default_classify(120, 120), BPStatus::HypertensionStage2);
    }

    #[test]
    fn test_low_wins_over_everything() {
        // Diastolic below the low limit outranks a crisis systolic
        assert_eq!(default_classify(200, 55), BPStatus::Low);
        assert_eq!(default_classify(95, 59), BPStatus::Low);
    }

    #[test]
    fn test_diastolic_drives_stage_one() {
        assert_eq!(default_classify(120, 85), BPStatus::HypertensionStage1);
        assert_eq!(default_classify(110, 80), BPStatus::HypertensionStage1);
    }

    #[test]
    fn test_custom_threshold_moves_stage_two() {
        let threshold = BPThreshold {
            high_systolic: 135,
            high_diastolic: 85,
            ..BPThreshold::default()
        };
        assert_eq!(classify(136, 70, &threshold), BPStatus::HypertensionStage2);
        assert_eq!(classify(136, 70, &BPThreshold::default()), BPStatus::HypertensionStage1);

        // A high limit below 130 pre-empts stage one and elevated
        let strict = BPThreshold {
            high_systolic: 125,
            ..BPThreshold::default()
        };
        assert_eq!(classify(126, 70, &strict), BPStatus::HypertensionStage2);
    }

    #[test]
    fn test_every_pair_gets_exactly_one_status() {
        let threshold = BPThreshold::default();
        for systolic in (40..=260).step_by(3) {
            for diastolic in (20..=160).step_by(3) {
                let status = classify(systolic, diastolic, &threshold);
                assert!(BPStatus::ALL.contains(&status));
            }
        }
    }

    #[test]
    fn test_should_alert_and_is_abnormal() {
        let alerting: Vec<_> = BPStatus::ALL.into_iter().filter(|s| should_alert(*s)).collect();
        assert_eq!(
            alerting,
            vec![BPStatus::HypertensionStage2, BPStatus::Crisis, BPStatus::Low]
        );
        assert!(!should_alert(BPStatus::HypertensionStage1));
        assert!(is_abnormal(BPStatus::HypertensionStage1));
        assert!(!is_abnormal(BPStatus::Elevated));
    }

    #[test]
    fn test_derived_values() {
        assert_eq!(mean_arterial_pressure(120, 80), 93);
        assert_eq!(mean_arterial_pressure(140, 90), 107);
        assert_eq!(pulse_pressure(120, 80), 40);
        assert_eq!(format_reading(120, 80), "120/80");
        assert_eq!(format_reading_with_unit(120, 80, "mmHg"), "120/80 mmHg");
        assert_eq!(status_info(181, 70, &BPThreshold::default()).color, "#9C27B0");
    }

    #[test]
    fn test_derived_values_at_integer_extremes() {
        assert_eq!(pulse_pressure(i32::MAX, -1), i32::MAX);
        assert_eq!(pulse_pressure(i32::MIN, 1), i32::MIN);
        assert_eq!(mean_arterial_pressure(i32::MAX, -1), 715_827_882);
        assert_eq!(mean_arterial_pressure(i32::MIN, i32::MAX), 715_827_882);
        assert_eq!(default_classify(i32::MAX, -1), BPStatus::Low);
    }
}
