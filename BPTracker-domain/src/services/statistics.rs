use crate::entities::{BPRecord, BPStatistics};

/// AHA bands used for the aggregate view. Deliberately not the classifier's threshold.
fn is_normal(systolic: i32, diastolic: i32) -> bool {
    systolic < 120 && diastolic < 80
}

fn is_elevated(systolic: i32, diastolic: i32) -> bool {
    (120..130).contains(&systolic) && diastolic < 80
}

fn is_hypertension(systolic: i32, diastolic: i32) -> bool {
    systolic >= 130 || diastolic >= 80
}

/// Count, averages, extremes and band counts over a set of records.
///
/// An empty set yields `total == 0` with every other field zeroed.
pub fn aggregate(records: &[BPRecord]) -> BPStatistics {
    let Some(first) = records.first() else {
        return BPStatistics::default();
    };

    let mut stats = BPStatistics {
        total: records.len() as u64,
        max_systolic: first.systolic,
        min_systolic: first.systolic,
        max_diastolic: first.diastolic,
        min_diastolic: first.diastolic,
        max_pulse: first.pulse,
        min_pulse: first.pulse,
        ..BPStatistics::default()
    };

    let (mut sum_systolic, mut sum_diastolic, mut sum_pulse) = (0i64, 0i64, 0i64);
    for record in records {
        let (s, d, p) = (record.systolic, record.diastolic, record.pulse);
        sum_systolic += i64::from(s);
        sum_diastolic += i64::from(d);
        sum_pulse += i64::from(p);

        stats.max_systolic = stats.max_systolic.max(s);
        stats.min_systolic = stats.min_systolic.min(s);
        stats.max_diastolic = stats.max_diastolic.max(d);
        stats.min_diastolic = stats.min_diastolic.min(d);
        stats.max_pulse = stats.max_pulse.max(p);
        stats.min_pulse = stats.min_pulse.min(p);

        if is_normal(s, d) {
            stats.normal_count += 1;
        }
        if is_elevated(s, d) {
            stats.elevated_count += 1;
        }
        if is_hypertension(s, d) {
            stats.hypertension_count += 1;
        }
    }

    let count = records.len() as f64;
    stats.avg_systolic = sum_systolic as f64 / count;
    stats.avg_diastolic = sum_diastolic as f64 / count;
    stats.avg_pulse = sum_pulse as f64 / count;
    stats
}
