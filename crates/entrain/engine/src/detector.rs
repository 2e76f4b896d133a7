//! Trigger detection.
//!
//! A pure function of (candidate sample, baseline statistics): all memory of
//! past calls belongs to the session state machine.

use entrain_types::{DetectionConfig, Sample, TriggerReason};

use crate::baseline::BaselineStats;

/// Fallback for an all-equal baseline (stddev 0), where the z-score is
/// undefined: trigger on a flat 20% rise over the mean. Preserved as a fixed
/// constant, not a tunable.
pub const ZERO_VARIANCE_RISE_RATIO: f64 = 1.2;

/// Classify a sample against baseline statistics.
///
/// Returns `None` when neither the HR nor the HRV path fires.
pub fn classify(
    sample: &Sample,
    baseline: &BaselineStats,
    config: &DetectionConfig,
) -> Option<TriggerReason> {
    let hr = sample.heart_rate as f64;
    let hr_spike = if baseline.hr.stddev > 0.0 {
        let z = (hr - baseline.hr.mean) / baseline.hr.stddev;
        z >= config.hr_spike_z_threshold
    } else {
        baseline.hr.mean > 0.0 && hr >= baseline.hr.mean * ZERO_VARIANCE_RISE_RATIO
    };

    let hrv_drop = baseline.hrv.mean > 0.0
        && (baseline.hrv.mean - sample.hrv_ms) / baseline.hrv.mean >= config.hrv_drop_threshold;

    match (hr_spike, hrv_drop) {
        (true, true) => Some(TriggerReason::Combined),
        (true, false) => Some(TriggerReason::HrSpike),
        (false, true) => Some(TriggerReason::HrvDrop),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::FieldStats;
    use chrono::Utc;

    fn baseline(mean_hr: f64, stddev_hr: f64, mean_hrv: f64) -> BaselineStats {
        BaselineStats {
            hr: FieldStats {
                mean: mean_hr,
                stddev: stddev_hr,
            },
            hrv: FieldStats {
                mean: mean_hrv,
                stddev: 0.0,
            },
        }
    }

    fn sample(hr: u32, hrv: f64) -> Sample {
        Sample::at(Utc::now(), hr, hrv)
    }

    #[test]
    fn test_hr_spike_at_z_threshold() {
        // mean 70, stddev 5, threshold 1.5: HR 85 gives z = 3.0.
        let config = DetectionConfig::default();
        let reason = classify(&sample(85, 50.0), &baseline(70.0, 5.0, 50.0), &config);
        assert_eq!(reason, Some(TriggerReason::HrSpike));
    }

    #[test]
    fn test_no_trigger_below_thresholds() {
        let config = DetectionConfig::default();
        let reason = classify(&sample(72, 49.0), &baseline(70.0, 5.0, 50.0), &config);
        assert_eq!(reason, None);
    }

    #[test]
    fn test_hrv_drop() {
        // mean HRV 50, threshold 0.2: HRV 35 gives a 0.30 drop.
        let config = DetectionConfig::default();
        let reason = classify(&sample(70, 35.0), &baseline(70.0, 5.0, 50.0), &config);
        assert_eq!(reason, Some(TriggerReason::HrvDrop));
    }

    #[test]
    fn test_combined() {
        let config = DetectionConfig::default();
        let reason = classify(&sample(85, 35.0), &baseline(70.0, 5.0, 50.0), &config);
        assert_eq!(reason, Some(TriggerReason::Combined));
    }

    #[test]
    fn test_zero_variance_fallback() {
        let config = DetectionConfig::default();
        // 20% over a flat baseline of 70 is 84.
        assert_eq!(
            classify(&sample(84, 50.0), &baseline(70.0, 0.0, 50.0), &config),
            Some(TriggerReason::HrSpike)
        );
        assert_eq!(
            classify(&sample(83, 50.0), &baseline(70.0, 0.0, 50.0), &config),
            None
        );
    }

    #[test]
    fn test_degenerate_hrv_mean_never_fires() {
        let config = DetectionConfig::default();
        assert_eq!(
            classify(&sample(70, 0.0), &baseline(70.0, 5.0, 0.0), &config),
            None
        );
        assert_eq!(
            classify(&sample(70, 10.0), &baseline(70.0, 5.0, -1.0), &config),
            None
        );
    }

    #[test]
    fn test_stateless_across_calls() {
        let config = DetectionConfig::default();
        let stats = baseline(70.0, 5.0, 50.0);
        let spike = sample(85, 50.0);
        assert_eq!(
            classify(&spike, &stats, &config),
            classify(&spike, &stats, &config)
        );
    }
}
