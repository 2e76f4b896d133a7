//! Time-bounded sliding window of recent samples with baseline statistics.

use std::collections::VecDeque;
use std::time::Duration;

use entrain_types::Sample;

/// Mean and population standard deviation of one field over the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub mean: f64,
    pub stddev: f64,
}

/// Baseline statistics for both physiological fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStats {
    /// Heart rate statistics (bpm).
    pub hr: FieldStats,
    /// HRV statistics (ms).
    pub hrv: FieldStats,
}

/// Ordered-by-time window of recent samples.
///
/// Insertion prunes anything older than the window length relative to the
/// inserted sample, so the window only ever holds samples within
/// `window` of "now". Statistics exclude the newest sample to avoid comparing
/// a candidate against itself.
#[derive(Debug)]
pub struct BaselineWindow {
    window: Duration,
    min_samples: usize,
    samples: VecDeque<Sample>,
}

impl BaselineWindow {
    /// Create an empty window.
    pub fn new(window: Duration, min_samples: usize) -> Self {
        Self {
            window,
            min_samples,
            samples: VecDeque::new(),
        }
    }

    /// Insert a sample, pruning entries that have aged out of the window.
    pub fn push(&mut self, sample: Sample) {
        while let Some(front) = self.samples.front() {
            let age = sample.at.signed_duration_since(front.at);
            match age.to_std() {
                Ok(age) if age > self.window => {
                    self.samples.pop_front();
                }
                // Within the window, or the feed went backwards in time;
                // either way the front stays.
                _ => break,
            }
        }
        self.samples.push_back(sample);
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether enough samples have accumulated for statistics to be valid.
    ///
    /// The gate is strictly greater than `min_samples`: the newest sample is
    /// excluded from statistics, so at least `min_samples` remain underneath it.
    pub fn has_baseline(&self) -> bool {
        self.samples.len() > self.min_samples
    }

    /// Baseline statistics over all retained samples except the newest.
    ///
    /// Returns `None` until [`Self::has_baseline`] holds.
    pub fn stats(&self) -> Option<BaselineStats> {
        if !self.has_baseline() {
            return None;
        }
        let history = self.samples.len() - 1;
        if history == 0 {
            return None;
        }

        let n = history as f64;
        let mut sum_hr = 0.0;
        let mut sum_hrv = 0.0;
        for sample in self.samples.iter().take(history) {
            sum_hr += sample.heart_rate as f64;
            sum_hrv += sample.hrv_ms;
        }
        let mean_hr = sum_hr / n;
        let mean_hrv = sum_hrv / n;

        let mut var_hr = 0.0;
        let mut var_hrv = 0.0;
        for sample in self.samples.iter().take(history) {
            var_hr += (sample.heart_rate as f64 - mean_hr).powi(2);
            var_hrv += (sample.hrv_ms - mean_hrv).powi(2);
        }

        Some(BaselineStats {
            hr: FieldStats {
                mean: mean_hr,
                stddev: (var_hr / n).sqrt(),
            },
            hrv: FieldStats {
                mean: mean_hrv,
                stddev: (var_hrv / n).sqrt(),
            },
        })
    }
}
