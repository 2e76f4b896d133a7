//! Physiological samples from the live sensor feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single physiological measurement from the sensor feed.
///
/// Samples are produced externally at a roughly periodic rate and are
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Measurement time (UTC).
    pub at: DateTime<Utc>,

    /// Heart rate in beats per minute.
    pub heart_rate: u32,

    /// Heart-rate variability (RMSSD) in milliseconds.
    pub hrv_ms: f64,
}

impl Sample {
    /// Create a sample stamped with the current time.
    pub fn new(heart_rate: u32, hrv_ms: f64) -> Self {
        Self {
            at: Utc::now(),
            heart_rate,
            hrv_ms,
        }
    }

    /// Create a sample with an explicit measurement time.
    pub fn at(at: DateTime<Utc>, heart_rate: u32, hrv_ms: f64) -> Self {
        Self {
            at,
            heart_rate,
            hrv_ms,
        }
    }
}
