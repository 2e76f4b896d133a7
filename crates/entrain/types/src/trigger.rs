//! Trigger and abort classifications.

use serde::{Deserialize, Serialize};

/// Classified reason an anxiety trigger fired.
///
/// The detector returns `Option<TriggerReason>`; `None` means the sample did
/// not deviate from baseline on any path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// Heart rate spiked above the baseline z-score threshold.
    HrSpike,

    /// Heart-rate variability dropped below the baseline by the configured ratio.
    HrvDrop,

    /// Both the HR and HRV paths fired on the same sample.
    Combined,
}

impl std::fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerReason::HrSpike => write!(f, "hr_spike"),
            TriggerReason::HrvDrop => write!(f, "hrv_drop"),
            TriggerReason::Combined => write!(f, "hr_hrv_combined"),
        }
    }
}

/// Why an active session was aborted rather than recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The session ran up against the configured maximum duration.
    MaxDuration,

    /// Monitoring was stopped explicitly while the session was active.
    ManualStop,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::MaxDuration => write!(f, "max_duration"),
            AbortReason::ManualStop => write!(f, "manual_stop"),
        }
    }
}
