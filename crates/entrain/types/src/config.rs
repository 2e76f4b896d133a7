//! Monitor configuration.
//!
//! Immutable configuration for detection thresholds, pulse output, and
//! session lifecycle. Supplied at construction; no runtime reconfiguration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Complete configuration for the anxiety monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Trigger detection configuration.
    pub detection: DetectionConfig,

    /// Haptic pulse output configuration.
    pub pulse: PulseConfig,

    /// Session lifecycle configuration.
    pub session: SessionConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            pulse: PulseConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Create config tuned for a usage profile.
    pub fn for_profile(profile: SessionProfile) -> Self {
        let mut config = Self::default();

        match profile {
            SessionProfile::Standard => {}
            SessionProfile::Sensitive => {
                // Fire earlier and re-evaluate sooner for users who want
                // intervention at the first sign of onset.
                config.detection.hr_spike_z_threshold = 1.0;
                config.detection.hrv_drop_threshold = 0.15;
                config.detection.debounce_interval = Duration::from_secs(15);
            }
            SessionProfile::Conservative => {
                // Demand stronger deviations and longer stability before
                // declaring either onset or recovery.
                config.detection.hr_spike_z_threshold = 2.0;
                config.detection.hrv_drop_threshold = 0.3;
                config.detection.debounce_interval = Duration::from_secs(60);
                config.session.min_recovery = Duration::from_secs(180);
            }
        }

        config
    }

    /// Validate the configuration, rejecting values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection.hr_spike_z_threshold <= 0.0 {
            return Err(ConfigError::NonPositive("hr_spike_z_threshold"));
        }
        if self.detection.hrv_drop_threshold <= 0.0 || self.detection.hrv_drop_threshold > 1.0 {
            return Err(ConfigError::HrvDropOutOfRange(
                self.detection.hrv_drop_threshold,
            ));
        }
        if self.detection.baseline_window.is_zero() {
            return Err(ConfigError::NonPositive("baseline_window"));
        }
        if self.detection.min_baseline_samples == 0 {
            return Err(ConfigError::NonPositive("min_baseline_samples"));
        }
        if self.pulse.cadence_bpm == 0 {
            return Err(ConfigError::ZeroCadence);
        }
        if self.pulse.duty_cycle <= 0.0 || self.pulse.duty_cycle >= 1.0 {
            return Err(ConfigError::DutyCycleOutOfRange(self.pulse.duty_cycle));
        }
        if self.pulse.progress_interval.is_zero() {
            return Err(ConfigError::NonPositive("progress_interval"));
        }
        if self.session.max_duration.is_zero() {
            return Err(ConfigError::NonPositive("max_duration"));
        }
        if self.session.min_recovery.is_zero() {
            return Err(ConfigError::NonPositive("min_recovery"));
        }
        Ok(())
    }
}

/// Usage profile for configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionProfile {
    /// Default thresholds.
    Standard,

    /// Lower thresholds, shorter debounce: intervene earlier.
    Sensitive,

    /// Higher thresholds, longer debounce and recovery: intervene later.
    Conservative,
}

/// Trigger detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Z-score over the baseline HR mean at which the HR path fires.
    pub hr_spike_z_threshold: f64,

    /// Relative drop below the baseline HRV mean at which the HRV path fires
    /// (0.2 = a 20% drop).
    pub hrv_drop_threshold: f64,

    /// How far back the baseline window reaches.
    pub baseline_window: Duration,

    /// Samples required in the window before baseline statistics are valid
    /// (the gate is strictly greater than this count).
    pub min_baseline_samples: usize,

    /// Minimum time between two trigger evaluations while idle.
    pub debounce_interval: Duration,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            hr_spike_z_threshold: 1.5,
            hrv_drop_threshold: 0.2,
            baseline_window: Duration::from_secs(120),
            min_baseline_samples: 10,
            debounce_interval: Duration::from_secs(30),
        }
    }
}

/// Haptic pulse output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Target entrainment cadence in pulses per minute.
    pub cadence_bpm: u32,

    /// Fraction of each pulse period the actuator is on (exclusive 0..1).
    pub duty_cycle: f64,

    /// Approximate interval between `Pulsing` progress events.
    pub progress_interval: Duration,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            cadence_bpm: 60,
            duty_cycle: 0.5,
            progress_interval: Duration::from_secs(10),
        }
    }
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hard ceiling on session duration before a forced abort.
    pub max_duration: Duration,

    /// Continuous untriggered time required before a session recovers.
    pub min_recovery: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(15 * 60),
            min_recovery: Duration::from_secs(2 * 60),
        }
    }
}
