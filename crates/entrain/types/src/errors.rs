//! Configuration validation errors.

use thiserror::Error;

/// Errors produced by [`crate::MonitorConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Pulse cadence of zero would make the period undefined.
    #[error("pulse cadence must be at least 1 pulse per minute")]
    ZeroCadence,

    /// Duty cycle outside the exclusive (0, 1) range.
    #[error("duty cycle must be within (0, 1), got {0}")]
    DutyCycleOutOfRange(f64),

    /// HRV drop threshold outside the (0, 1] range.
    #[error("hrv drop threshold must be within (0, 1], got {0}")]
    HrvDropOutOfRange(f64),

    /// A field that must be strictly positive was zero or negative.
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}
