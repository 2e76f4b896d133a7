//! Error types for entrain-engine.
//!
//! Runtime failures (feed glitches, actuator faults) are absorbed by the
//! control loop and logged; these errors surface only at construction time or
//! through the [`crate::actuator::Actuator`] seam.

use entrain_types::ConfigError;
use thiserror::Error;

/// Errors that can occur in the detection/response engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The haptic actuator reported a fault.
    #[error("actuator fault: {reason}")]
    Actuator {
        /// Device-reported failure description.
        reason: String,
    },

    /// The sample feed reported a transient fault.
    #[error("sample feed fault: {reason}")]
    Feed {
        /// Source-reported failure description.
        reason: String,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
