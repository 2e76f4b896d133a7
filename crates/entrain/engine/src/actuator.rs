//! Haptic actuator seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::EngineResult;

/// A physical haptic output device.
///
/// The actuator handle is owned by the pulse scheduler and only ever called
/// through it. Implementations are injected at monitor construction, which
/// keeps the engine testable against mock devices.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Emit one pulse: drive the device for `on`, then rest for `off`.
    ///
    /// The future resolves when the full on/off cycle has completed. A failed
    /// pulse is reported as an error; the scheduler skips the cycle and keeps
    /// going.
    async fn pulse(&self, on: Duration, off: Duration) -> EngineResult<()>;

    /// Silence any in-flight pulse immediately. Idempotent.
    async fn stop(&self) -> EngineResult<()>;
}
