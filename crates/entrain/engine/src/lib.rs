//! # Entrain Engine
//!
//! Real-time anxiety-onset detection paired with a timed haptic feedback
//! controller. A live HR/HRV sample feed is compared against a sliding
//! baseline; when a spike or variability drop fires, a session starts and the
//! pulse scheduler drives the actuator at the target entrainment cadence
//! until the user stabilizes, the session times out, or monitoring stops.
//!
//! ## Module Organization
//!
//! - [`baseline`]: Time-bounded sample window and baseline statistics
//! - [`detector`]: Stateless trigger classification
//! - [`pulse`]: Pulse timing and the actuator-driving scheduler
//! - [`monitor`]: Session state machine and feed consumption
//! - [`recorder`]: Immutable episode records and the injected sink
//! - [`actuator`]: Haptic device seam
//! - [`error`]: Engine error types
//!
//! The engine never panics on external failures: feed glitches and actuator
//! faults are logged and absorbed, and every session end path releases the
//! pulse task and silences the device.

#![deny(unsafe_code)]

pub mod actuator;
pub mod baseline;
pub mod detector;
pub mod error;
pub mod monitor;
pub mod pulse;
pub mod recorder;

pub use actuator::Actuator;
pub use baseline::{BaselineStats, BaselineWindow, FieldStats};
pub use detector::classify;
pub use error::{EngineError, EngineResult};
pub use monitor::{AnxietyMonitor, MonitorSnapshot};
pub use pulse::{PulseScheduler, PulseTiming};
pub use recorder::EpisodeSink;
