//! Observable session lifecycle events.
//!
//! Events are broadcast to zero or more observers (e.g. a UI layer); slow or
//! absent consumers never block the engine.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trigger::{AbortReason, TriggerReason};

/// A lifecycle transition observable from outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// An anxiety trigger fired and a session started.
    Triggered {
        /// Time of the triggering sample.
        at: DateTime<Utc>,
        /// Which detection path fired.
        reason: TriggerReason,
        /// Heart rate of the triggering sample.
        heart_rate: u32,
        /// HRV of the triggering sample.
        hrv_ms: f64,
    },

    /// Periodic progress report while haptics are active.
    Pulsing {
        /// Time the report was emitted.
        at: DateTime<Utc>,
        /// Cadence being driven.
        cadence_bpm: u32,
        /// Active time elapsed since the session started.
        elapsed: Duration,
    },

    /// The session ended after sustained stability.
    Recovered {
        /// Time of the sample that completed recovery.
        at: DateTime<Utc>,
        /// Total session duration.
        session_duration: Duration,
        /// How long the untriggered condition held continuously.
        stabilized_for: Duration,
    },

    /// The session was force-ended.
    Aborted {
        /// Time the abort took effect.
        at: DateTime<Utc>,
        /// Total session duration.
        session_duration: Duration,
        /// Why the session was aborted.
        reason: AbortReason,
    },
}

impl MonitorEvent {
    /// Timestamp carried by the event.
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            MonitorEvent::Triggered { at, .. }
            | MonitorEvent::Pulsing { at, .. }
            | MonitorEvent::Recovered { at, .. }
            | MonitorEvent::Aborted { at, .. } => *at,
        }
    }
}
