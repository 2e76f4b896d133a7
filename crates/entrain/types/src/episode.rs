//! Immutable per-session episode records.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trigger::AbortReason;

/// Unique identifier for an episode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeId(Uuid);

impl EpisodeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "episode:{}", self.0)
    }
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The user stabilized and the session recovered.
    Recovered,

    /// The session was force-ended.
    Aborted(AbortReason),
}

/// Immutable summary of one detection-to-resolution session.
///
/// Produced exactly once per session end, on either terminal path, and never
/// mutated afterwards. Ownership transfers to the episode sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Unique episode identifier.
    pub id: EpisodeId,

    /// When the session started (time of the triggering sample).
    pub started_at: DateTime<Utc>,

    /// When the session ended.
    pub ended_at: DateTime<Utc>,

    /// Highest heart rate observed during the session.
    pub peak_hr: u32,

    /// Lowest HRV observed during the session.
    pub min_hrv_ms: f64,

    /// Pulse cadence driven during the session.
    pub cadence_bpm: u32,

    /// Total session duration.
    pub duration: Duration,

    /// How the session ended.
    pub outcome: EpisodeOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_id_display() {
        let uuid = Uuid::new_v4();
        let id = EpisodeId::from_uuid(uuid);
        assert_eq!(id.to_string(), format!("episode:{}", uuid));
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_episode_ids_are_unique() {
        assert_ne!(EpisodeId::generate(), EpisodeId::generate());
    }
}
