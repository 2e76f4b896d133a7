//! Episode recording.
//!
//! Summarizes a completed or aborted session into an immutable [`Episode`]
//! and forwards it to an injected sink, exactly once per session end.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use entrain_types::{Episode, EpisodeId, EpisodeOutcome};
use tracing::debug;

/// Injected episode consumer.
///
/// Fire-and-forget from the engine's perspective: failures inside the sink
/// are neither observed nor retried.
pub type EpisodeSink = Arc<dyn Fn(Episode) + Send + Sync>;

/// Build the immutable episode record for a finished session.
#[allow(clippy::too_many_arguments)]
pub fn build_episode(
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    peak_hr: u32,
    min_hrv_ms: f64,
    cadence_bpm: u32,
    duration: Duration,
    outcome: EpisodeOutcome,
) -> Episode {
    Episode {
        id: EpisodeId::generate(),
        started_at,
        ended_at,
        peak_hr,
        min_hrv_ms,
        cadence_bpm,
        duration,
        outcome,
    }
}

/// Hand a finished episode to the sink.
pub fn record(sink: &EpisodeSink, episode: Episode) {
    debug!(
        episode_id = %episode.id,
        peak_hr = episode.peak_hr,
        duration_secs = episode.duration.as_secs(),
        "episode recorded"
    );
    (sink)(episode);
}
