//! Session state machine.
//!
//! Consumes the live sample feed, decides when an anxiety session starts,
//! drives the pulse scheduler while one is active, and ends sessions through
//! recovery, a max-duration abort, or a manual stop. Every terminal path
//! records exactly one episode.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use entrain_types::{
    AbortReason, Episode, EpisodeOutcome, MonitorConfig, MonitorEvent, Sample,
};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actuator::Actuator;
use crate::baseline::BaselineWindow;
use crate::detector;
use crate::error::EngineResult;
use crate::pulse::PulseScheduler;
use crate::recorder::{self, EpisodeSink};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One in-flight anxiety session. Exists iff the machine is not idle.
struct ActiveSession {
    started_at: DateTime<Utc>,
    peak_hr: u32,
    min_hrv_ms: f64,
    /// Anchor of the current continuous untriggered stretch.
    calm_since: Option<DateTime<Utc>>,
    pulse: PulseScheduler,
}

impl ActiveSession {
    fn observe(&mut self, sample: &Sample) {
        self.peak_hr = self.peak_hr.max(sample.heart_rate);
        if sample.hrv_ms < self.min_hrv_ms {
            self.min_hrv_ms = sample.hrv_ms;
        }
    }
}

/// How an active session ended.
enum SessionEnd {
    Recovered { stabilized_for: Duration },
    Aborted(AbortReason),
}

/// State owned exclusively by the monitor, guarded by one mutex so the sample
/// path and external stop requests never interleave destructively.
struct MonitorState {
    window: BaselineWindow,
    session: Option<ActiveSession>,
    last_trigger_eval: Option<DateTime<Utc>>,
    /// Feed clock: timestamp of the most recent sample.
    last_sample_at: Option<DateTime<Utc>>,
    episodes_recorded: u64,
}

struct FeedHandle {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Point-in-time view of the monitor, for observability.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    /// Whether a sample feed is currently being consumed.
    pub monitoring: bool,
    /// Whether an anxiety session is active.
    pub in_session: bool,
    /// Samples currently retained in the baseline window.
    pub baseline_samples: usize,
    /// Completed pulse cycles of the active session, if any.
    pub pulse_cycles: Option<u64>,
    /// Episodes handed to the sink since construction.
    pub episodes_recorded: u64,
}

/// Real-time anxiety monitor: baseline tracking, trigger detection, session
/// lifecycle, and haptic response.
///
/// Driven either by [`Self::start`] with an async sample stream, or by pushing
/// samples directly through [`Self::process_sample`]. Lifecycle transitions
/// are observable via [`Self::subscribe`]; finished sessions are summarized
/// into [`Episode`]s and handed to the injected sink.
pub struct AnxietyMonitor {
    config: MonitorConfig,
    actuator: Arc<dyn Actuator>,
    event_tx: broadcast::Sender<MonitorEvent>,
    episode_sink: EpisodeSink,
    state: Mutex<MonitorState>,
    feed: Mutex<Option<FeedHandle>>,
}

impl AnxietyMonitor {
    /// Create a monitor. Fails only on invalid configuration.
    pub fn new<F>(
        config: MonitorConfig,
        actuator: Arc<dyn Actuator>,
        episode_sink: F,
    ) -> EngineResult<Self>
    where
        F: Fn(Episode) + Send + Sync + 'static,
    {
        config.validate()?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let window = BaselineWindow::new(
            config.detection.baseline_window,
            config.detection.min_baseline_samples,
        );

        Ok(Self {
            config,
            actuator,
            event_tx,
            episode_sink: Arc::new(episode_sink),
            state: Mutex::new(MonitorState {
                window,
                session: None,
                last_trigger_eval: None,
                last_sample_at: None,
                episodes_recorded: 0,
            }),
            feed: Mutex::new(None),
        })
    }

    /// Subscribe to lifecycle events.
    ///
    /// Slow or dropped receivers never block the monitor; they simply lag.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.event_tx.subscribe()
    }

    /// Start consuming a sample feed. No-op if already monitoring.
    ///
    /// Transient feed errors are logged and skipped; the feed's own
    /// resubscription is the source's responsibility. When the stream ends,
    /// any active session is released through the manual-stop abort path.
    pub async fn start<S, E>(self: &Arc<Self>, mut samples: S)
    where
        S: Stream<Item = Result<Sample, E>> + Send + Unpin + 'static,
        E: fmt::Display + Send + 'static,
    {
        let mut feed = self.feed.lock().await;
        if let Some(existing) = feed.as_ref() {
            if !existing.handle.is_finished() {
                debug!("start requested while already monitoring");
                return;
            }
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let monitor = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                    item = samples.next() => match item {
                        Some(Ok(sample)) => monitor.process_sample(sample).await,
                        Some(Err(e)) => {
                            warn!(error = %e, "sample feed error, continuing");
                        }
                        None => {
                            info!("sample feed ended");
                            break;
                        }
                    }
                }
            }
            // Guaranteed release on every exit path.
            monitor.abort_active(AbortReason::ManualStop).await;
        });

        *feed = Some(FeedHandle { stop_tx, handle });
        info!("monitoring started");
    }

    /// Stop monitoring. Idempotent; a no-op while idle.
    ///
    /// Cancels the feed task and aborts any active session (reason
    /// `manual_stop`), releasing the pulse scheduler and silencing the device.
    pub async fn stop(&self) {
        let feed = self.feed.lock().await.take();
        match feed {
            Some(FeedHandle { stop_tx, handle }) => {
                let _ = stop_tx.send(true);
                if let Err(e) = handle.await {
                    warn!(error = %e, "sample feed task did not shut down cleanly");
                }
                info!("monitoring stopped");
            }
            None => debug!("stop requested while idle"),
        }
        // Covers direct-push usage, and the feed task abort if it panicked.
        self.abort_active(AbortReason::ManualStop).await;
    }

    /// Process one sample: update extrema and the baseline window, then run
    /// the trigger/recovery/abort evaluation for the current state.
    pub async fn process_sample(&self, sample: Sample) {
        let mut state = self.state.lock().await;

        if let Some(session) = state.session.as_mut() {
            session.observe(&sample);
        }
        state.last_sample_at = Some(sample.at);
        state.window.push(sample.clone());

        if state.session.is_some() {
            self.evaluate_active(&mut state, &sample).await;
        } else {
            self.evaluate_idle(&mut state, &sample);
        }
    }

    /// Current state of the monitor.
    pub async fn snapshot(&self) -> MonitorSnapshot {
        let monitoring = self
            .feed
            .lock()
            .await
            .as_ref()
            .map(|feed| !feed.handle.is_finished())
            .unwrap_or(false);

        let state = self.state.lock().await;
        MonitorSnapshot {
            monitoring,
            in_session: state.session.is_some(),
            baseline_samples: state.window.len(),
            pulse_cycles: state.session.as_ref().map(|s| s.pulse.cycles()),
            episodes_recorded: state.episodes_recorded,
        }
    }

    /// Abort evaluation order: max-duration wins ties with recovery on the
    /// same sample.
    async fn evaluate_active(&self, state: &mut MonitorState, sample: &Sample) {
        let stats = state.window.stats();
        let Some(session) = state.session.as_mut() else {
            return;
        };

        let elapsed = duration_since(sample.at, session.started_at);
        let end = if elapsed >= self.config.session.max_duration {
            Some(SessionEnd::Aborted(AbortReason::MaxDuration))
        } else if let Some(baseline) = stats {
            match detector::classify(sample, &baseline, &self.config.detection) {
                Some(reason) => {
                    // Re-trigger: the continuous-stability clock starts over.
                    if session.calm_since.take().is_some() {
                        debug!(reason = %reason, "re-trigger during session, stability reset");
                    }
                    None
                }
                None => {
                    let calm_since = *session.calm_since.get_or_insert(sample.at);
                    let stabilized_for = duration_since(sample.at, calm_since);
                    if stabilized_for >= self.config.session.min_recovery {
                        Some(SessionEnd::Recovered { stabilized_for })
                    } else {
                        None
                    }
                }
            }
        } else {
            // The window has thinned below its baseline minimum; nothing can
            // be classified, so stability neither advances nor resets.
            None
        };

        if let Some(end) = end {
            if let Some(session) = state.session.take() {
                self.finish(state, session, sample.at, end).await;
            }
        }
    }

    fn evaluate_idle(&self, state: &mut MonitorState, sample: &Sample) {
        if !state.window.has_baseline() {
            return;
        }

        // Debounce trigger evaluations; the first ever is never debounced.
        if let Some(previous) = state.last_trigger_eval {
            if duration_since(sample.at, previous) < self.config.detection.debounce_interval {
                return;
            }
        }
        state.last_trigger_eval = Some(sample.at);

        let Some(baseline) = state.window.stats() else {
            return;
        };
        let Some(reason) = detector::classify(sample, &baseline, &self.config.detection) else {
            return;
        };

        let pulse = PulseScheduler::start(
            Arc::clone(&self.actuator),
            &self.config.pulse,
            self.event_tx.clone(),
        );
        state.session = Some(ActiveSession {
            started_at: sample.at,
            peak_hr: sample.heart_rate,
            min_hrv_ms: sample.hrv_ms,
            calm_since: None,
            pulse,
        });

        info!(
            reason = %reason,
            heart_rate = sample.heart_rate,
            hrv_ms = sample.hrv_ms,
            "anxiety onset detected, session started"
        );
        let _ = self.event_tx.send(MonitorEvent::Triggered {
            at: sample.at,
            reason,
            heart_rate: sample.heart_rate,
            hrv_ms: sample.hrv_ms,
        });
    }

    async fn abort_active(&self, reason: AbortReason) {
        let mut state = self.state.lock().await;
        if let Some(session) = state.session.take() {
            // The feed is the session clock; a skewed device clock must not
            // distort the recorded duration.
            let ended_at = state.last_sample_at.unwrap_or(session.started_at);
            self.finish(&mut state, session, ended_at, SessionEnd::Aborted(reason))
                .await;
        }
    }

    /// Shared terminal path: stop the pulses, emit the terminal event, record
    /// the episode. Runs exactly once per session.
    async fn finish(
        &self,
        state: &mut MonitorState,
        session: ActiveSession,
        ended_at: DateTime<Utc>,
        end: SessionEnd,
    ) {
        let ActiveSession {
            started_at,
            peak_hr,
            min_hrv_ms,
            pulse,
            ..
        } = session;
        let session_duration = duration_since(ended_at, started_at);
        let cycles = pulse.cycles();
        pulse.shutdown().await;

        let (event, outcome) = match end {
            SessionEnd::Recovered { stabilized_for } => (
                MonitorEvent::Recovered {
                    at: ended_at,
                    session_duration,
                    stabilized_for,
                },
                EpisodeOutcome::Recovered,
            ),
            SessionEnd::Aborted(reason) => (
                MonitorEvent::Aborted {
                    at: ended_at,
                    session_duration,
                    reason,
                },
                EpisodeOutcome::Aborted(reason),
            ),
        };

        info!(
            duration_secs = session_duration.as_secs(),
            cycles, peak_hr, "session ended"
        );
        let _ = self.event_tx.send(event);

        let episode = recorder::build_episode(
            started_at,
            ended_at,
            peak_hr,
            min_hrv_ms,
            self.config.pulse.cadence_bpm,
            session_duration,
            outcome,
        );
        recorder::record(&self.episode_sink, episode);
        state.episodes_recorded += 1;
    }
}

/// Non-negative wall distance between two timestamps. A feed that goes
/// backwards in time reads as zero elapsed.
fn duration_since(later: DateTime<Utc>, earlier: DateTime<Utc>) -> Duration {
    later
        .signed_duration_since(earlier)
        .to_std()
        .unwrap_or(Duration::ZERO)
}
