//! Timed haptic pulse scheduling.
//!
//! Computes on/off timing from a target cadence and duty cycle, then drives
//! the actuator in strictly sequential cycles until told to stop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use entrain_types::{MonitorEvent, PulseConfig};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::actuator::Actuator;

/// On/off split of a single pulse period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    /// Time the actuator is driven each cycle.
    pub on: Duration,
    /// Rest time after each pulse.
    pub off: Duration,
}

impl PulseTiming {
    /// Compute timing for a cadence (pulses per minute) and duty cycle.
    ///
    /// `period = 60000 / cadence_bpm` milliseconds, split by the duty cycle.
    /// Callers gate on [`entrain_types::MonitorConfig::validate`], which
    /// rejects a zero cadence and degenerate duty cycles.
    pub fn from_cadence(cadence_bpm: u32, duty_cycle: f64) -> Self {
        let period_ms = 60_000.0 / cadence_bpm.max(1) as f64;
        let on_ms = period_ms * duty_cycle.clamp(0.0, 1.0);
        Self {
            on: Duration::from_secs_f64(on_ms / 1000.0),
            off: Duration::from_secs_f64((period_ms - on_ms) / 1000.0),
        }
    }

    /// Full cycle length.
    pub fn period(&self) -> Duration {
        self.on + self.off
    }
}

/// Drives the actuator in a repeating pulse cycle on a background task.
///
/// Owned by the session state machine for the lifetime of one active session.
/// Each completed cycle increments a counter visible through [`Self::cycles`].
/// Actuator errors skip the cycle without halting the schedule.
pub struct PulseScheduler {
    actuator: Arc<dyn Actuator>,
    cycles: Arc<AtomicU64>,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PulseScheduler {
    /// Start pulsing at the configured cadence.
    pub fn start(
        actuator: Arc<dyn Actuator>,
        config: &PulseConfig,
        event_tx: broadcast::Sender<MonitorEvent>,
    ) -> Self {
        let timing = PulseTiming::from_cadence(config.cadence_bpm, config.duty_cycle);
        let cadence_bpm = config.cadence_bpm;
        let progress_interval = config.progress_interval;
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let cycles = Arc::new(AtomicU64::new(0));

        let task_actuator = Arc::clone(&actuator);
        let task_cycles = Arc::clone(&cycles);
        let handle = tokio::spawn(async move {
            info!(
                cadence_bpm,
                on_ms = timing.on.as_millis() as u64,
                off_ms = timing.off.as_millis() as u64,
                "pulse scheduler started"
            );
            let started = Instant::now();
            let mut last_progress = started;

            loop {
                if *stop_rx.borrow() {
                    break;
                }

                tokio::select! {
                    changed = stop_rx.changed() => {
                        // A closed channel means the scheduler handle is gone;
                        // that counts as a stop signal.
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    outcome = task_actuator.pulse(timing.on, timing.off) => {
                        match outcome {
                            Ok(()) => {
                                task_cycles.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(e) => {
                                warn!(error = %e, "pulse cycle failed, skipping");
                                // Hold the cadence: rest one full period before
                                // the next attempt.
                                tokio::select! {
                                    changed = stop_rx.changed() => {
                                        if changed.is_err() || *stop_rx.borrow() {
                                            break;
                                        }
                                    }
                                    _ = tokio::time::sleep(timing.period()) => {}
                                }
                            }
                        }

                        if last_progress.elapsed() >= progress_interval {
                            let _ = event_tx.send(MonitorEvent::Pulsing {
                                at: Utc::now(),
                                cadence_bpm,
                                elapsed: started.elapsed(),
                            });
                            last_progress = Instant::now();
                        }
                    }
                }
            }

            debug!(
                cycles = task_cycles.load(Ordering::Relaxed),
                "pulse scheduler exiting"
            );
        });

        Self {
            actuator,
            cycles,
            stop_tx,
            handle,
        }
    }

    /// Number of completed pulse cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Stop the schedule, cancel any in-flight pulse, and silence the device.
    ///
    /// Actuator stop failures are logged; internal cleanup completes either way.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "pulse task did not shut down cleanly");
        }
        if let Err(e) = self.actuator.stop().await {
            warn!(error = %e, "actuator stop failed");
        }
    }
}
