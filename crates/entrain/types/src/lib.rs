//! # Entrain Types
//!
//! Core types for the entrain engine: physiological samples, detection and
//! pulse configuration, trigger classification, session lifecycle events, and
//! immutable episode records.
//!
//! ## Module Organization
//!
//! - [`sample`]: Physiological samples from the sensor feed
//! - [`config`]: Immutable monitor configuration and presets
//! - [`trigger`]: Trigger and abort classifications
//! - [`event`]: Observable session lifecycle events
//! - [`episode`]: Immutable per-session summary records
//! - [`errors`]: Configuration validation errors

#![deny(unsafe_code)]

pub mod config;
pub mod episode;
pub mod errors;
pub mod event;
pub mod sample;
pub mod trigger;

pub use config::{
    DetectionConfig, MonitorConfig, PulseConfig, SessionConfig, SessionProfile,
};
pub use episode::{Episode, EpisodeId, EpisodeOutcome};
pub use errors::ConfigError;
pub use event::MonitorEvent;
pub use sample::Sample;
pub use trigger::{AbortReason, TriggerReason};
