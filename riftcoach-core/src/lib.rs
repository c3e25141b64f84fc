//! # riftcoach Core Library
//!
//! Match-telemetry engine behind the riftcoach companion: every analyzed
//! match feeds three evolving per-player models that drive coaching text,
//! achievement unlocks, and UI displays.
//!
//! - **Skill profile** — five exponentially-smoothed sub-scores with a
//!   derived overall rating and trend
//! - **Flow state** — a session-level indicator of sustained high-quality
//!   play, fed by live signals
//! - **Relationship** — trust, stage, and inside jokes the coach persona
//!   accumulates from memorable matches
//!
//! The pipeline stages (extraction, scoring, insights, moment
//! classification) are pure functions over one match's metrics; the
//! [`engine::CoachEngine`] sequences them, serializes all mutations per
//! player, and commits each match atomically through the SQLite-backed
//! [`persistence::PlayerStore`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod achievement;
pub mod config;
pub mod counters;
pub mod engine;
pub mod error;
pub mod extract;
pub mod flow;
pub mod insight;
pub mod moment;
pub mod persistence;
pub mod profile;
pub mod relationship;
pub mod scoring;
pub mod types;
pub mod voice;

pub use config::EngineConfig;
pub use engine::{CoachEngine, MatchAnalysisResult};
pub use error::CoachError;
pub use persistence::PlayerStore;
pub use types::*;
