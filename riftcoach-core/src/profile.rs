//! Skill profile — the exponentially-smoothed, five-dimensional player model.
//!
//! Each analyzed match derives one set of sub-scores which is blended into
//! the stored profile at a fixed weight (new match 0.7, prior 0.3); the very
//! first match assigns directly. The blend is a read-modify-write and is not
//! commutative across interleavings, so callers must serialize updates per
//! player (the engine holds the player lock for the whole sequence).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::ParticipantMetrics;
use crate::types::Trend;

/// Per-match derived sub-scores, each already clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    /// Mechanical skill proxy (kills).
    pub mechanics: f64,
    /// Macro-play proxy (CS volume).
    pub macro_play: f64,
    /// Decision-making proxy (assists).
    pub decision_making: f64,
    /// Consistency proxy (death avoidance).
    pub consistency: f64,
    /// Clutch-factor proxy (killing sprees).
    pub clutch_factor: f64,
}

impl SubScores {
    /// Derive one match's sub-scores from its metrics.
    #[must_use]
    pub fn from_metrics(m: &ParticipantMetrics) -> Self {
        Self {
            mechanics: clamp_score(50.0 + f64::from(m.kills) * 2.0),
            macro_play: clamp_score(50.0 + f64::from(m.cs) / 100.0 * 2.0),
            decision_making: clamp_score(50.0 + f64::from(m.assists) / 10.0 * 2.0),
            consistency: clamp_score(50.0 + (100.0 - f64::from(m.deaths) * 10.0)),
            clutch_factor: clamp_score(50.0 + f64::from(m.largest_killing_spree) * 2.0),
        }
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// The persisted, smoothed skill profile for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProfile {
    /// Mechanical skill, 0–100.
    pub mechanics: f64,
    /// Macro play, 0–100.
    pub macro_play: f64,
    /// Decision making, 0–100.
    pub decision_making: f64,
    /// Consistency, 0–100.
    pub consistency: f64,
    /// Clutch factor, 0–100.
    pub clutch_factor: f64,
    /// Arithmetic mean of the five sub-scores; recomputed on every update.
    pub overall_rating: f64,
    /// Direction the overall rating moved on the most recent update.
    pub trend: Trend,
    /// How many matches have been folded into this profile.
    pub matches_analyzed: u32,
    /// When the profile was last updated.
    pub last_updated: DateTime<Utc>,
}

impl SkillProfile {
    /// A fresh profile with no matches analyzed yet.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            mechanics: 0.0,
            macro_play: 0.0,
            decision_making: 0.0,
            consistency: 0.0,
            clutch_factor: 0.0,
            overall_rating: 0.0,
            trend: Trend::Stable,
            matches_analyzed: 0,
            last_updated: now,
        }
    }

    /// Fold one match's derived sub-scores into the profile.
    ///
    /// `new_weight` is the EMA weight of the fresh observation (0.7 in the
    /// shipped tuning); the stored value keeps `1 - new_weight`. The first
    /// match assigns directly and leaves the trend Stable — there is no
    /// prior rating to compare against.
    pub fn apply_match(
        &mut self,
        derived: &SubScores,
        new_weight: f64,
        trend_threshold: f64,
        now: DateTime<Utc>,
    ) {
        let first_match = self.matches_analyzed == 0;
        let prior_overall = self.overall_rating;

        if first_match {
            self.mechanics = derived.mechanics;
            self.macro_play = derived.macro_play;
            self.decision_making = derived.decision_making;
            self.consistency = derived.consistency;
            self.clutch_factor = derived.clutch_factor;
        } else {
            let keep = 1.0 - new_weight;
            self.mechanics = self.mechanics * keep + derived.mechanics * new_weight;
            self.macro_play = self.macro_play * keep + derived.macro_play * new_weight;
            self.decision_making =
                self.decision_making * keep + derived.decision_making * new_weight;
            self.consistency = self.consistency * keep + derived.consistency * new_weight;
            self.clutch_factor = self.clutch_factor * keep + derived.clutch_factor * new_weight;
        }

        self.overall_rating = (self.mechanics
            + self.macro_play
            + self.decision_making
            + self.consistency
            + self.clutch_factor)
            / 5.0;

        self.trend = if first_match {
            Trend::Stable
        } else {
            let delta = self.overall_rating - prior_overall;
            if delta >= trend_threshold {
                Trend::Improving
            } else if delta <= -trend_threshold {
                Trend::Declining
            } else {
                Trend::Stable
            }
        };

        self.matches_analyzed += 1;
        self.last_updated = now;
    }
}
