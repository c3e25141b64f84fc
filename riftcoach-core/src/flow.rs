//! Session flow-state tracking.
//!
//! Distinct from the per-match flow score in [`crate::scoring`]: this record
//! follows a play session, fed opportunistically by the UI layer with live
//! signals. `time_in_flow` is a lifetime counter — it only ever increments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FlowConfig;

/// Live session signals supplied by the caller on each update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LiveSignals {
    /// Quality of the player's recent decisions (0–100).
    pub decision_quality: f64,
    /// Current win streak.
    pub win_streak: u32,
    /// Self-reported or inferred confidence (0–100).
    pub confidence: f64,
    /// Focus level (0–100).
    pub focus_level: f64,
}

/// The continuously-updated flow indicator for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowState {
    /// Composite flow score (0–100).
    pub flow_score: f64,
    /// Whether the player is currently in flow (score at threshold or above).
    pub is_in_flow: bool,
    /// Consecutive updates with decision quality above the threshold.
    pub consecutive_good_decisions: u32,
    /// Current win streak (overwritten from the live signals).
    pub win_streak: u32,
    /// Confidence (overwritten from the live signals).
    pub confidence: f64,
    /// Focus level (overwritten from the live signals).
    pub focus_level: f64,
    /// Time units spent in flow over the lifetime of this record.
    /// Monotonic: increments while in flow, never resets.
    pub time_in_flow: u64,
    /// When this record was last updated.
    pub last_updated: DateTime<Utc>,
}

impl FlowState {
    /// A fresh, out-of-flow state.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            flow_score: 0.0,
            is_in_flow: false,
            consecutive_good_decisions: 0,
            win_streak: 0,
            confidence: 0.0,
            focus_level: 0.0,
            time_in_flow: 0,
            last_updated: now,
        }
    }

    /// Fold one round of live signals into the state.
    ///
    /// The good-decision streak grows only while decision quality stays
    /// strictly above the configured threshold and resets to zero the moment
    /// it dips; streak, confidence, and focus are taken verbatim from the
    /// signals rather than smoothed.
    pub fn apply_signals(&mut self, signals: &LiveSignals, config: &FlowConfig, now: DateTime<Utc>) {
        if signals.decision_quality > config.good_decision_threshold {
            self.consecutive_good_decisions += 1;
        } else {
            self.consecutive_good_decisions = 0;
        }

        self.win_streak = signals.win_streak;
        self.confidence = sanitize(signals.confidence);
        self.focus_level = sanitize(signals.focus_level);

        self.flow_score = ((f64::from(self.consecutive_good_decisions) * 2.0
            + f64::from(self.win_streak) * 3.0
            + self.confidence
            + self.focus_level)
            / 7.0)
            .clamp(0.0, 100.0);

        self.is_in_flow = self.flow_score >= config.in_flow_threshold;
        if self.is_in_flow {
            self.time_in_flow += 1;
        }
        self.last_updated = now;
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 100.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(decision_quality: f64) -> LiveSignals {
        LiveSignals {
            decision_quality,
            win_streak: 3,
            confidence: 88.0,
            focus_level: 85.0,
        }
    }

    #[test]
    fn good_decisions_accumulate_and_reset() {
        let config = FlowConfig::default();
        let mut state = FlowState::new(Utc::now());

        for expected in 1..=5 {
            state.apply_signals(&signals(80.0), &config, Utc::now());
            assert_eq!(state.consecutive_good_decisions, expected);
        }

        // (5*2 + 3*3 + 88 + 85) / 7 = 192/7 ≈ 27.43
        assert!((state.flow_score - 192.0 / 7.0).abs() < 1e-9);
        assert!(!state.is_in_flow);

        // One mediocre round zeroes the streak; 75 is not strictly above.
        state.apply_signals(&signals(75.0), &config, Utc::now());
        assert_eq!(state.consecutive_good_decisions, 0);
    }

    #[test]
    fn in_flow_boundary_is_exact() {
        let config = FlowConfig::default();
        let mut state = FlowState::new(Utc::now());

        // One good decision, streak 10, confidence 100, focus 100:
        // (1*2 + 10*3 + 100 + 100) / 7 = 232/7 ≈ 33.14 — far below.
        // To land exactly on 70: need cgd*2 + ws*3 + conf + focus = 490.
        // cgd=1, ws=97, conf=100, focus=97 → 2 + 291 + 100 + 97 = 490.
        let on_boundary = LiveSignals {
            decision_quality: 90.0,
            win_streak: 97,
            confidence: 100.0,
            focus_level: 97.0,
        };
        state.apply_signals(&on_boundary, &config, Utc::now());
        assert!((state.flow_score - 70.0).abs() < 1e-9);
        assert!(state.is_in_flow);
        assert_eq!(state.time_in_flow, 1);

        // One point of focus less: 489/7 ≈ 69.857 — just under.
        let below = LiveSignals {
            focus_level: 96.0,
            ..on_boundary
        };
        let mut fresh = FlowState::new(Utc::now());
        fresh.apply_signals(&below, &config, Utc::now());
        assert!(fresh.flow_score < 70.0);
        assert!(!fresh.is_in_flow);
        assert_eq!(fresh.time_in_flow, 0);
    }

    #[test]
    fn time_in_flow_never_resets() {
        let config = FlowConfig::default();
        let mut state = FlowState::new(Utc::now());

        let hot = LiveSignals {
            decision_quality: 95.0,
            win_streak: 97,
            confidence: 100.0,
            focus_level: 100.0,
        };
        let cold = LiveSignals {
            decision_quality: 10.0,
            win_streak: 0,
            confidence: 10.0,
            focus_level: 10.0,
        };

        state.apply_signals(&hot, &config, Utc::now());
        state.apply_signals(&hot, &config, Utc::now());
        assert_eq!(state.time_in_flow, 2);

        state.apply_signals(&cold, &config, Utc::now());
        assert!(!state.is_in_flow);
        assert_eq!(state.time_in_flow, 2, "leaving flow must not reset the counter");

        state.apply_signals(&hot, &config, Utc::now());
        assert_eq!(state.time_in_flow, 3);
    }

    #[test]
    fn overwrite_semantics_for_live_signals() {
        let config = FlowConfig::default();
        let mut state = FlowState::new(Utc::now());

        state.apply_signals(&signals(80.0), &config, Utc::now());
        assert_eq!(state.win_streak, 3);
        assert!((state.confidence - 88.0).abs() < 1e-9);

        // The next round replaces, never blends.
        let next = LiveSignals {
            decision_quality: 80.0,
            win_streak: 0,
            confidence: 20.0,
            focus_level: 30.0,
        };
        state.apply_signals(&next, &config, Utc::now());
        assert_eq!(state.win_streak, 0);
        assert!((state.confidence - 20.0).abs() < 1e-9);
        assert!((state.focus_level - 30.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_signals_are_squashed() {
        let config = FlowConfig::default();
        let mut state = FlowState::new(Utc::now());

        let bad = LiveSignals {
            decision_quality: 80.0,
            win_streak: 2,
            confidence: f64::NAN,
            focus_level: 250.0,
        };
        state.apply_signals(&bad, &config, Utc::now());
        assert!((state.confidence - 0.0).abs() < f64::EPSILON);
        assert!((state.focus_level - 100.0).abs() < f64::EPSILON);
        assert!(state.flow_score.is_finite());
    }
}
