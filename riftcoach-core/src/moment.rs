//! Memory moments — classification and the append-only moment record.
//!
//! A moment is a match worth remembering. Classification runs a strict
//! priority ladder over one match's metrics: the first rule that matches
//! wins, and most matches produce no moment at all. Dramatic multi-kills
//! outrank the mistake rule on purpose — a penta on a loss is reported as
//! clutch, not as a mistake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::ParticipantMetrics;
use crate::types::{MatchId, MemoryCategory, MomentId};

// Classification thresholds.
const EPIC_PLAY_SCORE: f64 = 80.0;
const LEARNING_SCORE: f64 = 60.0;
const MISTAKE_DEATHS: u32 = 5;

/// Classify one match into a memory category, if it crosses any threshold.
///
/// Pure: the same metrics and performance score always yield the same
/// category. Priority order:
///
/// 1. score ≥ 80 on a win → [`MemoryCategory::EpicPlay`]
/// 2. any quadra or penta kill → [`MemoryCategory::ClutchMoment`]
/// 3. 5+ deaths on a loss → [`MemoryCategory::Mistake`]
/// 4. score ≥ 60 on a loss → [`MemoryCategory::LearningMoment`]
/// 5. otherwise → `None`
#[must_use]
pub fn classify(m: &ParticipantMetrics, performance_score: f64) -> Option<MemoryCategory> {
    if performance_score >= EPIC_PLAY_SCORE && m.win {
        Some(MemoryCategory::EpicPlay)
    } else if m.penta_kills > 0 || m.quadra_kills > 0 {
        Some(MemoryCategory::ClutchMoment)
    } else if m.deaths >= MISTAKE_DEATHS && !m.win {
        Some(MemoryCategory::Mistake)
    } else if performance_score >= LEARNING_SCORE && !m.win {
        Some(MemoryCategory::LearningMoment)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Moment records
// ---------------------------------------------------------------------------

/// Structured context snapshot stored with a moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentContext {
    /// Champion the player was on.
    pub champion: String,
    /// Assigned role / lane.
    pub role: String,
    /// Lane opponent's champion, when resolvable.
    pub opponent: Option<String>,
    /// Kills in the triggering match.
    pub kills: u32,
    /// Deaths in the triggering match.
    pub deaths: u32,
    /// Assists in the triggering match.
    pub assists: u32,
}

impl MomentContext {
    /// Snapshot the moment-relevant slice of a match's metrics.
    #[must_use]
    pub fn from_metrics(m: &ParticipantMetrics) -> Self {
        Self {
            champion: m.champion.clone(),
            role: m.role.clone(),
            opponent: m.opponent_champion.clone(),
            kills: m.kills,
            deaths: m.deaths,
            assists: m.assists,
        }
    }
}

/// A stored, user-facing record of a notable match. Append-only: never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMoment {
    /// Unique identifier for this moment.
    pub id: MomentId,
    /// The match that triggered it — the natural idempotence key for the
    /// append.
    pub match_id: MatchId,
    /// Which category threshold the match crossed.
    pub category: MemoryCategory,
    /// When the moment was recorded.
    pub timestamp: DateTime<Utc>,
    /// Free-text description used in later coaching text.
    pub description: String,
    /// Structured context snapshot.
    pub context: MomentContext,
    /// Importance weight (0–100); equals the triggering match's performance
    /// score.
    pub emotional_weight: f64,
    /// Coach reaction line generated when the moment was recorded.
    pub coach_reaction: String,
}

impl MemoryMoment {
    /// Build a moment from a classified match.
    #[must_use]
    pub fn from_match(
        category: MemoryCategory,
        m: &ParticipantMetrics,
        performance_score: f64,
        coach_reaction: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MomentId::new(),
            match_id: m.match_id.clone(),
            category,
            timestamp,
            description: describe(category, m),
            context: MomentContext::from_metrics(m),
            emotional_weight: performance_score.clamp(0.0, 100.0),
            coach_reaction,
        }
    }
}

/// Deterministic description line for a classified match.
fn describe(category: MemoryCategory, m: &ParticipantMetrics) -> String {
    let kda = m.kda_display();
    match category {
        MemoryCategory::EpicPlay => {
            format!("Dominant {} win on {} ({})", m.role, m.champion, kda)
        }
        MemoryCategory::ClutchMoment => {
            let kill = if m.penta_kills > 0 { "penta kill" } else { "quadra kill" };
            format!("Landed a {kill} on {} ({})", m.champion, kda)
        }
        MemoryCategory::Mistake => {
            format!("Rough {} game on {} ({})", m.role, m.champion, kda)
        }
        MemoryCategory::LearningMoment => {
            format!("Strong showing in a loss on {} ({})", m.champion, kda)
        }
        MemoryCategory::FunnyMoment => {
            format!("Something funny happened on {} ({})", m.champion, kda)
        }
    }
}
