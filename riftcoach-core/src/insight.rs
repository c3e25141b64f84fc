//! Insight generation — match metrics → ordered human-readable tags.
//!
//! Each insight is an independent threshold predicate; they are evaluated in
//! a fixed order and the output order is the evaluation order. The list is
//! never empty: when nothing fires, the generic fallback is emitted alone.

use serde::{Deserialize, Serialize};

use crate::extract::ParticipantMetrics;

/// A single match insight shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    /// 10 or more kills.
    HighKillParticipation,
    /// Zero deaths.
    Deathless,
    /// 7 or more CS per minute.
    EfficientFarming,
    /// More than 20 000 damage to champions.
    HighDamageOutput,
    /// Vision score of 30 or more.
    StrongMapAwareness,
    /// 3 or more turret + inhibitor takedowns.
    ObjectiveFocus,
    /// Fallback when no other insight fires.
    SolidOverall,
}

impl Insight {
    /// Human-readable tag text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HighKillParticipation => "high kill participation",
            Self::Deathless => "no deaths",
            Self::EfficientFarming => "efficient farming",
            Self::HighDamageOutput => "high damage output",
            Self::StrongMapAwareness => "strong map awareness",
            Self::ObjectiveFocus => "objective focus",
            Self::SolidOverall => "solid performance overall",
        }
    }
}

/// Generate the ordered insight list for one match.
#[must_use]
pub fn generate(m: &ParticipantMetrics) -> Vec<Insight> {
    let mut insights = Vec::new();

    if m.kills >= 10 {
        insights.push(Insight::HighKillParticipation);
    }
    if m.deaths == 0 {
        insights.push(Insight::Deathless);
    }
    if m.cs_per_minute() >= 7.0 {
        insights.push(Insight::EfficientFarming);
    }
    if m.damage_dealt > 20_000 {
        insights.push(Insight::HighDamageOutput);
    }
    if m.vision_score >= 30 {
        insights.push(Insight::StrongMapAwareness);
    }
    if m.turret_kills + m.inhibitor_kills >= 3 {
        insights.push(Insight::ObjectiveFocus);
    }

    if insights.is_empty() {
        insights.push(Insight::SolidOverall);
    }
    insights
}
