//! Achievement catalog and evaluation.
//!
//! The catalog is a fixed table of definitions; each definition is a
//! predicate over [`AggregatedStats`]. Evaluation here is pure — the
//! engine pairs it with the store's guarded insert so an achievement id
//! unlocks at most once per player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Rarity;

/// Aggregated player statistics the achievement predicates evaluate against.
///
/// Assembled by the caller (stat aggregation is a reporting concern, not an
/// engine one) after any stat-affecting event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedStats {
    /// Lifetime wins.
    pub total_wins: u32,
    /// Lifetime matches.
    pub total_matches: u32,
    /// Current consecutive-win streak.
    pub current_win_streak: u32,
    /// Kills in the most recent match.
    pub last_match_kills: u32,
    /// Deaths in the most recent match.
    pub last_match_deaths: u32,
    /// Damage dealt in the most recent match.
    pub last_match_damage: u32,
    /// Lifetime win rate, 0.0–1.0.
    pub win_rate: f64,
    /// The player's best champion record, when one exists.
    pub best_champion: Option<ChampionRecord>,
}

/// Win-rate record for a single champion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionRecord {
    /// Champion name.
    pub name: String,
    /// Win rate on this champion, 0.0–1.0.
    pub win_rate: f64,
    /// Matches played on this champion.
    pub games: u32,
}

/// An immutable achievement definition in the catalog.
pub struct AchievementDef {
    /// Stable catalog identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Grouping for the UI ("progression", "streak", ...).
    pub category: &'static str,
    /// Rarity band (drives the display reward weight).
    pub rarity: Rarity,
    /// Unlock predicate.
    pub predicate: fn(&AggregatedStats) -> bool,
}

impl std::fmt::Debug for AchievementDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AchievementDef")
            .field("id", &self.id)
            .field("rarity", &self.rarity)
            .finish_non_exhaustive()
    }
}

/// A per-player unlock, returned to callers for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Catalog identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// UI grouping.
    pub category: String,
    /// Rarity band.
    pub rarity: Rarity,
    /// Display reward weight for this rarity.
    pub reward_points: u32,
    /// When the player unlocked it.
    pub unlocked_at: DateTime<Utc>,
}

impl Achievement {
    /// Build the display record for a definition unlocked at `unlocked_at`.
    #[must_use]
    pub fn from_def(def: &AchievementDef, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            category: def.category.to_string(),
            rarity: def.rarity,
            reward_points: def.rarity.reward_points(),
            unlocked_at,
        }
    }
}

/// The fixed achievement catalog.
#[must_use]
pub fn catalog() -> &'static [AchievementDef] {
    &CATALOG
}

static CATALOG: [AchievementDef; 11] = [
    AchievementDef {
        id: "first_victory",
        name: "First Victory",
        description: "Win your first match",
        category: "progression",
        rarity: Rarity::Common,
        predicate: |s| s.total_wins >= 1,
    },
    AchievementDef {
        id: "seasoned",
        name: "Seasoned Summoner",
        description: "Play 25 matches",
        category: "progression",
        rarity: Rarity::Common,
        predicate: |s| s.total_matches >= 25,
    },
    AchievementDef {
        id: "centurion",
        name: "Centurion",
        description: "Play 100 matches",
        category: "progression",
        rarity: Rarity::Uncommon,
        predicate: |s| s.total_matches >= 100,
    },
    AchievementDef {
        id: "hot_streak",
        name: "Hot Streak",
        description: "Win 5 matches in a row",
        category: "streak",
        rarity: Rarity::Rare,
        predicate: |s| s.current_win_streak >= 5,
    },
    AchievementDef {
        id: "unstoppable",
        name: "Unstoppable",
        description: "Win 10 matches in a row",
        category: "streak",
        rarity: Rarity::Epic,
        predicate: |s| s.current_win_streak >= 10,
    },
    AchievementDef {
        id: "untouchable",
        name: "Untouchable",
        description: "Finish a match with 5+ kills and no deaths",
        category: "performance",
        rarity: Rarity::Uncommon,
        predicate: |s| s.last_match_deaths == 0 && s.last_match_kills >= 5,
    },
    AchievementDef {
        id: "double_digits",
        name: "Double Digits",
        description: "Score 10+ kills in a single match",
        category: "performance",
        rarity: Rarity::Uncommon,
        predicate: |s| s.last_match_kills >= 10,
    },
    AchievementDef {
        id: "wrecking_ball",
        name: "Wrecking Ball",
        description: "Deal 40 000+ damage in a single match",
        category: "performance",
        rarity: Rarity::Rare,
        predicate: |s| s.last_match_damage >= 40_000,
    },
    AchievementDef {
        id: "ladder_climber",
        name: "Climbing the Ladder",
        description: "Hold a 55% win rate over 50+ matches",
        category: "consistency",
        rarity: Rarity::Rare,
        predicate: |s| s.win_rate >= 0.55 && s.total_matches >= 50,
    },
    AchievementDef {
        id: "one_trick",
        name: "One-Trick Prodigy",
        description: "Hold a 70% win rate on one champion over 10+ games",
        category: "mastery",
        rarity: Rarity::Epic,
        predicate: |s| {
            s.best_champion
                .as_ref()
                .is_some_and(|c| c.win_rate >= 0.7 && c.games >= 10)
        },
    },
    AchievementDef {
        id: "living_legend",
        name: "Living Legend",
        description: "Hold a 65% win rate over 200+ matches",
        category: "consistency",
        rarity: Rarity::Legendary,
        predicate: |s| s.win_rate >= 0.65 && s.total_matches >= 200,
    },
];

/// Evaluate the catalog against `stats`, skipping ids in `already_unlocked`.
///
/// Returns the definitions whose predicates pass, in catalog order. The
/// caller is responsible for the guarded insert that makes the unlock stick
/// exactly once.
#[must_use]
pub fn newly_satisfied(
    stats: &AggregatedStats,
    already_unlocked: &[String],
) -> Vec<&'static AchievementDef> {
    CATALOG
        .iter()
        .filter(|def| !already_unlocked.iter().any(|id| id == def.id))
        .filter(|def| (def.predicate)(stats))
        .collect()
}
