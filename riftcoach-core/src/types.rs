//! Core type definitions shared across the engine.
//!
//! All persisted types are serializable; identifiers are newtypes so player,
//! match, and moment keys cannot be confused at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for a player account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Create a new random player ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a recorded memory moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MomentId(pub Uuid);

impl MomentId {
    /// Create a new random moment ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MomentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MomentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vendor-assigned match identifier (e.g. `"NA1_4911208413"`).
///
/// Carried through from the raw payload unchanged; used as the natural
/// idempotence key when the same match is submitted for analysis twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub String);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Match outcome & skill trend
// ---------------------------------------------------------------------------

/// Result of a single match from the acting player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The player's team won.
    Victory,
    /// The player's team lost.
    Defeat,
}

impl MatchOutcome {
    /// Build from the raw win flag.
    #[must_use]
    pub fn from_win(win: bool) -> Self {
        if win { Self::Victory } else { Self::Defeat }
    }

    /// Whether this outcome is a win.
    #[must_use]
    pub fn is_win(self) -> bool {
        matches!(self, Self::Victory)
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory => write!(f, "Victory"),
            Self::Defeat => write!(f, "Defeat"),
        }
    }
}

/// Direction the overall skill rating moved on the most recent update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Trend {
    /// Overall rating rose by the trend threshold or more.
    Improving,
    /// Overall rating stayed within the trend band.
    #[default]
    Stable,
    /// Overall rating fell by the trend threshold or more.
    Declining,
}

// ---------------------------------------------------------------------------
// Memory moment categories
// ---------------------------------------------------------------------------

/// Classification of a match worth remembering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    /// Dominant winning performance.
    EpicPlay,
    /// Dramatic multi-kill, win or lose.
    ClutchMoment,
    /// A rough loss worth reviewing.
    Mistake,
    /// A strong individual showing on a losing team.
    LearningMoment,
    /// Something amusing, sourced outside match classification.
    FunnyMoment,
}

impl MemoryCategory {
    /// Whether moments of this category deepen the coach's trust in the player.
    #[must_use]
    pub fn builds_trust(self) -> bool {
        matches!(self, Self::EpicPlay | Self::ClutchMoment)
    }
}

// ---------------------------------------------------------------------------
// Relationship stage
// ---------------------------------------------------------------------------

/// Discrete, monotonic classification of how far the player/coach
/// relationship has progressed.
///
/// Always derived from the interaction count via [`Self::from_interactions`];
/// never stored independently, so it cannot drift from the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStage {
    /// Fewer than 10 interactions.
    Stranger,
    /// 10–24 interactions.
    Acquaintance,
    /// 25–49 interactions.
    Friend,
    /// 50–99 interactions.
    BestFriend,
    /// 100 interactions or more.
    Legend,
}

impl RelationshipStage {
    /// Classify an interaction count into a stage.
    #[must_use]
    pub fn from_interactions(count: u32) -> Self {
        match count {
            0..=9 => Self::Stranger,
            10..=24 => Self::Acquaintance,
            25..=49 => Self::Friend,
            50..=99 => Self::BestFriend,
            _ => Self::Legend,
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Stranger => "Stranger — the coach is still sizing you up",
            Self::Acquaintance => "Acquaintance — the coach knows your habits",
            Self::Friend => "Friend — the coach genuinely roots for you",
            Self::BestFriend => "Best Friend — the coach finishes your sentences",
            Self::Legend => "Legend — you and the coach have history",
        }
    }
}

// ---------------------------------------------------------------------------
// Achievement rarity
// ---------------------------------------------------------------------------

/// Rarity band of an achievement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Expected for every active player.
    Common,
    /// Reached by most dedicated players.
    Uncommon,
    /// A real accomplishment.
    Rare,
    /// Few players ever get here.
    Epic,
    /// Career-defining.
    Legendary,
}

impl Rarity {
    /// Display-only reward weight for this rarity.
    #[must_use]
    pub fn reward_points(self) -> u32 {
        match self {
            Self::Common => 10,
            Self::Uncommon => 25,
            Self::Rare => 50,
            Self::Epic => 100,
            Self::Legendary => 250,
        }
    }
}
