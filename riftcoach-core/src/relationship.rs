//! Relationship / personality evolution between player and coach.
//!
//! Every recorded memory moment advances the relationship: the interaction
//! count and trust level only ever go up, and the stage is re-derived from
//! the count on every read (see [`RelationshipStage::from_interactions`]) —
//! it is never stored, so it can never drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::RelationshipConfig;
use crate::moment::MemoryMoment;
use crate::types::RelationshipStage;

/// An inside joke the coach has developed about a champion the player keeps
/// returning to. At most one per champion, ever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsideJoke {
    /// Champion the joke is about.
    pub champion: String,
    /// The joke line itself (voice-generated).
    pub text: String,
    /// When the joke was coined.
    pub created_at: DateTime<Utc>,
}

/// The persisted relationship state between one player and their coach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityEvolution {
    /// Total recorded moments. Monotonic increment.
    pub interaction_count: u32,
    /// Trust level, 0–100. Monotonic non-decreasing.
    pub trust_level: f64,
    /// Append-only inside jokes, at most one per champion.
    pub personal_jokes: Vec<InsideJoke>,
    /// Recent shared-experience descriptions (window-bounded).
    pub shared_experiences: Vec<String>,
    /// When the relationship last advanced.
    pub last_updated: DateTime<Utc>,
}

impl PersonalityEvolution {
    /// A brand-new relationship: stranger, no trust.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interaction_count: 0,
            trust_level: 0.0,
            personal_jokes: Vec::new(),
            shared_experiences: Vec::new(),
            last_updated: now,
        }
    }

    /// Current relationship stage, derived from the interaction count.
    #[must_use]
    pub fn stage(&self) -> RelationshipStage {
        RelationshipStage::from_interactions(self.interaction_count)
    }

    /// Advance the relationship for one recorded moment.
    ///
    /// Epic plays and clutch moments deepen trust; every moment counts as an
    /// interaction and lands in the shared-experience window.
    pub fn record_moment(
        &mut self,
        moment: &MemoryMoment,
        config: &RelationshipConfig,
        now: DateTime<Utc>,
    ) {
        self.interaction_count += 1;
        if moment.category.builds_trust() {
            self.trust_level = (self.trust_level + config.trust_bonus).min(100.0);
        }

        self.shared_experiences.push(moment.description.clone());
        if self.shared_experiences.len() > config.max_shared_experiences {
            let excess = self.shared_experiences.len() - config.max_shared_experiences;
            self.shared_experiences.drain(..excess);
        }
        self.last_updated = now;
    }

    /// Whether a joke already exists for `champion`.
    #[must_use]
    pub fn has_joke_for(&self, champion: &str) -> bool {
        self.personal_jokes.iter().any(|j| j.champion == champion)
    }

    /// Append a freshly coined joke. Callers must gate on
    /// [`Self::has_joke_for`]; this keeps the one-joke-per-champion
    /// invariant at the write site too.
    pub fn add_joke(&mut self, champion: String, text: String, now: DateTime<Utc>) {
        if self.has_joke_for(&champion) {
            return;
        }
        self.personal_jokes.push(InsideJoke {
            champion,
            text,
            created_at: now,
        });
        self.last_updated = now;
    }
}

/// Find the champion that should produce a new inside joke, if any.
///
/// Inspects the `window` most recent moments (newest first). A candidate
/// emerges only when the window is full, one champion is *strictly* most
/// frequent in it, and no joke exists for that champion yet. Pure: no state
/// is touched.
#[must_use]
pub fn joke_candidate(
    recent_moments: &[MemoryMoment],
    personality: &PersonalityEvolution,
    window: usize,
) -> Option<String> {
    if window == 0 || recent_moments.len() < window {
        return None;
    }

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for moment in &recent_moments[..window] {
        *counts.entry(moment.context.champion.as_str()).or_insert(0) += 1;
    }

    let (&leader, &leader_count) = counts.iter().max_by_key(|&(_, &count)| count)?;
    let strictly_most_frequent = counts
        .iter()
        .all(|(&champ, &count)| champ == leader || count < leader_count);

    if strictly_most_frequent && !personality.has_joke_for(leader) {
        Some(leader.to_string())
    } else {
        None
    }
}
