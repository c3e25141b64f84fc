//! Coach voice — templated text generation for reactions, greetings, jokes.
//!
//! The engine core is deterministic; every random template choice lives
//! behind this trait. The engine supplies only the selected category, stage,
//! or champion — which variant comes out is this collaborator's business.

use rand::seq::SliceRandom;

use crate::moment::MomentContext;
use crate::types::{MemoryCategory, RelationshipStage};

/// Text-generation seam between the deterministic engine and the templated
/// coach persona.
pub trait CoachVoice: Send + Sync {
    /// Reaction line for a freshly recorded moment.
    fn reaction(&self, category: MemoryCategory, context: &MomentContext) -> String;

    /// Generic acknowledgment for matches that produced no moment.
    fn acknowledgment(&self) -> String;

    /// Greeting appropriate to the current relationship stage.
    fn greeting(&self, stage: RelationshipStage) -> String;

    /// An inside-joke line about a champion the player keeps returning to.
    fn joke(&self, champion: &str) -> String;
}

// ---------------------------------------------------------------------------
// Default template voice
// ---------------------------------------------------------------------------

/// Default voice: canned variants per category/stage, chosen uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateVoice;

impl TemplateVoice {
    fn pick(options: &[&str]) -> String {
        let mut rng = rand::thread_rng();
        options
            .choose(&mut rng)
            .copied()
            .unwrap_or("Good game out there.")
            .to_string()
    }
}

impl CoachVoice for TemplateVoice {
    fn reaction(&self, category: MemoryCategory, _context: &MomentContext) -> String {
        match category {
            MemoryCategory::EpicPlay => Self::pick(&[
                "THAT was a statement game. Absolutely dominant.",
                "You didn't just win that, you owned it. Clip it.",
                "Games like that are why we review the wins too. Superb.",
            ]),
            MemoryCategory::ClutchMoment => Self::pick(&[
                "I'm still shaking. That multi-kill was outrageous.",
                "Win or lose, nobody takes that play away from you.",
                "That's the highlight reel sorted for the week.",
            ]),
            MemoryCategory::Mistake => Self::pick(&[
                "Rough one. Let's figure out where it slipped.",
                "Everyone has those games. The review is where we earn it back.",
                "Shake it off. The next queue is a clean slate.",
            ]),
            MemoryCategory::LearningMoment => Self::pick(&[
                "You played better than the scoreboard says. Keep that up.",
                "Losses like that one are wins in disguise. Good fundamentals.",
                "Your team lost; you didn't. We build on this.",
            ]),
            MemoryCategory::FunnyMoment => Self::pick(&[
                "I'm not going to let you forget that one.",
                "Okay, that was genuinely hilarious.",
            ]),
        }
    }

    fn acknowledgment(&self) -> String {
        Self::pick(&[
            "Good game out there.",
            "Logged and analyzed. On to the next one.",
            "Solid queue. Let's keep the rhythm going.",
        ])
    }

    fn greeting(&self, stage: RelationshipStage) -> String {
        match stage {
            RelationshipStage::Stranger => Self::pick(&[
                "Hey there. Ready to see what you've got?",
                "Welcome. Let's get a baseline going.",
            ]),
            RelationshipStage::Acquaintance => Self::pick(&[
                "Back again! I'm starting to learn your style.",
                "Good to see you. I've got notes from last time.",
            ]),
            RelationshipStage::Friend => Self::pick(&[
                "There you are! I was just reviewing your games.",
                "Hey! Ready to climb today?",
            ]),
            RelationshipStage::BestFriend => Self::pick(&[
                "My favorite player returns. Let's cook.",
                "You and me, same as always. Queue up.",
            ]),
            RelationshipStage::Legend => Self::pick(&[
                "The legend graces me with their presence.",
                "After everything we've been through, let's add another chapter.",
            ]),
        }
    }

    fn joke(&self, champion: &str) -> String {
        Self::pick(&[
            "At this point {champion} should pay you rent.",
            "Another {champion} game? I'm sensing a pattern here.",
            "You and {champion} — name a more iconic duo. I'll wait.",
        ])
        .replace("{champion}", champion)
    }
}

// ---------------------------------------------------------------------------
// Deterministic voice for tests
// ---------------------------------------------------------------------------

/// A voice that always returns the same fixed lines. Useful in tests and
/// snapshot tooling where the text must be stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedVoice;

impl CoachVoice for FixedVoice {
    fn reaction(&self, category: MemoryCategory, _context: &MomentContext) -> String {
        format!("reaction:{category:?}")
    }

    fn acknowledgment(&self) -> String {
        "acknowledgment".to_string()
    }

    fn greeting(&self, stage: RelationshipStage) -> String {
        format!("greeting:{stage:?}")
    }

    fn joke(&self, champion: &str) -> String {
        format!("joke:{champion}")
    }
}
