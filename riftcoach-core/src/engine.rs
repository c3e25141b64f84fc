//! Engine orchestration — the three public operations and their sequencing.
//!
//! [`CoachEngine`] wires the pure pipeline stages (extract → score →
//! insight → classify) to the stateful updaters (profile, personality,
//! flow) and commits each match's mutations atomically through the store.
//!
//! All mutations for one player are serialized: the engine holds that
//! player's mutex for the full update sequence, because the profile blend is
//! a read-modify-write that is neither commutative nor associative across
//! interleavings. Different players proceed fully in parallel.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::achievement::{self, Achievement, AggregatedStats};
use crate::config::EngineConfig;
use crate::counters::{CounterSnapshot, EngineCounters};
use crate::error::Result;
use crate::extract::{self, RawMatch};
use crate::flow::{FlowState, LiveSignals};
use crate::insight;
use crate::moment::{self, MemoryMoment, MomentContext};
use crate::persistence::PlayerStore;
use crate::profile::{SkillProfile, SubScores};
use crate::relationship::{self, PersonalityEvolution};
use crate::scoring;
use crate::types::{MatchId, MatchOutcome, MemoryCategory, PlayerId};
use crate::voice::{CoachVoice, TemplateVoice};

/// Everything a display/templating collaborator needs from one analyzed
/// match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchAnalysisResult {
    /// The analyzed match.
    pub match_id: MatchId,
    /// Champion the player was on.
    pub champion_name: String,
    /// Assigned role / lane.
    pub role: String,
    /// Match outcome.
    pub outcome: MatchOutcome,
    /// "K/D/A" display string.
    pub kda: String,
    /// Performance score, 0–100.
    pub performance_score: f64,
    /// Per-match flow score, 0–100.
    pub flow_state_score: f64,
    /// Ordered human-readable insight tags; never empty.
    pub insights: Vec<String>,
    /// Memory category, when the match crossed a threshold.
    pub memory_category: Option<MemoryCategory>,
    /// Coach reaction line (generic acknowledgment when no moment fired).
    pub coach_reaction: String,
}

/// The player performance & relationship modeling engine.
pub struct CoachEngine {
    store: PlayerStore,
    config: EngineConfig,
    voice: Box<dyn CoachVoice>,
    counters: EngineCounters,
    locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for CoachEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachEngine")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CoachEngine {
    /// Create an engine over `store` with the default template voice.
    #[must_use]
    pub fn new(store: PlayerStore, config: EngineConfig) -> Self {
        Self::with_voice(store, config, Box::new(TemplateVoice))
    }

    /// Create an engine with a custom voice collaborator.
    #[must_use]
    pub fn with_voice(store: PlayerStore, config: EngineConfig, voice: Box<dyn CoachVoice>) -> Self {
        Self {
            store,
            config,
            voice,
            counters: EngineCounters::new(),
            locks: DashMap::new(),
        }
    }

    fn player_lock(&self, player: PlayerId) -> Arc<Mutex<()>> {
        self.locks.entry(player).or_default().value().clone()
    }

    // ------------------------------------------------------------------
    // Operation: analyze a match
    // ------------------------------------------------------------------

    /// Analyze one raw match for `player`.
    ///
    /// Runs the full pipeline and commits the resulting profile, optional
    /// memory moment, and personality advance atomically. Submitting the
    /// same match twice recomputes the display result but writes nothing.
    ///
    /// # Errors
    /// Returns [`crate::CoachError::PlayerNotFoundInMatch`] when the player
    /// has no participant record, or a storage error; in both cases no state
    /// is written.
    pub fn analyze_match(&self, player: PlayerId, raw: &RawMatch) -> Result<MatchAnalysisResult> {
        let lock = self.player_lock(player);
        let _guard = lock.lock();

        let metrics = extract::participant_metrics(raw, player)?;
        let performance = scoring::performance_score(&metrics);
        let match_flow = scoring::match_flow_score(&metrics);
        let insights: Vec<String> = insight::generate(&metrics)
            .into_iter()
            .map(|i| i.label().to_string())
            .collect();
        let category = moment::classify(&metrics, performance);
        let now = Utc::now();

        let mut profile = self
            .store
            .load_profile(player)?
            .unwrap_or_else(|| SkillProfile::new(now));
        profile.apply_match(
            &SubScores::from_metrics(&metrics),
            self.config.scoring.new_match_weight,
            self.config.scoring.trend_threshold,
            now,
        );

        let mut new_moment = None;
        let mut personality_update = None;
        let mut joke_coined = false;
        if let Some(category) = category {
            let reaction = self
                .voice
                .reaction(category, &MomentContext::from_metrics(&metrics));
            let recorded =
                MemoryMoment::from_match(category, &metrics, performance, reaction, now);

            let mut personality = self
                .store
                .load_personality(player)?
                .unwrap_or_else(|| PersonalityEvolution::new(now));
            personality.record_moment(&recorded, &self.config.relationship, now);

            let window = self.config.relationship.joke_window;
            let mut recent = vec![recorded.clone()];
            recent.extend(self.store.recent_moments(player, window.saturating_sub(1))?);
            if let Some(champion) = relationship::joke_candidate(&recent, &personality, window) {
                let text = self.voice.joke(&champion);
                info!(player = %player, champion = %champion, "inside joke coined");
                personality.add_joke(champion, text, now);
                joke_coined = true;
            }

            new_moment = Some(recorded);
            personality_update = Some(personality);
        }

        let applied = self.store.commit_analysis(
            player,
            &metrics.match_id,
            &profile,
            new_moment.as_ref(),
            personality_update.as_ref(),
            now,
        )?;

        if applied {
            self.counters.matches_analyzed.fetch_add(1, Ordering::Relaxed);
            if new_moment.is_some() {
                self.counters.moments_recorded.fetch_add(1, Ordering::Relaxed);
            }
            if joke_coined {
                self.counters.jokes_created.fetch_add(1, Ordering::Relaxed);
            }
            info!(
                player = %player,
                match_id = %metrics.match_id,
                performance = performance,
                category = ?category,
                "match analyzed"
            );
        } else {
            self.counters.duplicate_matches.fetch_add(1, Ordering::Relaxed);
            debug!(player = %player, match_id = %metrics.match_id, "duplicate match submission");
        }

        let coach_reaction = new_moment
            .as_ref()
            .map_or_else(|| self.voice.acknowledgment(), |m| m.coach_reaction.clone());

        Ok(MatchAnalysisResult {
            match_id: metrics.match_id.clone(),
            champion_name: metrics.champion.clone(),
            role: metrics.role.clone(),
            outcome: MatchOutcome::from_win(metrics.win),
            kda: metrics.kda_display(),
            performance_score: performance,
            flow_state_score: match_flow,
            insights,
            memory_category: category,
            coach_reaction,
        })
    }

    // ------------------------------------------------------------------
    // Operation: update the session flow state
    // ------------------------------------------------------------------

    /// Fold live session signals into the player's flow state.
    ///
    /// # Errors
    /// Returns a storage error; the state is unchanged on failure.
    pub fn update_flow_state(&self, player: PlayerId, signals: &LiveSignals) -> Result<FlowState> {
        let lock = self.player_lock(player);
        let _guard = lock.lock();

        let now = Utc::now();
        let mut state = self
            .store
            .load_flow(player)?
            .unwrap_or_else(|| FlowState::new(now));
        state.apply_signals(signals, &self.config.flow, now);
        self.store.save_flow(player, &state, now)?;
        self.counters.flow_updates.fetch_add(1, Ordering::Relaxed);
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Operation: evaluate achievements
    // ------------------------------------------------------------------

    /// Evaluate the catalog against `stats` and unlock anything newly
    /// earned. Returns only the achievements unlocked by this call; a
    /// concurrent or retried duplicate unlock is a silent no-op.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn evaluate_achievements(
        &self,
        player: PlayerId,
        stats: &AggregatedStats,
    ) -> Result<Vec<Achievement>> {
        let lock = self.player_lock(player);
        let _guard = lock.lock();

        let already = self.store.unlocked_ids(player)?;
        let now = Utc::now();

        let mut newly = Vec::new();
        for def in achievement::newly_satisfied(stats, &already) {
            if self.store.try_unlock(player, def.id, now)? {
                info!(player = %player, achievement = def.id, rarity = ?def.rarity, "achievement unlocked");
                self.counters.achievements_unlocked.fetch_add(1, Ordering::Relaxed);
                newly.push(Achievement::from_def(def, now));
            }
        }
        Ok(newly)
    }

    // ------------------------------------------------------------------
    // Read-side accessors
    // ------------------------------------------------------------------

    /// The player's current skill profile, if any match has been analyzed.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn skill_profile(&self, player: PlayerId) -> Result<Option<SkillProfile>> {
        self.store.load_profile(player)
    }

    /// The player's personality evolution, if any moment has been recorded.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn personality(&self, player: PlayerId) -> Result<Option<PersonalityEvolution>> {
        self.store.load_personality(player)
    }

    /// The player's session flow state, if any update has been applied.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn flow_state(&self, player: PlayerId) -> Result<Option<FlowState>> {
        self.store.load_flow(player)
    }

    /// The player's most recent moments, newest first.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn recent_moments(&self, player: PlayerId, limit: usize) -> Result<Vec<MemoryMoment>> {
        self.store.recent_moments(player, limit)
    }

    /// All achievements the player has unlocked, in unlock order.
    ///
    /// Unlock records whose definition has left the catalog are skipped.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn unlocked_achievements(&self, player: PlayerId) -> Result<Vec<Achievement>> {
        let catalog = achievement::catalog();
        let mut unlocked = Vec::new();
        for (id, at) in self.store.unlocks(player)? {
            match catalog.iter().find(|def| def.id == id) {
                Some(def) => unlocked.push(Achievement::from_def(def, at)),
                None => warn!(achievement = %id, "unlock record with no catalog entry"),
            }
        }
        Ok(unlocked)
    }

    /// A stage-appropriate greeting for the player.
    ///
    /// # Errors
    /// Returns a storage error.
    pub fn greeting(&self, player: PlayerId) -> Result<String> {
        let stage = self
            .store
            .load_personality(player)?
            .map_or(crate::types::RelationshipStage::Stranger, |p| p.stage());
        Ok(self.voice.greeting(stage))
    }

    /// Snapshot of the engine's runtime counters.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }
}
