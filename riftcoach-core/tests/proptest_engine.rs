//! Property-based tests for the engine's numeric invariants.
//!
//! Random stat lines and update sequences must never break the clamp,
//! derived-mean, purity, or monotonicity guarantees.

use chrono::Utc;
use proptest::prelude::*;

use riftcoach_core::config::{FlowConfig, RelationshipConfig};
use riftcoach_core::extract::ParticipantMetrics;
use riftcoach_core::flow::{FlowState, LiveSignals};
use riftcoach_core::moment::{self, MemoryMoment};
use riftcoach_core::profile::{SkillProfile, SubScores};
use riftcoach_core::relationship::PersonalityEvolution;
use riftcoach_core::scoring;
use riftcoach_core::types::{MatchId, MemoryCategory, RelationshipStage};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

prop_compose! {
    fn arb_metrics()(
        win in any::<bool>(),
        combat in (0u32..40, 0u32..25, 0u32..40, 0u32..25),
        economy in (0u32..500, 0u32..120_000, 0u32..120),
        objectives in (0u32..12, 0u32..4, 0u32..4, 0u32..6),
        multis in (0u32..6, 0u32..4, 0u32..3, 0u32..2),
        timings in (0u32..3000, 0u32..4000),
    ) -> ParticipantMetrics {
        let (kills, deaths, assists, spree) = combat;
        let (cs, damage, vision) = economy;
        let (turrets, inhibitors, barons, dragons) = objectives;
        let (doubles, triples, quadras, pentas) = multis;
        let (alive, seconds) = timings;
        ParticipantMetrics {
            match_id: MatchId("NA1_PROP".to_string()),
            champion: "Ahri".to_string(),
            role: "MID".to_string(),
            opponent_champion: None,
            win,
            kills,
            deaths,
            assists,
            cs,
            gold_earned: 0,
            damage_dealt: damage,
            damage_taken: 0,
            vision_score: vision,
            turret_kills: turrets,
            inhibitor_kills: inhibitors,
            baron_kills: barons,
            dragon_kills: dragons,
            largest_killing_spree: spree,
            double_kills: doubles,
            triple_kills: triples,
            quadra_kills: quadras,
            penta_kills: pentas,
            longest_time_alive_secs: alive,
            time_played_secs: seconds,
        }
    }
}

fn arb_category() -> impl Strategy<Value = MemoryCategory> {
    prop_oneof![
        Just(MemoryCategory::EpicPlay),
        Just(MemoryCategory::ClutchMoment),
        Just(MemoryCategory::Mistake),
        Just(MemoryCategory::LearningMoment),
        Just(MemoryCategory::FunnyMoment),
    ]
}

// ---------------------------------------------------------------------------
// Property: both scores are always within [0, 100]
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scores_always_clamped(m in arb_metrics()) {
        let performance = scoring::performance_score(&m);
        prop_assert!((0.0..=100.0).contains(&performance));

        let flow = scoring::match_flow_score(&m);
        prop_assert!((0.0..=100.0).contains(&flow));
    }
}

// ---------------------------------------------------------------------------
// Property: derived sub-scores are always within [0, 100]
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn sub_scores_always_clamped(m in arb_metrics()) {
        let derived = SubScores::from_metrics(&m);
        for value in [
            derived.mechanics,
            derived.macro_play,
            derived.decision_making,
            derived.consistency,
            derived.clutch_factor,
        ] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }
}

// ---------------------------------------------------------------------------
// Property: overall rating is the mean of the stored sub-scores after
// every update in any match sequence
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn overall_rating_is_always_the_mean(matches in prop::collection::vec(arb_metrics(), 1..20)) {
        let mut profile = SkillProfile::new(Utc::now());
        for m in &matches {
            profile.apply_match(&SubScores::from_metrics(m), 0.7, 2.0, Utc::now());

            let mean = (profile.mechanics
                + profile.macro_play
                + profile.decision_making
                + profile.consistency
                + profile.clutch_factor)
                / 5.0;
            prop_assert!((profile.overall_rating - mean).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&profile.overall_rating));
        }
        prop_assert_eq!(profile.matches_analyzed as usize, matches.len());
    }
}

// ---------------------------------------------------------------------------
// Property: the classifier is a pure function of its inputs
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classification_is_pure(m in arb_metrics(), score in 0.0..100.0f64) {
        let first = moment::classify(&m, score);
        for _ in 0..5 {
            prop_assert_eq!(moment::classify(&m, score), first);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: the classifier never emits FunnyMoment from match data
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classifier_never_invents_funny_moments(m in arb_metrics(), score in 0.0..100.0f64) {
        prop_assert_ne!(moment::classify(&m, score), Some(MemoryCategory::FunnyMoment));
    }
}

// ---------------------------------------------------------------------------
// Property: trust and interaction count never decrease; stage never
// regresses across any category sequence
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn relationship_is_monotonic(categories in prop::collection::vec(arb_category(), 1..60)) {
        let config = RelationshipConfig::default();
        let mut personality = PersonalityEvolution::new(Utc::now());

        let mut prev_trust = personality.trust_level;
        let mut prev_count = personality.interaction_count;
        let mut prev_stage = personality.stage();

        for (i, category) in categories.iter().enumerate() {
            let m = ParticipantMetrics {
                match_id: MatchId(format!("NA1_{i}")),
                champion: "Ahri".to_string(),
                role: "MID".to_string(),
                opponent_champion: None,
                win: true,
                kills: 10,
                deaths: 1,
                assists: 5,
                cs: 150,
                gold_earned: 0,
                damage_dealt: 0,
                damage_taken: 0,
                vision_score: 0,
                turret_kills: 0,
                inhibitor_kills: 0,
                baron_kills: 0,
                dragon_kills: 0,
                largest_killing_spree: 3,
                double_kills: 0,
                triple_kills: 0,
                quadra_kills: 0,
                penta_kills: 0,
                longest_time_alive_secs: 0,
                time_played_secs: 1800,
            };
            let moment = MemoryMoment::from_match(*category, &m, 75.0, "gg".to_string(), Utc::now());
            personality.record_moment(&moment, &config, Utc::now());

            prop_assert!(personality.trust_level >= prev_trust);
            prop_assert!(personality.trust_level <= 100.0);
            prop_assert!(personality.interaction_count > prev_count);
            prop_assert!(personality.stage() >= prev_stage);

            prev_trust = personality.trust_level;
            prev_count = personality.interaction_count;
            prev_stage = personality.stage();
        }
    }
}

// ---------------------------------------------------------------------------
// Property: the stage step function is monotonic over raw counts
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn stage_step_function_is_monotonic(a in 0u32..500, b in 0u32..500) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            RelationshipStage::from_interactions(lo) <= RelationshipStage::from_interactions(hi)
        );
    }
}

// ---------------------------------------------------------------------------
// Property: flow score clamps and time-in-flow only ever grows
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn flow_state_invariants(
        rounds in prop::collection::vec(
            (0.0..100.0f64, 0u32..100, 0.0..100.0f64, 0.0..100.0f64),
            1..40,
        )
    ) {
        let config = FlowConfig::default();
        let mut state = FlowState::new(Utc::now());
        let mut prev_time_in_flow = 0u64;

        for (quality, streak, confidence, focus) in rounds {
            let signals = LiveSignals {
                decision_quality: quality,
                win_streak: streak,
                confidence,
                focus_level: focus,
            };
            state.apply_signals(&signals, &config, Utc::now());

            prop_assert!((0.0..=100.0).contains(&state.flow_score));
            prop_assert_eq!(state.is_in_flow, state.flow_score >= config.in_flow_threshold);
            prop_assert!(state.time_in_flow >= prev_time_in_flow);
            prev_time_in_flow = state.time_in_flow;
        }
    }
}
