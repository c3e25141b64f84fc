//! riftcoach benchmark suite.
//!
//! Hot-path timing targets:
//!   performance_score_single ...... < 1μs
//!   profile_update_single ......... < 5μs
//!   analyze_match_in_memory ....... < 2ms (dominated by SQLite)

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

use riftcoach_core::config::EngineConfig;
use riftcoach_core::engine::CoachEngine;
use riftcoach_core::extract::{RawMatch, RawParticipant};
use riftcoach_core::persistence::PlayerStore;
use riftcoach_core::profile::{SkillProfile, SubScores};
use riftcoach_core::scoring;
use riftcoach_core::types::{MatchId, PlayerId};
use riftcoach_core::voice::FixedVoice;

fn make_participant(player: PlayerId, i: u32) -> RawParticipant {
    RawParticipant {
        player_id: player,
        champion_name: "Ahri".to_string(),
        role: "MID".to_string(),
        team_id: 100,
        win: i % 2 == 0,
        kills: f64::from(i % 15),
        deaths: f64::from(i % 7),
        assists: f64::from(i % 12),
        total_minions_killed: f64::from(120 + i % 100),
        neutral_minions_killed: f64::from(i % 30),
        gold_earned: 11_000.0,
        total_damage_dealt: f64::from(15_000 + i * 100),
        total_damage_taken: 14_000.0,
        vision_score: f64::from(i % 50),
        turret_kills: f64::from(i % 4),
        inhibitor_kills: 0.0,
        baron_kills: 0.0,
        dragon_kills: 1.0,
        largest_killing_spree: f64::from(i % 8),
        double_kills: f64::from(i % 3),
        triple_kills: 0.0,
        quadra_kills: 0.0,
        penta_kills: 0.0,
        longest_time_spent_living: 700.0,
        time_played: 1800.0,
    }
}

fn make_match(player: PlayerId, i: u32) -> RawMatch {
    RawMatch {
        match_id: MatchId(format!("NA1_{i}")),
        game_duration_secs: 1800.0,
        participants: vec![
            make_participant(player, i),
            make_participant(PlayerId(Uuid::new_v4()), i + 1),
        ],
    }
}

/// Benchmark: scoring one stat line (target: < 1μs).
fn bench_performance_score(c: &mut Criterion) {
    let player = PlayerId::new();
    let raw = make_match(player, 42);
    let metrics =
        riftcoach_core::extract::participant_metrics(&raw, player).expect("player present");

    c.bench_function("performance_score_single", |b| {
        b.iter(|| {
            let score = scoring::performance_score(black_box(&metrics));
            black_box(score);
        });
    });
}

/// Benchmark: one EMA profile update (target: < 5μs).
fn bench_profile_update(c: &mut Criterion) {
    let player = PlayerId::new();
    let raw = make_match(player, 42);
    let metrics =
        riftcoach_core::extract::participant_metrics(&raw, player).expect("player present");
    let derived = SubScores::from_metrics(&metrics);

    c.bench_function("profile_update_single", |b| {
        let mut profile = SkillProfile::new(Utc::now());
        b.iter(|| {
            profile.apply_match(black_box(&derived), 0.7, 2.0, Utc::now());
        });
    });
}

/// Benchmark: the full analyze pipeline against an in-memory store.
fn bench_analyze_match(c: &mut Criterion) {
    let store = PlayerStore::open_in_memory().expect("store");
    let engine = CoachEngine::with_voice(store, EngineConfig::default(), Box::new(FixedVoice));
    let player = PlayerId::new();

    let mut i = 0u32;
    c.bench_function("analyze_match_in_memory", |b| {
        b.iter(|| {
            // Fresh match id each round so the duplicate registry never
            // short-circuits the commit path.
            i += 1;
            let raw = make_match(player, i);
            let result = engine.analyze_match(player, &raw).expect("analysis");
            black_box(result);
        });
    });
}

criterion_group!(
    benches,
    bench_performance_score,
    bench_profile_update,
    bench_analyze_match
);
criterion_main!(benches);
