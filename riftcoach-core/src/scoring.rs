//! Match scoring — performance score and per-match flow score.
//!
//! Both scorers start from a base of 50 and add independently capped terms,
//! then clamp to [0, 100]. The per-term caps bound any single stat's
//! influence: no metric can saturate a score alone. Both functions are total
//! over sanitized [`ParticipantMetrics`] and cannot fail.
//!
//! The caps are the live coach's shipped tuning; they are deliberately kept
//! as named constants rather than re-derived.

use crate::extract::ParticipantMetrics;

/// Every score starts here before term contributions.
pub const BASE_SCORE: f64 = 50.0;

// Performance score term caps.
const KDA_CAP: f64 = 20.0;
const CS_EFFICIENCY_CAP: f64 = 15.0;
const DAMAGE_RATE_CAP: f64 = 15.0;
const VISION_CAP: f64 = 10.0;
const OBJECTIVE_CAP: f64 = 10.0;
const WIN_BONUS: f64 = 10.0;

// Flow score term caps.
const SPREE_CAP: f64 = 20.0;
const MULTI_KILL_CAP: f64 = 20.0;
const SURVIVAL_CAP: f64 = 10.0;
const OBJECTIVE_FOCUS_CAP: f64 = 15.0;

/// Overall performance score for one match, in [0, 100].
#[must_use]
pub fn performance_score(m: &ParticipantMetrics) -> f64 {
    let minutes = m.minutes_played();

    let kda = (f64::from(m.kills + m.assists) / m.deaths_divisor() * 5.0).min(KDA_CAP);
    let cs_efficiency = (m.cs_per_minute() / 5.0 * 10.0).min(CS_EFFICIENCY_CAP);
    let damage_rate = (f64::from(m.damage_dealt) / minutes / 100.0 * 10.0).min(DAMAGE_RATE_CAP);
    let vision = (f64::from(m.vision_score) / 5.0).min(VISION_CAP);
    let objectives = (f64::from((m.turret_kills + m.inhibitor_kills) * 2)).min(OBJECTIVE_CAP);
    let win_bonus = if m.win { WIN_BONUS } else { 0.0 };

    (BASE_SCORE + kda + cs_efficiency + damage_rate + vision + objectives + win_bonus)
        .clamp(0.0, 100.0)
}

/// Flow-state score for one match, in [0, 100].
///
/// Rewards sustained aggression (sprees, multi-kills), death discipline,
/// survival, and objective focus. This is a per-match signal; the
/// session-level [`crate::flow::FlowState`] is tracked separately.
#[must_use]
pub fn match_flow_score(m: &ParticipantMetrics) -> f64 {
    let spree = (f64::from(m.largest_killing_spree) * 2.0).min(SPREE_CAP);
    let multi_kills = (f64::from(m.double_kills) * 2.0
        + f64::from(m.triple_kills) * 5.0
        + f64::from(m.quadra_kills) * 10.0
        + f64::from(m.penta_kills) * 20.0)
        .min(MULTI_KILL_CAP);
    let death_discipline = match m.deaths {
        0 => 15.0,
        1 | 2 => 10.0,
        _ => 0.0,
    };
    let survival = (f64::from(m.longest_time_alive_secs) / 300.0 * 10.0).min(SURVIVAL_CAP);
    let objective_focus =
        (f64::from((m.turret_kills + m.inhibitor_kills + m.baron_kills) * 5)).min(OBJECTIVE_FOCUS_CAP);

    (BASE_SCORE + spree + multi_kills + death_discipline + survival + objective_focus)
        .clamp(0.0, 100.0)
}
