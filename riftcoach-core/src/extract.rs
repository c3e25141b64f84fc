//! Metric extraction — raw match payload → normalized [`ParticipantMetrics`].
//!
//! The raw payload arrives already fetched and schema-validated by the data
//! layer, but its numeric fields are still untrusted: missing stats
//! deserialize to zero and anything non-finite or negative is squashed to
//! zero here, so every downstream scorer operates on a sane domain and can
//! stay total.

use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};
use crate::types::{MatchId, PlayerId};

// ---------------------------------------------------------------------------
// Raw payload schema
// ---------------------------------------------------------------------------

/// A raw match record as delivered by the match-history data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMatch {
    /// Vendor-assigned match identifier.
    pub match_id: MatchId,
    /// Total game duration in seconds.
    #[serde(default)]
    pub game_duration_secs: f64,
    /// All ten participant records.
    pub participants: Vec<RawParticipant>,
}

/// One participant's stat line in the raw payload.
///
/// Numeric fields default to 0 when absent; sanitization happens during
/// extraction, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParticipant {
    /// The player this stat line belongs to.
    pub player_id: PlayerId,
    /// Champion the participant played.
    pub champion_name: String,
    /// Assigned role / lane (e.g. `"MID"`, `"JUNGLE"`).
    #[serde(default)]
    pub role: String,
    /// Team identifier (the two teams carry distinct values).
    #[serde(default)]
    pub team_id: u32,
    /// Whether this participant's team won.
    #[serde(default)]
    pub win: bool,
    /// Champion kills.
    #[serde(default)]
    pub kills: f64,
    /// Deaths.
    #[serde(default)]
    pub deaths: f64,
    /// Assists.
    #[serde(default)]
    pub assists: f64,
    /// Lane minions killed.
    #[serde(default)]
    pub total_minions_killed: f64,
    /// Jungle / neutral monsters killed.
    #[serde(default)]
    pub neutral_minions_killed: f64,
    /// Gold earned.
    #[serde(default)]
    pub gold_earned: f64,
    /// Total damage dealt to champions.
    #[serde(default)]
    pub total_damage_dealt: f64,
    /// Total damage taken.
    #[serde(default)]
    pub total_damage_taken: f64,
    /// Vision score.
    #[serde(default)]
    pub vision_score: f64,
    /// Turret takedowns.
    #[serde(default)]
    pub turret_kills: f64,
    /// Inhibitor takedowns.
    #[serde(default)]
    pub inhibitor_kills: f64,
    /// Baron takedowns.
    #[serde(default)]
    pub baron_kills: f64,
    /// Dragon takedowns.
    #[serde(default)]
    pub dragon_kills: f64,
    /// Largest killing spree.
    #[serde(default)]
    pub largest_killing_spree: f64,
    /// Double kills.
    #[serde(default)]
    pub double_kills: f64,
    /// Triple kills.
    #[serde(default)]
    pub triple_kills: f64,
    /// Quadra kills.
    #[serde(default)]
    pub quadra_kills: f64,
    /// Penta kills.
    #[serde(default)]
    pub penta_kills: f64,
    /// Longest continuous time spent alive, in seconds.
    #[serde(default)]
    pub longest_time_spent_living: f64,
    /// Seconds this participant actually played.
    #[serde(default)]
    pub time_played: f64,
}

// ---------------------------------------------------------------------------
// Normalized metrics
// ---------------------------------------------------------------------------

/// Normalized per-match metrics for the acting player.
///
/// Derived once per analyzed match and consumed by every scorer; all counts
/// are sanitized and all derived ratios guard their divisors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantMetrics {
    /// Which match these metrics came from.
    pub match_id: MatchId,
    /// Champion the player was on.
    pub champion: String,
    /// Assigned role / lane.
    pub role: String,
    /// Champion of the enemy laner in the same role, when resolvable.
    pub opponent_champion: Option<String>,
    /// Whether the player's team won.
    pub win: bool,
    /// Champion kills.
    pub kills: u32,
    /// Deaths.
    pub deaths: u32,
    /// Assists.
    pub assists: u32,
    /// Total CS (lane minions + neutral monsters).
    pub cs: u32,
    /// Gold earned.
    pub gold_earned: u32,
    /// Damage dealt to champions.
    pub damage_dealt: u32,
    /// Damage taken.
    pub damage_taken: u32,
    /// Vision score.
    pub vision_score: u32,
    /// Turret takedowns.
    pub turret_kills: u32,
    /// Inhibitor takedowns.
    pub inhibitor_kills: u32,
    /// Baron takedowns.
    pub baron_kills: u32,
    /// Dragon takedowns.
    pub dragon_kills: u32,
    /// Largest killing spree.
    pub largest_killing_spree: u32,
    /// Double kills.
    pub double_kills: u32,
    /// Triple kills.
    pub triple_kills: u32,
    /// Quadra kills.
    pub quadra_kills: u32,
    /// Penta kills.
    pub penta_kills: u32,
    /// Longest continuous time spent alive, in seconds.
    pub longest_time_alive_secs: u32,
    /// Seconds played.
    pub time_played_secs: u32,
}

impl ParticipantMetrics {
    /// Minutes played, floored at 1.0 so per-minute rates stay defined for
    /// truncated or malformed payloads.
    #[must_use]
    pub fn minutes_played(&self) -> f64 {
        (f64::from(self.time_played_secs) / 60.0).max(1.0)
    }

    /// Deaths as a divisor: floored at 1.
    #[must_use]
    pub fn deaths_divisor(&self) -> f64 {
        f64::from(self.deaths.max(1))
    }

    /// CS per minute.
    #[must_use]
    pub fn cs_per_minute(&self) -> f64 {
        f64::from(self.cs) / self.minutes_played()
    }

    /// "K/D/A" display string.
    #[must_use]
    pub fn kda_display(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Squash a raw stat to a non-negative whole count; anything non-finite or
/// negative counts as 0.
fn sanitize_count(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        // Stat lines are whole numbers; round rather than truncate so
        // upstream float encoding jitter (e.g. 140.0 arriving as 139.9999)
        // does not lose a count.
        let rounded = raw.round();
        if rounded >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            rounded as u32
        }
    } else {
        0
    }
}

/// Pull the acting player's participant record out of a raw match and
/// normalize it into [`ParticipantMetrics`].
///
/// # Errors
/// Returns [`CoachError::PlayerNotFoundInMatch`] when no participant carries
/// the given player ID.
pub fn participant_metrics(raw: &RawMatch, player: PlayerId) -> Result<ParticipantMetrics> {
    let me = raw
        .participants
        .iter()
        .find(|p| p.player_id == player)
        .ok_or_else(|| CoachError::PlayerNotFoundInMatch {
            player,
            match_id: raw.match_id.clone(),
        })?;

    let opponent_champion = lane_opponent(raw, me).map(|p| p.champion_name.clone());

    let time_played = if me.time_played.is_finite() && me.time_played > 0.0 {
        me.time_played
    } else {
        raw.game_duration_secs
    };

    Ok(ParticipantMetrics {
        match_id: raw.match_id.clone(),
        champion: me.champion_name.clone(),
        role: me.role.clone(),
        opponent_champion,
        win: me.win,
        kills: sanitize_count(me.kills),
        deaths: sanitize_count(me.deaths),
        assists: sanitize_count(me.assists),
        cs: sanitize_count(me.total_minions_killed) + sanitize_count(me.neutral_minions_killed),
        gold_earned: sanitize_count(me.gold_earned),
        damage_dealt: sanitize_count(me.total_damage_dealt),
        damage_taken: sanitize_count(me.total_damage_taken),
        vision_score: sanitize_count(me.vision_score),
        turret_kills: sanitize_count(me.turret_kills),
        inhibitor_kills: sanitize_count(me.inhibitor_kills),
        baron_kills: sanitize_count(me.baron_kills),
        dragon_kills: sanitize_count(me.dragon_kills),
        largest_killing_spree: sanitize_count(me.largest_killing_spree),
        double_kills: sanitize_count(me.double_kills),
        triple_kills: sanitize_count(me.triple_kills),
        quadra_kills: sanitize_count(me.quadra_kills),
        penta_kills: sanitize_count(me.penta_kills),
        longest_time_alive_secs: sanitize_count(me.longest_time_spent_living),
        time_played_secs: sanitize_count(time_played),
    })
}

/// Find the enemy-team participant sharing `me`'s role, if exactly
/// identifiable.
fn lane_opponent<'a>(raw: &'a RawMatch, me: &RawParticipant) -> Option<&'a RawParticipant> {
    if me.role.is_empty() {
        return None;
    }
    raw.participants
        .iter()
        .find(|p| p.team_id != me.team_id && p.role == me.role)
}
