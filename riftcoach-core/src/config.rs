//! Configuration for the riftcoach engine.
//!
//! Maps directly to `riftcoach.toml`. The scoring weights and thresholds here
//! mirror the tuning the live coach shipped with; they are exposed as
//! configuration so deployments can retune without a rebuild, but the
//! defaults are the canonical values.

use serde::{Deserialize, Serialize};

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Skill-profile blending and trend settings.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Session flow-state settings.
    #[serde(default)]
    pub flow: FlowConfig,
    /// Relationship / personality settings.
    #[serde(default)]
    pub relationship: RelationshipConfig,
    /// Persistence / save settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`crate::CoachError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::CoachError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Skill-profile blending and trend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the freshly derived sub-scores in the EMA blend.
    /// The stored profile keeps `1 - new_match_weight`.
    #[serde(default = "default_new_match_weight")]
    pub new_match_weight: f64,
    /// Overall-rating delta (in points) that flips the trend to
    /// Improving / Declining.
    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            new_match_weight: 0.7,
            trend_threshold: 2.0,
        }
    }
}

/// Session flow-state configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Flow score at or above which the player counts as "in flow".
    #[serde(default = "default_in_flow_threshold")]
    pub in_flow_threshold: f64,
    /// Decision quality strictly above which the good-decision streak grows.
    #[serde(default = "default_good_decision_threshold")]
    pub good_decision_threshold: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            in_flow_threshold: 70.0,
            good_decision_threshold: 75.0,
        }
    }
}

/// Relationship / personality configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipConfig {
    /// Trust gained from an epic-play or clutch moment.
    #[serde(default = "default_trust_bonus")]
    pub trust_bonus: f64,
    /// How many of the most recent moments are inspected for inside-joke
    /// patterns (also the minimum moment count before jokes derive).
    #[serde(default = "default_joke_window")]
    pub joke_window: usize,
    /// Cap on retained shared-experience descriptions.
    #[serde(default = "default_max_shared_experiences")]
    pub max_shared_experiences: usize,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            trust_bonus: 5.0,
            joke_window: 5,
            max_shared_experiences: 50,
        }
    }
}

/// Persistence / save configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable SQLite WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout_ms: 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_new_match_weight() -> f64 {
    0.7
}

fn default_trend_threshold() -> f64 {
    2.0
}

fn default_in_flow_threshold() -> f64 {
    70.0
}

fn default_good_decision_threshold() -> f64 {
    75.0
}

fn default_trust_bonus() -> f64 {
    5.0
}

fn default_joke_window() -> usize {
    5
}

fn default_max_shared_experiences() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_shipped_tuning() {
        let config = EngineConfig::default();
        assert!((config.scoring.new_match_weight - 0.7).abs() < f64::EPSILON);
        assert!((config.scoring.trend_threshold - 2.0).abs() < f64::EPSILON);
        assert!((config.flow.in_flow_threshold - 70.0).abs() < f64::EPSILON);
        assert!((config.flow.good_decision_threshold - 75.0).abs() < f64::EPSILON);
        assert!((config.relationship.trust_bonus - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.relationship.joke_window, 5);
        assert!(config.persistence.wal_mode);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml("").expect("empty TOML should parse");
        assert!((config.scoring.new_match_weight - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.relationship.joke_window, 5);
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let toml = r#"
            [flow]
            in_flow_threshold = 80.0
        "#;
        let config = EngineConfig::from_toml(toml).expect("valid TOML");
        assert!((config.flow.in_flow_threshold - 80.0).abs() < f64::EPSILON);
        // Untouched sections keep their defaults.
        assert!((config.flow.good_decision_threshold - 75.0).abs() < f64::EPSILON);
        assert!((config.scoring.new_match_weight - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let result = EngineConfig::from_toml("scoring = 12");
        assert!(matches!(result, Err(crate::CoachError::Config(_))));
    }
}
