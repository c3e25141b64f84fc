//! Error types for the riftcoach engine.

use thiserror::Error;

/// Top-level error type for all engine operations.
#[derive(Error, Debug)]
pub enum CoachError {
    /// The acting player has no participant record in the submitted match.
    /// Fatal for that call; no state is written.
    #[error("Player {player} not found in match {match_id}")]
    PlayerNotFoundInMatch {
        /// The player the analysis was requested for.
        player: crate::PlayerId,
        /// The match that was searched.
        match_id: crate::MatchId,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoachError>;
