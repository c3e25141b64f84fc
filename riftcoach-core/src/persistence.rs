//! SQLite persistence for per-player engine state.
//!
//! One row per player for the three mutable models (profile, flow state,
//! personality), serialized to JSON inside a BLOB column so the schema stays
//! stable as the structs evolve. Moments are append-only with a
//! `UNIQUE(player_id, match_id)` key; achievement unlocks and the
//! analyzed-match registry are primary-key guarded so retries are no-ops.
//!
//! [`PlayerStore::commit_analysis`] applies one match's full mutation set in
//! a single transaction: everything lands or nothing does.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use crate::config::PersistenceConfig;
use crate::error::{CoachError, Result};
use crate::flow::FlowState;
use crate::moment::MemoryMoment;
use crate::profile::SkillProfile;
use crate::relationship::PersonalityEvolution;
use crate::types::{MatchId, PlayerId};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS skill_profiles (
    player_id  TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS flow_states (
    player_id  TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS personalities (
    player_id  TEXT PRIMARY KEY,
    data       BLOB NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS memory_moments (
    moment_id  TEXT PRIMARY KEY,
    player_id  TEXT NOT NULL,
    match_id   TEXT NOT NULL,
    data       BLOB NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (player_id, match_id)
);
CREATE INDEX IF NOT EXISTS idx_moments_by_player
    ON memory_moments (player_id, created_at);
CREATE TABLE IF NOT EXISTS achievement_unlocks (
    player_id      TEXT NOT NULL,
    achievement_id TEXT NOT NULL,
    unlocked_at    TEXT NOT NULL,
    PRIMARY KEY (player_id, achievement_id)
);
CREATE TABLE IF NOT EXISTS analyzed_matches (
    player_id   TEXT NOT NULL,
    match_id    TEXT NOT NULL,
    analyzed_at TEXT NOT NULL,
    PRIMARY KEY (player_id, match_id)
);
";

/// Handle to the SQLite database holding all per-player engine state.
pub struct PlayerStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl std::fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CoachError::Serialization(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| CoachError::Serialization(e.to_string()))
}

impl PlayerStore {
    /// Open (or create) the database at `path`.
    ///
    /// The schema is created if missing; WAL mode is enabled when configured.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] on SQLite failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersistenceConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch(&format!("PRAGMA busy_timeout = {};", config.busy_timeout_ms))?;
        conn.execute_batch(SCHEMA)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "player store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Open an in-memory database (tests and benches).
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    // ------------------------------------------------------------------
    // Model reads
    // ------------------------------------------------------------------

    /// Load a player's skill profile, if one exists.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn load_profile(&self, player: PlayerId) -> Result<Option<SkillProfile>> {
        self.load_row("skill_profiles", player)
    }

    /// Load a player's flow state, if one exists.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn load_flow(&self, player: PlayerId) -> Result<Option<FlowState>> {
        self.load_row("flow_states", player)
    }

    /// Load a player's personality evolution, if one exists.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn load_personality(&self, player: PlayerId) -> Result<Option<PersonalityEvolution>> {
        self.load_row("personalities", player)
    }

    fn load_row<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        player: PlayerId,
    ) -> Result<Option<T>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT data FROM {table} WHERE player_id = ?1");
        let bytes: Option<Vec<u8>> = conn
            .query_row(&sql, params![player.0.to_string()], |row| row.get(0))
            .optional()?;
        bytes.map(|b| from_json(&b)).transpose()
    }

    // ------------------------------------------------------------------
    // Flow state writes
    // ------------------------------------------------------------------

    /// Save (upsert) a player's flow state.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn save_flow(&self, player: PlayerId, state: &FlowState, now: DateTime<Utc>) -> Result<()> {
        let json = to_json(state)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO flow_states (player_id, data, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(player_id) DO UPDATE SET
                 data = excluded.data,
                 updated_at = excluded.updated_at",
            params![player.0.to_string(), json, now.to_rfc3339()],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Moments
    // ------------------------------------------------------------------

    /// The most recent moments for a player, newest first.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn recent_moments(&self, player: PlayerId, limit: usize) -> Result<Vec<MemoryMoment>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT data FROM memory_moments
             WHERE player_id = ?1
             ORDER BY rowid DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![player.0.to_string(), limit as i64], |row| {
            row.get::<_, Vec<u8>>(0)
        })?;

        let mut moments = Vec::new();
        for row in rows {
            moments.push(from_json(&row?)?);
        }
        Ok(moments)
    }

    /// Total recorded moments for a player.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`].
    pub fn moment_count(&self, player: PlayerId) -> Result<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM memory_moments WHERE player_id = ?1",
            params![player.0.to_string()],
            |row| row.get(0),
        )?;
        Ok(count.unsigned_abs())
    }

    // ------------------------------------------------------------------
    // Achievement unlocks
    // ------------------------------------------------------------------

    /// Achievement ids already unlocked by a player.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`].
    pub fn unlocked_ids(&self, player: PlayerId) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT achievement_id FROM achievement_unlocks WHERE player_id = ?1",
        )?;
        let rows = stmt.query_map(params![player.0.to_string()], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<String>>>()
            .map_err(CoachError::from)
    }

    /// All unlocks for a player as (achievement id, unlock time) pairs.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn unlocks(&self, player: PlayerId) -> Result<Vec<(String, DateTime<Utc>)>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT achievement_id, unlocked_at FROM achievement_unlocks
             WHERE player_id = ?1
             ORDER BY unlocked_at",
        )?;
        let rows = stmt.query_map(params![player.0.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut unlocks = Vec::new();
        for row in rows {
            let (id, at) = row?;
            let at = DateTime::parse_from_rfc3339(&at)
                .map_err(|e| CoachError::Serialization(e.to_string()))?
                .with_timezone(&Utc);
            unlocks.push((id, at));
        }
        Ok(unlocks)
    }

    /// Insert an unlock record unless one already exists.
    ///
    /// Returns `true` when this call created the record; a duplicate attempt
    /// is a successful no-op returning `false`.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`].
    pub fn try_unlock(
        &self,
        player: PlayerId,
        achievement_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO achievement_unlocks (player_id, achievement_id, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![player.0.to_string(), achievement_id, now.to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    // ------------------------------------------------------------------
    // Transactional analysis commit
    // ------------------------------------------------------------------

    /// Apply one match's full mutation set atomically.
    ///
    /// Registers the match in `analyzed_matches` first; if it was already
    /// registered for this player, nothing is written and `false` is
    /// returned — a retried analysis is an idempotent no-op. Otherwise the
    /// profile upsert, the optional moment append, and the optional
    /// personality upsert all land in one transaction.
    ///
    /// # Errors
    /// Returns [`CoachError::Database`] or [`CoachError::Serialization`].
    pub fn commit_analysis(
        &self,
        player: PlayerId,
        match_id: &MatchId,
        profile: &SkillProfile,
        moment: Option<&MemoryMoment>,
        personality: Option<&PersonalityEvolution>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let profile_json = to_json(profile)?;
        let moment_json = moment.map(to_json).transpose()?;
        let personality_json = personality.map(to_json).transpose()?;

        let player_key = player.0.to_string();
        let now_str = now.to_rfc3339();

        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction()?;

        let registered = tx.execute(
            "INSERT OR IGNORE INTO analyzed_matches (player_id, match_id, analyzed_at)
             VALUES (?1, ?2, ?3)",
            params![player_key, match_id.0, now_str],
        )?;
        if registered == 0 {
            debug!(player = %player, match_id = %match_id, "duplicate match analysis ignored");
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO skill_profiles (player_id, data, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(player_id) DO UPDATE SET
                 data = excluded.data,
                 updated_at = excluded.updated_at",
            params![player_key, profile_json, now_str],
        )?;

        if let (Some(moment), Some(moment_json)) = (moment, moment_json.as_ref()) {
            tx.execute(
                "INSERT OR IGNORE INTO memory_moments (moment_id, player_id, match_id, data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    moment.id.0.to_string(),
                    player_key,
                    moment.match_id.0,
                    moment_json,
                    now_str
                ],
            )?;
        }

        if let Some(personality_json) = personality_json.as_ref() {
            tx.execute(
                "INSERT INTO personalities (player_id, data, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(player_id) DO UPDATE SET
                     data = excluded.data,
                     updated_at = excluded.updated_at",
                params![player_key, personality_json, now_str],
            )?;
        }

        tx.commit()?;
        debug!(player = %player, match_id = %match_id, "match analysis committed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ParticipantMetrics;
    use crate::profile::{SkillProfile, SubScores};
    use crate::types::{MemoryCategory, PlayerId};

    fn metrics(match_id: &str) -> ParticipantMetrics {
        ParticipantMetrics {
            match_id: MatchId(match_id.to_string()),
            champion: "Ahri".to_string(),
            role: "MID".to_string(),
            opponent_champion: None,
            win: true,
            kills: 8,
            deaths: 1,
            assists: 6,
            cs: 180,
            gold_earned: 12_000,
            damage_dealt: 20_000,
            damage_taken: 12_000,
            vision_score: 25,
            turret_kills: 2,
            inhibitor_kills: 0,
            baron_kills: 0,
            dragon_kills: 1,
            largest_killing_spree: 5,
            double_kills: 1,
            triple_kills: 0,
            quadra_kills: 0,
            penta_kills: 0,
            longest_time_alive_secs: 800,
            time_played_secs: 1800,
        }
    }

    fn profile_for(m: &ParticipantMetrics) -> SkillProfile {
        let mut profile = SkillProfile::new(Utc::now());
        profile.apply_match(&SubScores::from_metrics(m), 0.7, 2.0, Utc::now());
        profile
    }

    fn moment_for(m: &ParticipantMetrics) -> MemoryMoment {
        MemoryMoment::from_match(MemoryCategory::EpicPlay, m, 85.0, "gg".to_string(), Utc::now())
    }

    #[test]
    fn profile_round_trip() {
        let store = PlayerStore::open_in_memory().expect("open");
        let player = PlayerId::new();
        let m = metrics("NA1_1");
        let profile = profile_for(&m);

        assert!(store.load_profile(player).expect("load").is_none());

        let applied = store
            .commit_analysis(player, &m.match_id, &profile, None, None, Utc::now())
            .expect("commit");
        assert!(applied);

        let loaded = store.load_profile(player).expect("load").expect("exists");
        assert!((loaded.overall_rating - profile.overall_rating).abs() < 1e-9);
        assert_eq!(loaded.matches_analyzed, 1);
    }

    #[test]
    fn duplicate_match_commit_is_a_no_op() {
        let store = PlayerStore::open_in_memory().expect("open");
        let player = PlayerId::new();
        let m = metrics("NA1_1");
        let first_profile = profile_for(&m);

        assert!(store
            .commit_analysis(player, &m.match_id, &first_profile, Some(&moment_for(&m)), None, Utc::now())
            .expect("commit"));

        // Retry with a different profile value: nothing may change.
        let mut tampered = first_profile.clone();
        tampered.overall_rating = 1.0;
        let applied = store
            .commit_analysis(player, &m.match_id, &tampered, Some(&moment_for(&m)), None, Utc::now())
            .expect("commit");
        assert!(!applied);

        let loaded = store.load_profile(player).expect("load").expect("exists");
        assert!((loaded.overall_rating - first_profile.overall_rating).abs() < 1e-9);
        assert_eq!(store.moment_count(player).expect("count"), 1);
    }

    #[test]
    fn moments_come_back_newest_first() {
        let store = PlayerStore::open_in_memory().expect("open");
        let player = PlayerId::new();

        for i in 0..3 {
            let m = metrics(&format!("NA1_{i}"));
            store
                .commit_analysis(player, &m.match_id, &profile_for(&m), Some(&moment_for(&m)), None, Utc::now())
                .expect("commit");
        }

        let recent = store.recent_moments(player, 2).expect("recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].match_id.0, "NA1_2");
        assert_eq!(recent[1].match_id.0, "NA1_1");
    }

    #[test]
    fn unlock_is_idempotent() {
        let store = PlayerStore::open_in_memory().expect("open");
        let player = PlayerId::new();

        assert!(store.try_unlock(player, "first_victory", Utc::now()).expect("unlock"));
        assert!(!store.try_unlock(player, "first_victory", Utc::now()).expect("unlock"));

        let ids = store.unlocked_ids(player).expect("ids");
        assert_eq!(ids, vec!["first_victory".to_string()]);
    }

    #[test]
    fn players_are_isolated() {
        let store = PlayerStore::open_in_memory().expect("open");
        let a = PlayerId::new();
        let b = PlayerId::new();
        let m = metrics("NA1_1");

        store
            .commit_analysis(a, &m.match_id, &profile_for(&m), Some(&moment_for(&m)), None, Utc::now())
            .expect("commit");

        assert!(store.load_profile(b).expect("load").is_none());
        assert_eq!(store.moment_count(b).expect("count"), 0);
        // The same match id is fresh for a different player.
        assert!(store
            .commit_analysis(b, &m.match_id, &profile_for(&m), None, None, Utc::now())
            .expect("commit"));
    }
}
