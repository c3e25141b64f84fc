//! Runtime counters for the engine.
//!
//! Lock-free `AtomicU64` counters incremented on the hot path and read on
//! snapshot for dashboards and tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for high-frequency engine events.
pub struct EngineCounters {
    /// Matches analyzed and committed.
    pub matches_analyzed: AtomicU64,
    /// Duplicate match submissions rejected idempotently.
    pub duplicate_matches: AtomicU64,
    /// Memory moments recorded.
    pub moments_recorded: AtomicU64,
    /// Inside jokes coined.
    pub jokes_created: AtomicU64,
    /// Achievements unlocked.
    pub achievements_unlocked: AtomicU64,
    /// Flow-state updates applied.
    pub flow_updates: AtomicU64,
}

impl EngineCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            matches_analyzed: AtomicU64::new(0),
            duplicate_matches: AtomicU64::new(0),
            moments_recorded: AtomicU64::new(0),
            jokes_created: AtomicU64::new(0),
            achievements_unlocked: AtomicU64::new(0),
            flow_updates: AtomicU64::new(0),
        }
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            matches_analyzed: self.matches_analyzed.load(Ordering::Relaxed),
            duplicate_matches: self.duplicate_matches.load(Ordering::Relaxed),
            moments_recorded: self.moments_recorded.load(Ordering::Relaxed),
            jokes_created: self.jokes_created.load(Ordering::Relaxed),
            achievements_unlocked: self.achievements_unlocked.load(Ordering::Relaxed),
            flow_updates: self.flow_updates.load(Ordering::Relaxed),
        }
    }
}

impl Default for EngineCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Matches analyzed and committed.
    pub matches_analyzed: u64,
    /// Duplicate match submissions rejected.
    pub duplicate_matches: u64,
    /// Memory moments recorded.
    pub moments_recorded: u64,
    /// Inside jokes coined.
    pub jokes_created: u64,
    /// Achievements unlocked.
    pub achievements_unlocked: u64,
    /// Flow-state updates applied.
    pub flow_updates: u64,
}
