//! Per-session state record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::IntelligenceEstimate;

/// Lifecycle of a session: `Created -> Active -> Ended`, with
/// `Active -> Active` on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Created,
    Active,
    Ended,
}

/// The unit of persistence: one user's learning state across turns.
///
/// Exclusively owned and mutated by the session store; every other
/// component sees read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Stable session id, derived deterministically from the user name.
    pub session_id: Uuid,
    /// User display name.
    pub user_name: String,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Completed turns. Monotonic; incremented exactly once per turn.
    pub interaction_count: u64,
    /// The running intelligence estimate.
    pub estimate: IntelligenceEstimate,
    /// Running average of per-turn vocabulary scores (incremental, no
    /// history replay).
    pub avg_vocabulary: f64,
    /// Running average of per-turn complexity scores.
    pub avg_complexity: f64,
    /// Topics discussed, append-only, most-recent-last. Duplicates are
    /// allowed: recurring entries reflect recurring interest.
    pub topics: Vec<String>,
    /// When the session was first created.
    pub created_at: DateTime<Utc>,
    /// When the session last processed a turn.
    pub last_active: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a fresh record for a user.
    pub fn new(session_id: Uuid, user_name: &str) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            user_name: user_name.to_string(),
            status: SessionStatus::Created,
            interaction_count: 0,
            estimate: IntelligenceEstimate::default(),
            avg_vocabulary: 0.0,
            avg_complexity: 0.0,
            topics: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Clear learning state while preserving identity.
    ///
    /// Keeps the id, name, and creation time; zeroes counters, averages,
    /// topics, and the estimate. The session stays (or becomes) Active.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Active;
        self.interaction_count = 0;
        self.estimate = IntelligenceEstimate::default();
        self.avg_vocabulary = 0.0;
        self.avg_complexity = 0.0;
        self.topics.clear();
        self.last_active = Utc::now();
    }

    /// Check the record's invariants.
    ///
    /// A persisted record that fails this check is treated as corrupt and
    /// rebuilt fresh rather than trusted.
    pub fn is_consistent(&self) -> bool {
        (0.0..=10.0).contains(&self.estimate.level)
            && (0.0..=1.0).contains(&self.estimate.confidence)
            && (0.0..=10.0).contains(&self.avg_vocabulary)
            && (0.0..=10.0).contains(&self.avg_complexity)
            && self.created_at <= self.last_active
    }
}
