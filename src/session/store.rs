//! The session store: the only component with mutable shared state.
//!
//! Records are kept in a sharded map keyed by session id, so mutations to
//! the same session are mutually exclusive while different sessions never
//! contend on a global lock. The durable backend is only touched with a
//! cloned record, never while holding a map entry.

use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::analysis::FeatureBundle;
use crate::assessment::IntelligenceEstimate;
use crate::session::record::{SessionRecord, SessionStatus};
use crate::session::storage::SessionBackend;
use crate::utilities::SessionError;

/// Namespace for deterministic v5 session-id derivation from user names.
const SESSION_NAMESPACE: Uuid = Uuid::from_u128(0x0fd837a26f3c4e5a9b1d2c4e8a715390);

/// Per-session bookkeeping alongside the record itself.
struct SessionEntry {
    record: SessionRecord,
    /// Set when an intelligence update lands, cleared when the turn's
    /// interaction is counted. Guards against double-counting a retried
    /// turn.
    turn_pending: bool,
    /// Tags already appended during the in-flight turn, so a tag is
    /// appended at most once per turn (duplicates across turns stand).
    turn_tags: Vec<String>,
}

/// Owns and serializes all mutation of session records.
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    backend: Option<Mutex<Box<dyn SessionBackend>>>,
}

impl SessionStore {
    /// Create a store backed by durable storage.
    pub fn new(backend: Box<dyn SessionBackend>) -> Self {
        Self {
            sessions: DashMap::new(),
            backend: Some(Mutex::new(backend)),
        }
    }

    /// Create a purely in-memory store (nothing survives the process).
    pub fn in_memory() -> Self {
        Self {
            sessions: DashMap::new(),
            backend: None,
        }
    }

    /// Derive the session id for a user name.
    ///
    /// Deterministic v5 derivation over the casefolded name: the same name
    /// always maps to the same session. This is continuity, not identity
    /// proofing; there is no authentication by design.
    pub fn session_id_for(user_name: &str) -> Uuid {
        let normalized = user_name.trim().to_lowercase();
        Uuid::new_v5(&SESSION_NAMESPACE, normalized.as_bytes())
    }

    /// Create a session for a user, or resume one already known in memory
    /// or in durable storage.
    ///
    /// A persisted record that fails its invariant check is discarded and
    /// rebuilt fresh rather than trusted.
    pub fn create_or_resume(&self, user_name: &str) -> Uuid {
        let session_id = Self::session_id_for(user_name);

        if let Some(mut entry) = self.sessions.get_mut(&session_id) {
            if entry.record.status == SessionStatus::Ended {
                entry.record.status = SessionStatus::Active;
            }
            return session_id;
        }

        let record = self
            .load_persisted(&session_id)
            .map(|mut record| {
                log::info!("Resuming persisted session for '{}'", user_name);
                if record.status == SessionStatus::Ended {
                    record.status = SessionStatus::Active;
                }
                record
            })
            .unwrap_or_else(|| SessionRecord::new(session_id, user_name.trim()));

        self.sessions.insert(
            session_id,
            SessionEntry {
                record,
                turn_pending: false,
                turn_tags: Vec::new(),
            },
        );
        session_id
    }

    /// Fetch a persisted record, dropping anything inconsistent.
    fn load_persisted(&self, session_id: &Uuid) -> Option<SessionRecord> {
        let backend = self.backend.as_ref()?;
        match backend.lock().load(session_id) {
            Ok(Some(record)) if record.is_consistent() => Some(record),
            Ok(Some(_)) => {
                log::warn!("Discarding inconsistent persisted record for {}", session_id);
                None
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to load persisted session {}: {}", session_id, e);
                None
            }
        }
    }

    /// Read-only snapshot of a session record.
    pub fn load(&self, session_id: &Uuid) -> Result<SessionRecord, SessionError> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.record.clone())
            .ok_or_else(|| SessionError::not_found(session_id))
    }

    /// Merge one turn's analysis and estimate into the record.
    ///
    /// Recomputes the running score averages incrementally
    /// (`avg += (score - avg) / n`) and appends the bundle's newly seen
    /// topic tags. Marks the turn pending so the interaction counter knows
    /// a turn is in flight.
    pub fn apply_intelligence_update(
        &self,
        session_id: &Uuid,
        bundle: &FeatureBundle,
        estimate: IntelligenceEstimate,
    ) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::not_found(session_id))?;

        let n = estimate.sample_count.max(1) as f64;
        entry.record.avg_vocabulary += (bundle.vocabulary - entry.record.avg_vocabulary) / n;
        entry.record.avg_complexity += (bundle.complexity - entry.record.avg_complexity) / n;
        entry.record.estimate = estimate;
        entry.record.status = SessionStatus::Active;
        entry.record.last_active = chrono::Utc::now();

        entry.turn_tags.clear();
        for tag in &bundle.topic_tags {
            entry.record.topics.push(tag.clone());
            entry.turn_tags.push(tag.clone());
        }
        entry.turn_pending = true;
        Ok(())
    }

    /// Append the topic tags a reply actually used.
    ///
    /// Tags already appended earlier in the same turn are skipped; across
    /// turns duplicates accumulate by design (recurring interest).
    pub fn record_topics(&self, session_id: &Uuid, tags: &[String]) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::not_found(session_id))?;

        for tag in tags {
            if !entry.turn_tags.contains(tag) {
                entry.record.topics.push(tag.clone());
                entry.turn_tags.push(tag.clone());
            }
        }
        Ok(())
    }

    /// Count one completed turn.
    ///
    /// Increments at most once per applied update: retrying a turn after an
    /// internal error cannot double-count.
    pub fn increment_interaction(&self, session_id: &Uuid) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::not_found(session_id))?;

        if entry.turn_pending {
            entry.record.interaction_count += 1;
            entry.turn_pending = false;
            entry.turn_tags.clear();
        }
        Ok(())
    }

    /// Clear a session's learning state, preserving its id and name.
    pub fn reset(&self, session_id: &Uuid) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::not_found(session_id))?;
        entry.record.reset();
        entry.turn_pending = false;
        entry.turn_tags.clear();
        Ok(())
    }

    /// End a session and flush it to durable storage.
    ///
    /// The record is cloned under the per-session lock and written outside
    /// it, so a flush that blocks on I/O never stalls a resumed session.
    pub fn end_session(&self, session_id: &Uuid) -> Result<(), SessionError> {
        let snapshot = {
            let mut entry = self
                .sessions
                .get_mut(session_id)
                .ok_or_else(|| SessionError::not_found(session_id))?;
            entry.record.status = SessionStatus::Ended;
            entry.record.clone()
        };
        self.persist(&snapshot)
    }

    /// Persist a session's current state without ending it.
    pub fn flush(&self, session_id: &Uuid) -> Result<(), SessionError> {
        let snapshot = self.load(session_id)?;
        self.persist(&snapshot)
    }

    fn persist(&self, record: &SessionRecord) -> Result<(), SessionError> {
        if let Some(backend) = &self.backend {
            backend
                .lock()
                .save(record)
                .map_err(SessionError::storage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FeatureExtractor;
    use crate::session::storage::SqliteSessionStorage;

    fn estimate_with(sample_count: u32) -> IntelligenceEstimate {
        IntelligenceEstimate {
            level: 5.0,
            confidence: 0.5,
            trend: 0.0,
            sample_count,
        }
    }

    fn bundle_scoring(vocabulary: f64, complexity: f64) -> FeatureBundle {
        FeatureBundle {
            vocabulary,
            complexity,
            ..FeatureExtractor::default().analyze("sample text here")
        }
    }

    #[test]
    fn test_session_id_is_deterministic_per_name() {
        assert_eq!(
            SessionStore::session_id_for("Ada"),
            SessionStore::session_id_for("  ada  ")
        );
        assert_ne!(
            SessionStore::session_id_for("Ada"),
            SessionStore::session_id_for("Grace")
        );
    }

    #[test]
    fn test_load_unknown_session_is_not_found() {
        let store = SessionStore::in_memory();
        let result = store.load(&Uuid::new_v4());
        assert!(matches!(result, Err(SessionError::NotFound { .. })));
    }

    #[test]
    fn test_incremental_average_matches_arithmetic_mean() {
        let store = SessionStore::in_memory();
        let id = store.create_or_resume("Ada");
        let scores = [2.0, 4.0, 9.0, 1.0, 6.5];
        for (i, score) in scores.iter().enumerate() {
            store
                .apply_intelligence_update(
                    &id,
                    &bundle_scoring(*score, *score),
                    estimate_with(i as u32 + 1),
                )
                .unwrap();
            store.increment_interaction(&id).unwrap();
        }
        let record = store.load(&id).unwrap();
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        assert!((record.avg_vocabulary - mean).abs() < 1e-9);
        assert!((record.avg_complexity - mean).abs() < 1e-9);
    }

    #[test]
    fn test_retried_turn_does_not_double_count() {
        let store = SessionStore::in_memory();
        let id = store.create_or_resume("Ada");
        store
            .apply_intelligence_update(&id, &bundle_scoring(5.0, 5.0), estimate_with(1))
            .unwrap();
        store.increment_interaction(&id).unwrap();
        // Retry of the same turn after a front-end hiccup.
        store.increment_interaction(&id).unwrap();
        assert_eq!(store.load(&id).unwrap().interaction_count, 1);
    }

    #[test]
    fn test_reset_zeroes_state_but_keeps_identity() {
        let store = SessionStore::in_memory();
        let id = store.create_or_resume("Ada");
        store
            .apply_intelligence_update(&id, &bundle_scoring(5.0, 5.0), estimate_with(1))
            .unwrap();
        store.record_topics(&id, &["physics".to_string()]).unwrap();
        store.increment_interaction(&id).unwrap();

        store.reset(&id).unwrap();
        let record = store.load(&id).unwrap();
        assert_eq!(record.session_id, id);
        assert_eq!(record.user_name, "Ada");
        assert_eq!(record.interaction_count, 0);
        assert!(record.topics.is_empty());
        assert_eq!(record.estimate, IntelligenceEstimate::default());
    }

    #[test]
    fn test_topic_appends_dedup_within_turn_only() {
        let store = SessionStore::in_memory();
        let id = store.create_or_resume("Ada");

        let mut bundle = bundle_scoring(5.0, 5.0);
        bundle.topic_tags = vec!["physics".to_string()];
        store
            .apply_intelligence_update(&id, &bundle, estimate_with(1))
            .unwrap();
        // The reply used the same tag the analysis already appended.
        store.record_topics(&id, &["physics".to_string()]).unwrap();
        store.increment_interaction(&id).unwrap();
        assert_eq!(store.load(&id).unwrap().topics, vec!["physics".to_string()]);

        // Next turn revisits the topic: the duplicate stands.
        store
            .apply_intelligence_update(&id, &bundle, estimate_with(2))
            .unwrap();
        store.increment_interaction(&id).unwrap();
        assert_eq!(
            store.load(&id).unwrap().topics,
            vec!["physics".to_string(), "physics".to_string()]
        );
    }

    #[test]
    fn test_end_session_flushes_and_resumes_across_stores() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("sessions.db");

        let store = SessionStore::new(Box::new(
            SqliteSessionStorage::new(Some(db_path.clone())).unwrap(),
        ));
        let id = store.create_or_resume("Ada");
        store
            .apply_intelligence_update(&id, &bundle_scoring(6.0, 4.0), estimate_with(1))
            .unwrap();
        store.increment_interaction(&id).unwrap();
        store.end_session(&id).unwrap();

        // A fresh store over the same database resumes the record.
        let revived = SessionStore::new(Box::new(
            SqliteSessionStorage::new(Some(db_path)).unwrap(),
        ));
        let resumed_id = revived.create_or_resume("Ada");
        assert_eq!(resumed_id, id);
        let record = revived.load(&id).unwrap();
        assert_eq!(record.interaction_count, 1);
        assert_eq!(record.status, SessionStatus::Active);
    }

    #[test]
    fn test_resuming_in_memory_reactivates_ended_session() {
        let store = SessionStore::in_memory();
        let id = store.create_or_resume("Ada");
        store.end_session(&id).unwrap();
        assert_eq!(store.load(&id).unwrap().status, SessionStatus::Ended);

        store.create_or_resume("Ada");
        assert_eq!(store.load(&id).unwrap().status, SessionStatus::Active);
    }
}
