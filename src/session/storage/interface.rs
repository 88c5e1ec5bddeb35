//! Abstract storage interface for session persistence.

use uuid::Uuid;

use crate::session::record::SessionRecord;

/// Durable storage for session records.
///
/// The contract is lossless round-tripping: every field of a saved record
/// must come back intact from `load`. A backend that cannot parse a stored
/// row reports `Ok(None)` so the store rebuilds a fresh record instead of
/// propagating corruption.
pub trait SessionBackend: Send + Sync {
    /// Persist a record, replacing any previous row for the same id.
    fn save(&self, record: &SessionRecord) -> Result<(), anyhow::Error>;

    /// Load the record for a session id, if one was persisted.
    fn load(&self, session_id: &Uuid) -> Result<Option<SessionRecord>, anyhow::Error>;
}
