//! SQLite storage for session records.
//!
//! One row per session id; the record body is serialized as JSON so the
//! round-trip contract is carried by serde rather than a column per field.

use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config;
use crate::session::record::SessionRecord;
use crate::session::storage::interface::SessionBackend;

/// SQLite-backed session storage.
pub struct SqliteSessionStorage {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl SqliteSessionStorage {
    /// Open (and initialize if needed) the storage at `db_path`, defaulting
    /// to the platform data directory.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self, anyhow::Error> {
        let db_path = db_path.unwrap_or_else(config::default_db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let storage = Self { db_path };
        storage.initialize_db()?;
        Ok(storage)
    }

    /// Create the sessions table if it does not exist.
    fn initialize_db(&self) -> Result<(), anyhow::Error> {
        match Connection::open(&self.db_path) {
            Ok(conn) => {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS sessions (
                        session_id TEXT PRIMARY KEY,
                        user_name TEXT,
                        record TEXT,
                        updated_at TEXT
                    )",
                    [],
                )?;
                Ok(())
            }
            Err(e) => {
                log::error!("SESSION ERROR: database initialization failed: {}", e);
                Err(e.into())
            }
        }
    }
}

impl SessionBackend for SqliteSessionStorage {
    fn save(&self, record: &SessionRecord) -> Result<(), anyhow::Error> {
        let body = serde_json::to_string(record)?;
        match Connection::open(&self.db_path) {
            Ok(conn) => {
                conn.execute(
                    "INSERT OR REPLACE INTO sessions (session_id, user_name, record, updated_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        record.session_id.to_string(),
                        record.user_name,
                        body,
                        Utc::now().to_rfc3339(),
                    ],
                )?;
                Ok(())
            }
            Err(e) => {
                log::error!("SESSION ERROR: saving session failed: {}", e);
                Err(e.into())
            }
        }
    }

    fn load(&self, session_id: &Uuid) -> Result<Option<SessionRecord>, anyhow::Error> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare("SELECT record FROM sessions WHERE session_id = ?1")?;
        let mut rows = stmt.query(params![session_id.to_string()])?;

        match rows.next()? {
            Some(row) => {
                let body: String = row.get(0)?;
                match serde_json::from_str::<SessionRecord>(&body) {
                    Ok(record) => Ok(Some(record)),
                    Err(e) => {
                        // Corrupt row: report a miss so the caller rebuilds.
                        log::warn!(
                            "SESSION ERROR: discarding unreadable record for {}: {}",
                            session_id,
                            e
                        );
                        Ok(None)
                    }
                }
            }
            None => Ok(None),
        }
    }
}
