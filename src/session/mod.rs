//! Session state: records, the store that owns them, and durable storage.

pub mod record;
pub mod storage;
pub mod store;

pub use record::{SessionRecord, SessionStatus};
pub use storage::{SessionBackend, SqliteSessionStorage};
pub use store::SessionStore;
