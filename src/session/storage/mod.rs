//! Durable storage backends for session records.

pub mod interface;
pub mod sqlite;

pub use interface::SessionBackend;
pub use sqlite::SqliteSessionStorage;
