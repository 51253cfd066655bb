//! Key-value storage port and backends.
//!
//! # Responsibility
//! - Define the narrow `get/set/remove` string store the session persists to.
//! - Name the fixed, versionless keys used for persisted state.
//!
//! # Invariants
//! - Values are JSON-encoded strings; the port itself never interprets them.
//! - A failed write leaves the previous value in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Ordered roster list: `[{"id": number, "name": string}, ...]`.
pub const ROSTER_KEY: &str = "huddleTeamMembers";
/// Compact layout flag: JSON boolean.
pub const COMPACT_MODE_KEY: &str = "huddleCompactMode";
/// Team section expanded flag: JSON boolean.
pub const TEAM_SECTION_EXPANDED_KEY: &str = "huddleTeamSectionExpanded";
/// Per-member notes, written only when note persistence is enabled.
pub const NOTES_KEY: &str = "huddleNotes";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage and codec failures surfaced by the persistence layer.
#[derive(Debug)]
pub enum StoreError {
    /// Write would exceed the backend's capacity.
    QuotaExceeded { key: String, bytes: usize },
    /// Backend refused or failed the operation.
    Unavailable(String),
    /// SQLite-backed store failure.
    Sqlite(rusqlite::Error),
    /// Profile database was written by a newer schema.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// Value could not be encoded or decoded as JSON.
    Codec(serde_json::Error),
    /// Value decoded but breaks a domain invariant.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { key, bytes } => {
                write!(f, "storage quota exceeded writing `{key}` ({bytes} bytes)")
            }
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "profile schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Codec(err) => write!(f, "invalid stored json: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::QuotaExceeded { .. }
            | Self::Unavailable(_)
            | Self::UnsupportedSchemaVersion { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// String key-value store the session persists through.
///
/// Modeled on browser local storage: one string value per string key.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Deletes `key`. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
