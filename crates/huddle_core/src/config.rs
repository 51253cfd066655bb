//! Session configuration.
//!
//! # Invariants
//! - Every field has a default, so a partial (or empty) JSON object is valid.
//! - A zero debounce window means write-through.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_ROSTER_DEBOUNCE_MS: u64 = 300;
const DEFAULT_NOTE_DEBOUNCE_MS: u64 = 500;

/// Tunables for one roster session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Quiet period before the roster is written to storage.
    pub roster_debounce_ms: u64,
    /// Quiet period before a note edit is committed.
    pub note_debounce_ms: u64,
    /// Persist notes under their own key instead of keeping them per session.
    pub persist_notes: bool,
    /// Fixed shuffle seed for reproducible orders.
    pub shuffle_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            roster_debounce_ms: DEFAULT_ROSTER_DEBOUNCE_MS,
            note_debounce_ms: DEFAULT_NOTE_DEBOUNCE_MS,
            persist_notes: false,
            shuffle_seed: None,
        }
    }
}

impl SessionConfig {
    /// Config with every write applied immediately.
    pub fn write_through() -> Self {
        Self {
            roster_debounce_ms: 0,
            note_debounce_ms: 0,
            ..Self::default()
        }
    }

    pub fn roster_debounce(&self) -> Duration {
        Duration::from_millis(self.roster_debounce_ms)
    }

    pub fn note_debounce(&self) -> Duration {
        Duration::from_millis(self.note_debounce_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Parses a config from JSON text.
pub fn parse_config(json: &str) -> Result<SessionConfig, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a JSON config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
