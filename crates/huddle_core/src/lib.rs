//! Core logic for the huddle notes tool.
//! This crate owns the roster, order, notes and export invariants; hosts
//! only forward user actions and render notices.

pub mod clock;
pub mod config;
pub mod db;
pub mod debounce;
pub mod logging;
pub mod model;
pub mod notice;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_config, parse_config, ConfigError, SessionConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::member::{Member, MemberId, MemberIdGenerator, MemberValidationError};
pub use model::settings::Settings;
pub use notice::{Notice, Severity};
pub use service::export::{
    DirectorySink, ExportDocument, ExportEntry, ExportError, ExportFormat, ExportSink, MemorySink,
};
pub use service::roster_session::{RosterSession, SessionError};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
