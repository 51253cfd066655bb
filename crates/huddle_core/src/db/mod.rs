//! SQLite bootstrap for the durable profile store.
//!
//! Connections returned from here have every migration applied; failures are
//! reported as `StoreError` so the profile store has one error surface.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
