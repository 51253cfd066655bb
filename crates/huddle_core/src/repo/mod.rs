//! Persistence codecs over the key-value port.
//!
//! # Responsibility
//! - Map domain state to its persisted JSON shape and back.
//! - Keep key names and encoding details out of the session controller.
//!
//! # Invariants
//! - Roster reads return semantic errors for corrupt data; callers decide
//!   how to recover.

pub mod notes_repo;
pub mod roster_repo;
pub mod settings_repo;
