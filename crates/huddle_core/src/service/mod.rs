//! Session use-cases.
//!
//! # Responsibility
//! - Orchestrate roster, order, notes and export over the storage port.
//! - Keep rendering and shuffling free of storage concerns.

pub mod export;
pub mod notes;
pub mod order;
pub mod roster_session;
