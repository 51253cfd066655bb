//! Domain model for the huddle roster session.
//!
//! # Responsibility
//! - Define the member record persisted under the roster key.
//! - Define presentation settings persisted as independent flags.
//!
//! # Invariants
//! - Every member is identified by a unique, immutable `MemberId`.
//! - Member names are trimmed and never blank.

pub mod member;
pub mod settings;
