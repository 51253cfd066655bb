//! Team member domain model.
//!
//! # Responsibility
//! - Define the canonical member record and its JSON shape.
//! - Issue fresh member ids derived from wall-clock milliseconds.
//!
//! # Invariants
//! - `id` is unique within a roster and never reused while the session lives.
//! - `name` is non-blank; names entered through `Member::new` are trimmed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Member identifier: creation time in Unix epoch milliseconds.
pub type MemberId = i64;

/// One named entry of the roster.
///
/// Serialized as `{"id": <number>, "name": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

/// Validation failures for member records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// Name is empty after trimming.
    BlankName(MemberId),
    /// Two members share the same id.
    DuplicateId(MemberId),
}

impl Display for MemberValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName(id) => write!(f, "member {id} has a blank name"),
            Self::DuplicateId(id) => write!(f, "member id {id} appears more than once"),
        }
    }
}

impl Error for MemberValidationError {}

impl Member {
    /// Creates a member from raw user input.
    ///
    /// Returns `None` when `name` is blank after trimming.
    pub fn new(id: MemberId, name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            id,
            name: trimmed.to_string(),
        })
    }

    /// Validates a single record, typically one read back from storage.
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::BlankName(self.id));
        }
        Ok(())
    }
}

/// Validates a full roster: every record is valid and ids are unique.
pub fn validate_roster(members: &[Member]) -> Result<(), MemberValidationError> {
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        member.validate()?;
        if !seen.insert(member.id) {
            return Err(MemberValidationError::DuplicateId(member.id));
        }
    }
    Ok(())
}

/// Issues member ids from wall-clock milliseconds.
///
/// Ids are strictly increasing: when two adds land in the same millisecond
/// (or the clock steps backwards) the next id is bumped past the last one.
#[derive(Debug, Default, Clone)]
pub struct MemberIdGenerator {
    last_issued: Option<MemberId>,
}

impl MemberIdGenerator {
    /// Seeds the generator so it never issues an id already in `members`.
    pub fn seeded_from(members: &[Member]) -> Self {
        Self {
            last_issued: members.iter().map(|member| member.id).max(),
        }
    }

    /// Returns the next id for a member created at `now_ms`.
    pub fn next_id(&mut self, now_ms: i64) -> MemberId {
        let id = match self.last_issued {
            Some(last) if now_ms <= last => last.saturating_add(1),
            _ => now_ms,
        };
        self.last_issued = Some(id);
        id
    }
}
