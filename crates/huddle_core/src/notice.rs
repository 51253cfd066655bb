//! User-facing notification queue.
//!
//! The session pushes notices; the presentation layer drains and renders them.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// One non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// FIFO of notices awaiting display.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    items: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.items.push_back(Notice::new(severity, message));
    }

    /// Removes and returns all queued notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.items.drain(..).collect()
    }
}
