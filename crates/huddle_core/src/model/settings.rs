//! Presentation settings persisted next to the roster.

/// Pure presentation state; each flag is stored under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Dense list layout.
    pub compact_mode: bool,
    /// Whether the team management section is expanded.
    pub team_section_expanded: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compact_mode: false,
            team_section_expanded: true,
        }
    }
}
