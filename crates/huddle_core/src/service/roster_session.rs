//! Roster session controller.
//!
//! # Responsibility
//! - Own roster, randomized order, notes and settings for one session.
//! - Expose the only mutation entry points and keep cross-entity links intact.
//! - Schedule persistence and report outcomes as user notices.
//!
//! # Invariants
//! - Every id in the randomized order resolves to a roster member.
//! - Notes (committed or pending) exist only for roster members.
//! - After `flush`, persisted roster equals the in-memory roster.
//! - Persistence failures are logged and never roll back in-memory state.

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::debounce::Debouncer;
use crate::model::member::{Member, MemberId, MemberIdGenerator};
use crate::model::settings::Settings;
use crate::notice::{Notice, NoticeQueue, Severity};
use crate::repo::notes_repo::{erase_notes, load_notes, save_notes, NotesMap};
use crate::repo::roster_repo::{encode_roster, erase_roster, load_roster};
use crate::repo::settings_repo::{load_settings, save_flag};
use crate::service::export::{ExportDocument, ExportEntry, ExportError, ExportFormat, ExportSink};
use crate::service::notes::NotesStore;
use crate::service::order::shuffled_order;
use crate::store::{
    KeyValueStore, COMPACT_MODE_KEY, NOTES_KEY, ROSTER_KEY, TEAM_SECTION_EXPANDED_KEY,
};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_MEMBER_ADDED: &str = "Team member added and saved!";
const MSG_MEMBER_REMOVED: &str = "Team member removed from storage!";
const MSG_ROSTER_CLEARED: &str = "All team members cleared!";
const MSG_RANDOMIZE_EMPTY: &str = "Please add team members first!";
const MSG_RANDOMIZED: &str = "Team order randomized!";
const MSG_EXPORT_EMPTY: &str = "No team members to export!";

/// Operation failures reported back to the caller.
///
/// Each one has already been surfaced as a notice when it is returned.
#[derive(Debug)]
pub enum SessionError {
    /// Roster is empty.
    NoMembers,
    /// Export could not be delivered.
    Export(ExportError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMembers => write!(f, "no team members"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoMembers => None,
            Self::Export(err) => Some(err),
        }
    }
}

impl From<ExportError> for SessionError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// State and operations of one huddle session.
pub struct RosterSession<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    config: SessionConfig,
    roster: Vec<Member>,
    order: Vec<MemberId>,
    notes: NotesStore,
    settings: Settings,
    ids: MemberIdGenerator,
    roster_writes: Debouncer<&'static str, String>,
    notices: NoticeQueue,
    rng: StdRng,
}

impl<S: KeyValueStore> RosterSession<S, SystemClock> {
    /// Opens a session on the process clock.
    pub fn open(store: S, config: SessionConfig) -> Self {
        Self::open_with_clock(store, SystemClock::new(), config)
    }
}

impl<S: KeyValueStore, C: Clock> RosterSession<S, C> {
    /// Opens a session, loading roster, settings and (optionally) notes.
    ///
    /// Never fails: a corrupt roster starts the session empty and is
    /// reported on the diagnostic log only.
    pub fn open_with_clock(store: S, clock: C, config: SessionConfig) -> Self {
        let roster = match load_roster(&store) {
            Ok(members) => {
                info!(
                    "event=roster_load module=session status=ok members={}",
                    members.len()
                );
                members
            }
            Err(err) => {
                error!(
                    "event=roster_load module=session status=error key={} error={}",
                    ROSTER_KEY, err
                );
                Vec::new()
            }
        };

        let committed_notes = if config.persist_notes {
            load_persisted_notes(&store, &roster)
        } else {
            NotesMap::new()
        };

        let settings = load_settings(&store);
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            ids: MemberIdGenerator::seeded_from(&roster),
            notes: NotesStore::with_committed(committed_notes, config.note_debounce()),
            roster_writes: Debouncer::new(config.roster_debounce()),
            order: Vec::new(),
            notices: NoticeQueue::default(),
            store,
            clock,
            config,
            roster,
            settings,
            rng,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.roster
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.roster.iter().find(|member| member.id == id)
    }

    pub fn randomized_order(&self) -> &[MemberId] {
        &self.order
    }

    /// Randomized order resolved to members.
    pub fn ordered_members(&self) -> Vec<&Member> {
        self.order.iter().filter_map(|id| self.member(*id)).collect()
    }

    /// Latest note text for a member, including an uncommitted edit.
    pub fn note(&self, member_id: MemberId) -> Option<&str> {
        self.notes.note(member_id)
    }

    /// Notes whose debounce window has closed.
    pub fn committed_notes(&self) -> &NotesMap {
        self.notes.committed()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// True while a roster write or note commit is waiting on its timer.
    pub fn has_pending_writes(&self) -> bool {
        !self.roster_writes.is_empty() || self.notes.has_pending()
    }

    /// Removes and returns queued notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Adds a member named `name` (trimmed) at the end of the roster.
    ///
    /// Returns `None` without any side effect when `name` is blank.
    pub fn add_member(&mut self, name: &str) -> Option<MemberId> {
        if name.trim().is_empty() {
            return None;
        }
        let id = self.ids.next_id(self.clock.epoch_millis());
        let member = Member::new(id, name)?;
        self.roster.push(member);
        info!(
            "event=member_add module=session status=ok member_id={} members={}",
            id,
            self.roster.len()
        );
        self.schedule_roster_write();
        self.notices.push(Severity::Success, MSG_MEMBER_ADDED);
        Some(id)
    }

    /// Removes a member together with its order slot and note.
    ///
    /// Returns `false` and changes nothing when `id` is unknown.
    pub fn remove_member(&mut self, id: MemberId) -> bool {
        let Some(position) = self.roster.iter().position(|member| member.id == id) else {
            debug!("event=member_remove module=session status=skipped member_id={id}");
            return false;
        };

        self.roster.remove(position);
        self.order.retain(|member_id| *member_id != id);
        let note_removed = self.notes.remove(id);
        info!(
            "event=member_remove module=session status=ok member_id={} members={}",
            id,
            self.roster.len()
        );

        self.schedule_roster_write();
        if note_removed {
            self.persist_notes();
        }
        self.notices.push(Severity::Info, MSG_MEMBER_REMOVED);
        true
    }

    /// Empties roster, order and notes, and erases the persisted roster key.
    pub fn clear_members(&mut self) {
        let removed = self.roster.len();
        self.roster.clear();
        self.order.clear();
        self.notes.clear();
        self.roster_writes.cancel(&ROSTER_KEY);

        if let Err(err) = erase_roster(&mut self.store) {
            log_store_error("roster_erase", ROSTER_KEY, &err);
        }
        if self.config.persist_notes {
            if let Err(err) = erase_notes(&mut self.store) {
                log_store_error("notes_erase", NOTES_KEY, &err);
            }
        }

        info!("event=roster_clear module=session status=ok removed={removed}");
        self.notices.push(Severity::Warning, MSG_ROSTER_CLEARED);
    }

    /// Replaces the randomized order with a fresh uniform shuffle.
    ///
    /// # Errors
    /// - `SessionError::NoMembers` when the roster is empty; the previous
    ///   order is left untouched.
    pub fn randomize(&mut self) -> Result<(), SessionError> {
        if self.roster.is_empty() {
            self.notices.push(Severity::Warning, MSG_RANDOMIZE_EMPTY);
            return Err(SessionError::NoMembers);
        }

        self.order = shuffled_order(&self.roster, &mut self.rng);
        info!(
            "event=order_randomize module=session status=ok members={}",
            self.order.len()
        );
        self.notices.push(Severity::Success, MSG_RANDOMIZED);
        Ok(())
    }

    /// Sets the note for `member_id`, committing after the debounce window.
    ///
    /// Returns `false` when the member is not in the roster.
    pub fn update_note(&mut self, member_id: MemberId, text: impl Into<String>) -> bool {
        if self.member(member_id).is_none() {
            warn!("event=note_update module=session status=rejected member_id={member_id}");
            return false;
        }

        let now = self.clock.monotonic();
        if self.notes.update(member_id, text.into(), now) {
            self.persist_notes();
        }
        true
    }

    /// Renders the randomized order and notes and hands them to `sink`.
    ///
    /// Reads pending note edits without committing them, so a failed
    /// delivery leaves the session exactly as it was.
    ///
    /// # Errors
    /// - `SessionError::NoMembers` when the roster is empty.
    /// - `SessionError::Export` when the sink rejects the document.
    pub fn export(
        &mut self,
        format: ExportFormat,
        sink: &mut dyn ExportSink,
    ) -> Result<ExportDocument, SessionError> {
        if self.roster.is_empty() {
            self.notices.push(Severity::Warning, MSG_EXPORT_EMPTY);
            return Err(SessionError::NoMembers);
        }

        let document = {
            let entries: Vec<ExportEntry<'_>> = self
                .order
                .iter()
                .filter_map(|id| {
                    self.member(*id).map(|member| ExportEntry {
                        name: member.name.as_str(),
                        note: self.notes.note(*id),
                    })
                })
                .collect();
            ExportDocument::render(format, self.clock.today(), &entries)
        };

        match sink.deliver(&document) {
            Ok(()) => {
                info!(
                    "event=notes_export module=session status=ok format={} entries={}",
                    format.extension(),
                    self.order.len()
                );
                self.notices.push(
                    Severity::Success,
                    format!("Notes exported as {} successfully!", format.label()),
                );
                Ok(document)
            }
            Err(err) => {
                error!(
                    "event=notes_export module=session status=error format={} error={}",
                    format.extension(),
                    err
                );
                self.notices
                    .push(Severity::Error, format!("Failed to export notes: {err}"));
                Err(err.into())
            }
        }
    }

    pub fn set_compact_mode(&mut self, enabled: bool) {
        self.settings.compact_mode = enabled;
        self.write_flag(COMPACT_MODE_KEY, enabled);
    }

    pub fn set_team_section_expanded(&mut self, expanded: bool) {
        self.settings.team_section_expanded = expanded;
        self.write_flag(TEAM_SECTION_EXPANDED_KEY, expanded);
    }

    /// Fires debounced writes whose quiet period has ended.
    ///
    /// Hosts call this from their event loop.
    pub fn tick(&mut self) {
        let now = self.clock.monotonic();
        for (key, value) in self.roster_writes.take_due(now) {
            self.write_key(key, &value);
        }
        if self.notes.commit_due(now) > 0 {
            self.persist_notes();
        }
    }

    /// Fires every pending write immediately.
    pub fn flush(&mut self) {
        for (key, value) in self.roster_writes.drain() {
            self.write_key(key, &value);
        }
        if self.notes.commit_all() > 0 {
            self.persist_notes();
        }
    }

    fn schedule_roster_write(&mut self) {
        let encoded = match encode_roster(&self.roster) {
            Ok(encoded) => encoded,
            Err(err) => {
                log_store_error("roster_encode", ROSTER_KEY, &err);
                return;
            }
        };
        if self.roster_writes.is_immediate() {
            self.write_key(ROSTER_KEY, &encoded);
        } else {
            let now = self.clock.monotonic();
            self.roster_writes.schedule(ROSTER_KEY, encoded, now);
        }
    }

    fn write_key(&mut self, key: &str, value: &str) {
        match self.store.set(key, value) {
            Ok(()) => debug!(
                "event=store_write module=session status=ok key={} bytes={}",
                key,
                value.len()
            ),
            Err(err) => log_store_error("store_write", key, &err),
        }
    }

    fn write_flag(&mut self, key: &str, value: bool) {
        if let Err(err) = save_flag(&mut self.store, key, value) {
            log_store_error("settings_write", key, &err);
        }
    }

    fn persist_notes(&mut self) {
        if !self.config.persist_notes {
            return;
        }
        if let Err(err) = save_notes(&mut self.store, self.notes.committed()) {
            log_store_error("notes_write", NOTES_KEY, &err);
        }
    }
}

fn load_persisted_notes(store: &dyn KeyValueStore, roster: &[Member]) -> NotesMap {
    match load_notes(store) {
        Ok(mut notes) => {
            let before = notes.len();
            notes.retain(|id, _| roster.iter().any(|member| member.id == *id));
            if notes.len() != before {
                warn!(
                    "event=notes_load module=session status=pruned dropped={}",
                    before - notes.len()
                );
            }
            notes
        }
        Err(err) => {
            error!(
                "event=notes_load module=session status=error key={} error={}",
                NOTES_KEY,
                err
            );
            NotesMap::new()
        }
    }
}

fn log_store_error(event: &str, key: &str, err: &dyn Error) {
    error!("event={event} module=session status=error key={key} error={err}");
}
