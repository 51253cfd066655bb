//! Event loop driving one session from line-oriented input.
//!
//! # Responsibility
//! - Dispatch text commands to the session and render queued notices.
//! - Keep debounce timers firing while the user is idle.
//! - Flush pending writes when the loop ends.
//!
//! # Invariants
//! - `tick` runs after every command and after every idle poll timeout, so
//!   persisted state catches up with memory without further input.
//! - Input is read on its own thread; the session never leaves the loop thread.

use huddle_core::{
    Clock, DirectorySink, ExportFormat, KeyValueStore, MemberId, RosterSession,
};
use log::warn;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const HELP: &str = "\
commands:
  add <name>            add a team member
  remove <id>           remove a team member
  list                  show the roster
  clear                 remove every team member
  randomize             shuffle the presentation order
  order                 show the randomized order with notes
  note <id> <text>      set the note for a member
  export <txt|csv>      write the notes document to the output directory
  compact <on|off>      toggle compact mode
  expand <on|off>       toggle the team section
  settings              show settings
  help                  show this help
  quit                  save and exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A session plus the export destination the commands write to.
pub struct Host<S: KeyValueStore, C: Clock> {
    session: RosterSession<S, C>,
    sink: DirectorySink,
}

impl<S: KeyValueStore, C: Clock> Host<S, C> {
    pub fn new(session: RosterSession<S, C>, sink: DirectorySink) -> Self {
        Self { session, sink }
    }

    pub fn session(&self) -> &RosterSession<S, C> {
        &self.session
    }

    /// Runs one command, then fires due writes and prints notices.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let flow = self.dispatch(line.trim(), out)?;
        self.idle(out)?;
        Ok(flow)
    }

    /// Fires due writes and prints any notices they produced.
    pub fn idle(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.session.tick();
        for notice in self.session.drain_notices() {
            writeln!(out, "[{}] {}", notice.severity, notice.message)?;
        }
        Ok(())
    }

    /// Flushes every pending write and hands the session back.
    pub fn finish(mut self) -> RosterSession<S, C> {
        self.session.flush();
        self.session
    }

    fn dispatch(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let session = &mut self.session;

        match command {
            "" => {}
            "add" => {
                if let Some(id) = session.add_member(rest) {
                    writeln!(out, "added {id}")?;
                }
            }
            "remove" => match parse_id(rest) {
                Some(id) if session.remove_member(id) => {}
                Some(id) => writeln!(out, "no member with id {id}")?,
                None => writeln!(out, "usage: remove <id>")?,
            },
            "list" => {
                for member in session.members() {
                    writeln!(out, "{}  {}", member.id, member.name)?;
                }
                writeln!(out, "({} members)", session.members().len())?;
            }
            "clear" => session.clear_members(),
            "randomize" => {
                if session.randomize().is_ok() {
                    write_order(session, out)?;
                }
            }
            "order" => write_order(session, out)?,
            "note" => {
                let (id, text) = match rest.split_once(char::is_whitespace) {
                    Some((id, text)) => (parse_id(id), text.trim()),
                    None => (parse_id(rest), ""),
                };
                match id {
                    Some(id) if session.update_note(id, text) => {}
                    Some(id) => writeln!(out, "no member with id {id}")?,
                    None => writeln!(out, "usage: note <id> <text>")?,
                }
            }
            "export" => match rest.parse::<ExportFormat>() {
                Ok(format) => {
                    if let Ok(document) = session.export(format, &mut self.sink) {
                        writeln!(out, "wrote {}", self.sink.path_for(&document).display())?;
                    }
                }
                Err(message) => writeln!(out, "{message}")?,
            },
            "compact" => match parse_switch(rest) {
                Some(enabled) => session.set_compact_mode(enabled),
                None => writeln!(out, "usage: compact <on|off>")?,
            },
            "expand" => match parse_switch(rest) {
                Some(expanded) => session.set_team_section_expanded(expanded),
                None => writeln!(out, "usage: expand <on|off>")?,
            },
            "settings" => {
                let settings = session.settings();
                writeln!(
                    out,
                    "compact_mode={} team_section_expanded={}",
                    settings.compact_mode, settings.team_section_expanded
                )?;
            }
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(out, "unknown command `{other}`; try `help`")?,
        }
        Ok(Flow::Continue)
    }
}

/// Reads lines on a background thread.
///
/// The channel disconnects at end of input or after the first read error.
pub fn spawn_line_reader<R>(reader: R) -> Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Feeds lines to `host` until `quit` or end of input, ticking on every
/// `poll` timeout in between.
///
/// Does not flush; callers finish the host afterwards on every path.
pub fn run_loop<S: KeyValueStore, C: Clock>(
    host: &mut Host<S, C>,
    lines: &Receiver<io::Result<String>>,
    poll: Duration,
    out: &mut impl Write,
) -> io::Result<()> {
    loop {
        match lines.recv_timeout(poll) {
            Ok(Ok(line)) => {
                if host.handle_line(&line, out)? == Flow::Quit {
                    return Ok(());
                }
            }
            Ok(Err(err)) => {
                warn!("event=cli_read module=cli status=error error={err}");
                return Err(err);
            }
            Err(RecvTimeoutError::Timeout) => host.idle(out)?,
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

fn write_order<S: KeyValueStore, C: Clock>(
    session: &RosterSession<S, C>,
    out: &mut impl Write,
) -> io::Result<()> {
    for (index, member) in session.ordered_members().into_iter().enumerate() {
        let note = session.note(member.id).unwrap_or("");
        writeln!(out, "{}. {} [{}] {}", index + 1, member.name, member.id, note)?;
    }
    Ok(())
}

fn parse_id(value: &str) -> Option<MemberId> {
    value.trim().parse().ok()
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}
