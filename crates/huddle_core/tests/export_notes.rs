use chrono::NaiveDate;
use huddle_core::{
    ExportDocument, ExportError, ExportFormat, ExportSink, ManualClock, MemorySink, MemoryStore,
    RosterSession, SessionConfig, SessionError, Severity,
};

struct RejectingSink;

impl ExportSink for RejectingSink {
    fn deliver(&mut self, _document: &ExportDocument) -> Result<(), ExportError> {
        Err(ExportError::Rejected("download blocked".to_string()))
    }
}

fn session() -> RosterSession<MemoryStore, ManualClock> {
    let clock = ManualClock::new(
        1_700_000_000_000,
        NaiveDate::from_ymd_opt(2024, 11, 28).unwrap(),
    );
    RosterSession::open_with_clock(MemoryStore::new(), clock, SessionConfig::default())
}

fn rule() -> String {
    "=".repeat(50)
}

#[test]
fn csv_export_escapes_quotes_and_blanks_missing_notes() {
    let mut session = session();
    session.add_member("A \"Lee\"").unwrap();
    session.randomize().unwrap();
    let mut sink = MemorySink::default();

    let document = session.export(ExportFormat::Csv, &mut sink).unwrap();
    assert_eq!(document.content, "Name,Notes\n\"A \"\"Lee\"\"\",\"\"\n");
    assert_eq!(document.file_name, "huddle-notes-11-28-2024.csv");
    assert_eq!(sink.delivered, vec![document]);

    let notice = session.drain_notices().pop().unwrap();
    assert_eq!(notice.severity, Severity::Success);
    assert_eq!(notice.message, "Notes exported as CSV successfully!");
}

#[test]
fn text_export_without_randomization_has_header_only() {
    let mut session = session();
    session.add_member("Ada").unwrap();
    let mut sink = MemorySink::default();

    let document = session.export(ExportFormat::Text, &mut sink).unwrap();
    assert_eq!(
        document.content,
        format!("Morning Huddle Notes - 11/28/2024\n{}\n\n", rule())
    );
    assert_eq!(document.file_name, "huddle-notes-11-28-2024.txt");
}

#[test]
fn text_export_follows_randomized_order_with_latest_notes() {
    let mut session = session();
    let a = session.add_member("Ada").unwrap();
    let b = session.add_member("Bo").unwrap();
    session.randomize().unwrap();
    session.update_note(a, "reviewing PRs");

    let mut sink = MemorySink::default();
    let document = session.export(ExportFormat::Text, &mut sink).unwrap();

    let mut expected = format!("Morning Huddle Notes - 11/28/2024\n{}\n\n", rule());
    for (index, id) in session.randomized_order().iter().enumerate() {
        let (name, note) = if *id == a {
            ("Ada", "reviewing PRs")
        } else {
            assert_eq!(*id, b);
            ("Bo", "No notes")
        };
        expected.push_str(&format!("{}. {name}\n   Notes: {note}\n\n", index + 1));
    }
    assert_eq!(document.content, expected);
    assert!(session.has_pending_writes());
}

#[test]
fn export_on_empty_roster_warns() {
    let mut session = session();
    let mut sink = MemorySink::default();

    let err = session.export(ExportFormat::Csv, &mut sink).unwrap_err();
    assert!(matches!(err, SessionError::NoMembers));
    assert!(sink.delivered.is_empty());

    let notice = session.drain_notices().pop().unwrap();
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.message, "No team members to export!");
}

#[test]
fn delivery_failure_reports_error_and_keeps_state() {
    let mut session = session();
    let id = session.add_member("Ada").unwrap();
    session.randomize().unwrap();
    session.update_note(id, "pending");
    session.drain_notices();

    let err = session
        .export(ExportFormat::Text, &mut RejectingSink)
        .unwrap_err();
    assert!(matches!(err, SessionError::Export(ExportError::Rejected(_))));
    assert_eq!(session.randomized_order(), [id]);
    assert_eq!(session.note(id), Some("pending"));
    assert!(session.committed_notes().is_empty());

    let notice = session.drain_notices().pop().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("download blocked"));
}

#[test]
fn directory_sink_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();
    session.add_member("Ada").unwrap();
    session.randomize().unwrap();

    let mut sink = huddle_core::DirectorySink::new(dir.path());
    let document = session.export(ExportFormat::Csv, &mut sink).unwrap();

    let written = std::fs::read_to_string(dir.path().join(&document.file_name)).unwrap();
    assert_eq!(written, "Name,Notes\n\"Ada\",\"\"\n");
}

#[test]
fn directory_sink_reports_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session();
    session.add_member("Ada").unwrap();

    let mut sink = huddle_core::DirectorySink::new(dir.path().join("missing"));
    let err = session.export(ExportFormat::Text, &mut sink).unwrap_err();
    assert!(matches!(err, SessionError::Export(ExportError::Io { .. })));
}
