//! Session export: text and CSV rendering plus delivery sinks.
//!
//! # Responsibility
//! - Render the randomized order and notes as a text or CSV document.
//! - Hand the finished document to a sink (file system, in-memory capture).
//!
//! # Invariants
//! - Entries appear in randomized order with 1-based numbering.
//! - CSV fields are always quoted; embedded `"` is doubled.
//! - Rendering is pure; only `ExportSink::deliver` has side effects.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const TEXT_TITLE: &str = "Morning Huddle Notes";
const TEXT_RULE_WIDTH: usize = 50;
const TEXT_EMPTY_NOTE: &str = "No notes";
const CSV_HEADER: &str = "Name,Notes";
const FILE_STEM: &str = "huddle-notes";

/// Supported export document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
        }
    }

    /// Upper-case label used in user notices.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "TXT",
            Self::Csv => "CSV",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported export format `{other}`; expected txt|csv")),
        }
    }
}

/// One resolved row of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportEntry<'a> {
    pub name: &'a str,
    pub note: Option<&'a str>,
}

/// A rendered export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub file_name: String,
    pub content: String,
}

impl ExportDocument {
    pub fn render(format: ExportFormat, date: NaiveDate, entries: &[ExportEntry<'_>]) -> Self {
        let content = match format {
            ExportFormat::Text => render_text(date, entries),
            ExportFormat::Csv => render_csv(entries),
        };
        Self {
            format,
            file_name: export_file_name(format, date),
            content,
        }
    }
}

/// Human-readable date used in the text title, e.g. `3/5/2024`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// File name `huddle-notes-<date>.<ext>` with a path-safe date.
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{FILE_STEM}-{}.{}",
        display_date(date).replace('/', "-"),
        format.extension()
    )
}

/// Renders the plain-text document.
pub fn render_text(date: NaiveDate, entries: &[ExportEntry<'_>]) -> String {
    let mut out = format!("{TEXT_TITLE} - {}\n", display_date(date));
    out.push_str(&"=".repeat(TEXT_RULE_WIDTH));
    out.push_str("\n\n");

    for (index, entry) in entries.iter().enumerate() {
        let note = entry
            .note
            .filter(|note| !note.is_empty())
            .unwrap_or(TEXT_EMPTY_NOTE);
        out.push_str(&format!("{}. {}\n", index + 1, entry.name));
        out.push_str(&format!("   Notes: {note}\n\n"));
    }
    out
}

/// Renders the CSV document.
pub fn render_csv(entries: &[ExportEntry<'_>]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&csv_field(entry.name));
        out.push(',');
        out.push_str(&csv_field(entry.note.unwrap_or("")));
        out.push('\n');
    }
    out
}

/// Quotes one CSV field, doubling embedded quotes.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Delivery failures.
#[derive(Debug)]
pub enum ExportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Rejected(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Rejected(reason) => write!(f, "export rejected: {reason}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Rejected(_) => None,
        }
    }
}

/// Destination for finished exports.
pub trait ExportSink {
    fn deliver(&mut self, document: &ExportDocument) -> Result<(), ExportError>;
}

/// Writes exports as files into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a document will be written to.
    pub fn path_for(&self, document: &ExportDocument) -> PathBuf {
        self.dir.join(&document.file_name)
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, document: &ExportDocument) -> Result<(), ExportError> {
        let path = self.path_for(document);
        std::fs::write(&path, document.content.as_bytes())
            .map_err(|source| ExportError::Io { path, source })
    }
}

/// Keeps delivered documents in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub delivered: Vec<ExportDocument>,
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, document: &ExportDocument) -> Result<(), ExportError> {
        self.delivered.push(document.clone());
        Ok(())
    }
}
