//! Exporters that write a [`CommitRecord`] into the notes vault
//!
//! Each exporter is independent: a failure in one is reported and the
//! remaining exporters still run.

pub mod csv;
pub mod daily;
pub mod journal;

use std::path::{Path, PathBuf};

use crate::record::CommitRecord;

pub use self::csv::CsvExporter;
pub use self::daily::{DailyNoteExporter, Launcher, SystemLauncher};
pub use self::journal::{JournalDocument, JournalExporter, JournalSection};

/// Which artifact an exporter writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ExportKind {
    Daily,
    Csv,
    Journal,
}

impl ExportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExportKind::Daily => "daily note",
            ExportKind::Csv => "csv log",
            ExportKind::Journal => "journal",
        }
    }
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error type for export operations. These are warnings, never fatal.
#[derive(Debug)]
pub enum ExportError {
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    Launch {
        uri: String,
        source: std::io::Error,
    },
    DailyNoteTimeout {
        path: PathBuf,
        attempts: u32,
    },
}

impl ExportError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io {
                action,
                path,
                source,
            } => write!(f, "Could not {} {}: {}", action, path.display(), source),
            ExportError::Launch { uri, source } => {
                write!(f, "Could not open {}: {}", uri, source)
            }
            ExportError::DailyNoteTimeout { path, attempts } => write!(
                f,
                "Daily note {} did not appear after {} checks",
                path.display(),
                attempts
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } | ExportError::Launch { source, .. } => Some(source),
            ExportError::DailyNoteTimeout { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Something that records a commit somewhere
pub trait Exporter {
    fn kind(&self) -> ExportKind;

    /// Target file, for status output
    fn target(&self) -> &Path;

    fn export(&self, record: &CommitRecord) -> Result<()>;
}

/// Outcome of a single exporter
#[derive(Debug)]
pub struct ExportOutcome {
    pub kind: ExportKind,
    pub target: PathBuf,
    pub result: Result<()>,
}

impl ExportOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every exporter in order, collecting each result
pub fn run_all(exporters: &[&dyn Exporter], record: &CommitRecord) -> Vec<ExportOutcome> {
    exporters
        .iter()
        .map(|exporter| ExportOutcome {
            kind: exporter.kind(),
            target: exporter.target().to_path_buf(),
            result: exporter.export(record),
        })
        .collect()
}
