//! CSV log exporter
//!
//! One quoted row per commit, with a header row written by whoever creates
//! the file. Values are wrapped in double quotes as-is; a `"` inside the
//! commit message is not escaped and will produce a malformed row.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{ExportError, ExportKind, Exporter, Result};
use crate::record::{CommitRecord, FIELD_NAMES};

pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Open for append, reporting whether this call created the file
    fn open(&self) -> Result<(File, bool)> {
        match OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => Ok((file, true)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => OpenOptions::new()
                .append(true)
                .open(&self.path)
                .map(|file| (file, false))
                .map_err(|e| ExportError::io("open csv file", &self.path, e)),
            Err(e) => Err(ExportError::io("create csv file", &self.path, e)),
        }
    }
}

/// `Date,Time,System,Project,Commit`
pub fn header_line() -> String {
    FIELD_NAMES.join(",")
}

/// Every value wrapped in double quotes, in header order
pub fn row_line(record: &CommitRecord) -> String {
    let values: Vec<&str> = record.fields().iter().map(|(_, value)| *value).collect();
    format!("\"{}\"", values.join("\",\""))
}

impl Exporter for CsvExporter {
    fn kind(&self) -> ExportKind {
        ExportKind::Csv
    }

    fn target(&self) -> &Path {
        &self.path
    }

    fn export(&self, record: &CommitRecord) -> Result<()> {
        let (mut file, created) = self.open()?;

        let mut out = String::new();
        if created {
            out.push_str(&header_line());
            out.push('\n');
        }
        out.push_str(&row_line(record));
        out.push('\n');

        file.write_all(out.as_bytes())
            .map_err(|e| ExportError::io("write csv file", &self.path, e))
    }
}
