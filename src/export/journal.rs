//! Rolling journal exporter
//!
//! A single markdown file of date sections, newest first:
//!
//! ```text
//!
//! # [[2024-01-02]]
//!
//! 2024-01-02 09:12:44 **HOST** - ☄️ _[[widget]]_ - second day
//!
//! # [[2024-01-01]]
//!
//! 2024-01-01 18:03:10 **HOST** - ☄️ _[[widget]]_ - later commit
//! 2024-01-01 10:00:00 **HOST** - ☄️ _[[widget]]_ - fix bug
//! ```
//!
//! Each commit moves today's section to the top and puts the new entry first
//! inside it. The file is parsed into sections and written back whole, so a
//! well-formed file comes out byte-for-byte as a plain "remove today's
//! heading, prepend heading + entry" edit would leave it.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use super::{ExportError, ExportKind, Exporter, Result};
use crate::record::CommitRecord;

lazy_static! {
    /// `# [[2024-01-01]]`, tolerating stray whitespace
    static ref HEADING_RE: Regex = Regex::new(r"^\s*#\s*\[\[\s*(.+?)\s*\]\]\s*$").unwrap();
}

/// One `# [[date]]` heading and the lines under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSection {
    pub date: String,
    /// Entry lines, each terminated by `\n`
    pub body: String,
}

/// Parsed journal file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDocument {
    /// Anything above the first heading
    pub preamble: String,
    pub sections: Vec<JournalSection>,
    /// The file used `\r\n`; render writes every line that way
    pub crlf: bool,
}

impl JournalDocument {
    pub fn parse(content: &str) -> Self {
        let mut doc = JournalDocument {
            crlf: content.contains("\r\n"),
            ..JournalDocument::default()
        };
        let mut after_heading = false;

        for line in content.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\n', '\r']);
            if let Some(caps) = HEADING_RE.captures(bare) {
                // The blank line before a heading belongs to the heading
                drop_trailing_blank_line(doc.current_body());
                doc.sections.push(JournalSection {
                    date: caps[1].to_string(),
                    body: String::new(),
                });
                after_heading = true;
                continue;
            }

            if after_heading {
                after_heading = false;
                if bare.trim().is_empty() {
                    continue;
                }
            }
            doc.current_body().push_str(line);
        }

        doc
    }

    fn current_body(&mut self) -> &mut String {
        match self.sections.last_mut() {
            Some(section) => &mut section.body,
            None => &mut self.preamble,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.preamble.clone();
        for section in &self.sections {
            ensure_newline(&mut out);
            out.push_str(&heading(&section.date));
            out.push_str(&section.body);
        }
        if self.crlf {
            out = out.replace("\r\n", "\n").replace('\n', "\r\n");
        }
        out
    }

    /// Put `entry` at the top of `date`'s section and move that section
    /// first. Any existing sections for `date` are folded into it.
    pub fn upsert(&mut self, date: &str, entry: &str) {
        let mut body = format!("{}\n", entry);
        let mut rest = Vec::with_capacity(self.sections.len() + 1);

        for section in self.sections.drain(..) {
            if section.date == date {
                body.push_str(&section.body);
                ensure_newline(&mut body);
            } else {
                rest.push(section);
            }
        }

        rest.insert(
            0,
            JournalSection {
                date: date.to_string(),
                body,
            },
        );
        self.sections = rest;
    }

    pub fn dates(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.date.as_str()).collect()
    }
}

/// `\n# [[date]]\n\n`
pub fn heading(date: &str) -> String {
    format!("\n# [[{}]]\n\n", date)
}

fn ensure_newline(buf: &mut String) {
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
}

fn drop_trailing_blank_line(buf: &mut String) {
    if !buf.ends_with('\n') {
        return;
    }
    let start = buf[..buf.len() - 1].rfind('\n').map_or(0, |i| i + 1);
    if buf[start..].trim().is_empty() {
        buf.truncate(start);
    }
}

pub struct JournalExporter {
    path: PathBuf,
    symbol: String,
}

impl JournalExporter {
    pub fn new(path: PathBuf, symbol: &str) -> Self {
        Self {
            path,
            symbol: symbol.to_string(),
        }
    }

    /// `Date Time **System** - symbol _[[Project]]_ - Commit`
    pub fn entry(&self, record: &CommitRecord) -> String {
        format!("{} {}", record.date, record.entry_line(&self.symbol))
    }
}

impl Exporter for JournalExporter {
    fn kind(&self) -> ExportKind {
        ExportKind::Journal
    }

    fn target(&self) -> &Path {
        &self.path
    }

    fn export(&self, record: &CommitRecord) -> Result<()> {
        // Create if missing; if that fails there is nothing to read either
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| ExportError::io("create journal", &self.path, e))?;

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ExportError::io("read journal", &self.path, e))?;

        let mut doc = JournalDocument::parse(&content);
        doc.upsert(&record.date, &self.entry(record));

        fs::write(&self.path, doc.render())
            .map_err(|e| ExportError::io("write journal", &self.path, e))
    }
}
