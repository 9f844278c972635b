//! Daily note exporter
//!
//! Appends the commit to today's note. The note belongs to the notes app, so
//! when it does not exist yet we ask the app to create it through a URI and
//! wait for the file to show up rather than creating it ourselves.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use super::{ExportError, ExportKind, Exporter, Result};
use crate::config::DailyConfig;
use crate::record::CommitRecord;

/// Opens a URI with whatever the desktop has registered for it
pub trait Launcher {
    fn launch(&self, uri: &str) -> std::io::Result<()>;
}

/// Uses the platform opener (`open`, `xdg-open`, `start`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, uri: &str) -> std::io::Result<()> {
        open::that(uri)
    }
}

pub struct DailyNoteExporter<L: Launcher = SystemLauncher> {
    path: PathBuf,
    symbol: String,
    create_uri: String,
    poll_attempts: u32,
    poll_interval: Duration,
    launcher: L,
}

impl DailyNoteExporter<SystemLauncher> {
    pub fn new(path: PathBuf, symbol: &str, daily: &DailyConfig) -> Self {
        Self::with_launcher(path, symbol, daily, SystemLauncher)
    }
}

impl<L: Launcher> DailyNoteExporter<L> {
    pub fn with_launcher(path: PathBuf, symbol: &str, daily: &DailyConfig, launcher: L) -> Self {
        Self {
            path,
            symbol: symbol.to_string(),
            create_uri: daily.create_uri.clone(),
            poll_attempts: daily.poll_attempts,
            poll_interval: Duration::from_secs(daily.poll_interval_secs),
            launcher,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Ask the notes app for today's note and wait until it exists.
    /// Returns the number of checks it took. An empty URI skips the request
    /// and only waits.
    ///
    /// Openers often exit non-zero after handing the URI over, so a launch
    /// error only counts if the note never shows up.
    fn request_creation(&self) -> Result<u32> {
        let launch_err = if self.create_uri.is_empty() {
            None
        } else {
            self.launcher.launch(&self.create_uri).err()
        };

        match wait_for_file(&self.path, self.poll_attempts, self.poll_interval) {
            Ok(checks) => Ok(checks),
            Err(timeout) => match launch_err {
                Some(source) => Err(ExportError::Launch {
                    uri: self.create_uri.clone(),
                    source,
                }),
                None => Err(timeout),
            },
        }
    }
}

/// Check for `path` up to `attempts` times, sleeping `interval` before each
/// check. Returns the number of checks made.
pub fn wait_for_file(path: &Path, attempts: u32, interval: Duration) -> Result<u32> {
    for attempt in 1..=attempts {
        thread::sleep(interval);
        if path.is_file() {
            return Ok(attempt);
        }
    }
    Err(ExportError::DailyNoteTimeout {
        path: path.to_path_buf(),
        attempts,
    })
}

impl<L: Launcher> Exporter for DailyNoteExporter<L> {
    fn kind(&self) -> ExportKind {
        ExportKind::Daily
    }

    fn target(&self) -> &Path {
        &self.path
    }

    fn export(&self, record: &CommitRecord) -> Result<()> {
        if !self.path.is_file() {
            self.request_creation()?;
        }

        // No `create`: if the note vanished since the check, that is a warning
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| ExportError::io("open daily note", &self.path, e))?;
        write!(file, "\n{}", record.entry_line(&self.symbol))
            .map_err(|e| ExportError::io("append to daily note", &self.path, e))
    }
}
