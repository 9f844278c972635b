//! Commit record collection
//!
//! Gathers everything written about a commit: date, time, machine, project
//! and the first line of the commit message. The record is built once, after
//! the repository name has been resolved, and never changes afterwards.

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::repo;

lazy_static! {
    /// Final path segment, after the last `/` or `\`
    static ref LAST_SEGMENT_RE: Regex = Regex::new(r"[/\\]([^/\\]+)$").unwrap();
}

/// Column names, in the order they are written everywhere
pub const FIELD_NAMES: [&str; 5] = ["Date", "Time", "System", "Project", "Commit"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Per-commit metadata shared by all exporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitRecord {
    pub date: String,
    pub time: String,
    pub system: Option<String>,
    pub project: String,
    pub commit: String,
}

/// Inputs the collector reads from the outside world
#[derive(Debug, Clone)]
pub struct CollectContext<'a> {
    pub message_file: &'a Path,
    pub cwd: &'a Path,
    pub now: NaiveDateTime,
    pub host: Option<String>,
}

/// Error type for record collection. Any of these aborts the run.
#[derive(Debug)]
pub enum CollectError {
    MessageRead { path: PathBuf, source: std::io::Error },
    EmptyMessage { path: PathBuf },
    NoProjectSegment { cwd: PathBuf },
    CurrentDir(std::io::Error),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::MessageRead { path, source } => {
                write!(f, "Could not read commit message {}: {}", path.display(), source)
            }
            CollectError::EmptyMessage { path } => {
                write!(f, "Commit message file {} is empty", path.display())
            }
            CollectError::NoProjectSegment { cwd } => write!(
                f,
                "Could not derive a project name from {} (no path separator)",
                cwd.display()
            ),
            CollectError::CurrentDir(e) => write!(f, "Could not get current directory: {}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::MessageRead { source, .. } => Some(source),
            CollectError::CurrentDir(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectError>;

impl CommitRecord {
    /// Build the record for one commit.
    ///
    /// The project comes from `.git/description` when that names the
    /// repository, otherwise from the last segment of `cwd`. Either way the
    /// working directory must have a final segment.
    pub fn collect(ctx: &CollectContext<'_>) -> Result<Self> {
        let commit = read_commit_message(ctx.message_file)?;
        let dir_name = project_from_dir(ctx.cwd)?;
        let project = repo::repository_name(ctx.cwd).unwrap_or(dir_name);

        Ok(Self {
            date: ctx.now.format(DATE_FORMAT).to_string(),
            time: ctx.now.format(TIME_FORMAT).to_string(),
            system: ctx.host.clone(),
            project,
            commit,
        })
    }

    pub fn system_str(&self) -> &str {
        self.system.as_deref().unwrap_or("")
    }

    /// Field values paired with their names, in [`FIELD_NAMES`] order
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            (FIELD_NAMES[0], self.date.as_str()),
            (FIELD_NAMES[1], self.time.as_str()),
            (FIELD_NAMES[2], self.system_str()),
            (FIELD_NAMES[3], self.project.as_str()),
            (FIELD_NAMES[4], self.commit.as_str()),
        ]
    }

    /// `Time **System** - symbol _[[Project]]_ - Commit`
    pub fn entry_line(&self, symbol: &str) -> String {
        format!(
            "{} **{}** - {} _[[{}]]_ - {}",
            self.time,
            self.system_str(),
            symbol,
            self.project,
            self.commit
        )
    }
}

/// First line of the commit message file, trimmed. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn read_commit_message(path: &Path) -> Result<String> {
    let file = fs::File::open(path).map_err(|source| CollectError::MessageRead {
        path: path.to_path_buf(),
        source,
    })?;

    // Bytes, not `read_line`: git may hand us a message in a legacy encoding
    let mut first = Vec::new();
    let read = BufReader::new(file)
        .read_until(b'\n', &mut first)
        .map_err(|source| CollectError::MessageRead {
            path: path.to_path_buf(),
            source,
        })?;

    if read == 0 {
        return Err(CollectError::EmptyMessage {
            path: path.to_path_buf(),
        });
    }

    Ok(String::from_utf8_lossy(&first).trim().to_string())
}

/// Last segment of the working directory path
pub fn project_from_dir(cwd: &Path) -> Result<String> {
    let cwd_str = cwd.to_string_lossy();
    LAST_SEGMENT_RE
        .captures(&cwd_str)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| CollectError::NoProjectSegment {
            cwd: cwd.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ten_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn sample() -> CommitRecord {
        CommitRecord {
            date: "2024-01-01".to_string(),
            time: "10:00:00".to_string(),
            system: Some("HOST".to_string()),
            project: "widget".to_string(),
            commit: "fix bug".to_string(),
        }
    }

    #[test]
    fn test_commit_message_first_line_trimmed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_EDITMSG");
        fs::write(&path, "  fix bug  \n\nLonger body\n# comment\n").unwrap();

        assert_eq!(read_commit_message(&path).unwrap(), "fix bug");
    }

    #[test]
    fn test_commit_message_without_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("msg");
        fs::write(&path, "single line").unwrap();

        assert_eq!(read_commit_message(&path).unwrap(), "single line");
    }

    #[test]
    fn test_commit_message_in_legacy_encoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("msg");
        // "café fix" in latin1
        fs::write(&path, b"caf\xe9 fix\nbody\n").unwrap();

        let line = read_commit_message(&path).unwrap();
        assert!(line.starts_with("caf"));
        assert!(line.ends_with(" fix"));
        assert!(!line.contains("body"));
    }

    #[test]
    fn test_commit_message_empty_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("msg");
        fs::write(&path, "").unwrap();

        let err = read_commit_message(&path).unwrap_err();
        assert!(matches!(err, CollectError::EmptyMessage { .. }));
    }

    #[test]
    fn test_commit_message_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = read_commit_message(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CollectError::MessageRead { .. }));
    }

    #[test]
    fn test_project_from_dir() {
        assert_eq!(
            project_from_dir(Path::new("/home/alice/projects/widget")).unwrap(),
            "widget"
        );
        assert_eq!(
            project_from_dir(Path::new("C:\\Users\\alice\\widget")).unwrap(),
            "widget"
        );
    }

    #[test]
    fn test_project_from_dir_without_separator() {
        assert!(matches!(
            project_from_dir(Path::new("widget")),
            Err(CollectError::NoProjectSegment { .. })
        ));
        assert!(project_from_dir(Path::new("/")).is_err());
    }

    #[test]
    fn test_collect_uses_directory_name() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().join("widget");
        fs::create_dir(&cwd).unwrap();
        let msg = dir.path().join("msg");
        fs::write(&msg, "fix bug\n").unwrap();

        let record = CommitRecord::collect(&CollectContext {
            message_file: &msg,
            cwd: &cwd,
            now: ten_am(),
            host: Some("HOST".to_string()),
        })
        .unwrap();

        assert_eq!(record, sample());
    }

    #[test]
    fn test_collect_prefers_repository_description() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().join("widget");
        fs::create_dir_all(cwd.join(".git")).unwrap();
        fs::write(cwd.join(".git").join("description"), "Widget Factory\n").unwrap();
        let msg = dir.path().join("msg");
        fs::write(&msg, "fix bug\n").unwrap();

        let record = CommitRecord::collect(&CollectContext {
            message_file: &msg,
            cwd: &cwd,
            now: ten_am(),
            host: None,
        })
        .unwrap();

        assert_eq!(record.project, "Widget Factory");
        assert_eq!(record.system, None);
    }

    #[test]
    fn test_fields_order_matches_names() {
        let record = sample();
        let names: Vec<&str> = record.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, FIELD_NAMES);
        assert_eq!(record.fields()[4].1, "fix bug");
    }

    #[test]
    fn test_entry_line() {
        assert_eq!(
            sample().entry_line("☄️"),
            "10:00:00 **HOST** - ☄️ _[[widget]]_ - fix bug"
        );

        let mut no_host = sample();
        no_host.system = None;
        assert_eq!(
            no_host.entry_line("*"),
            "10:00:00 **** - * _[[widget]]_ - fix bug"
        );
    }

    #[test]
    fn test_record_json_key_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with(r#"{"Date":"2024-01-01","Time":"10:00:00","System":"HOST""#));
    }
}
