//! commit-journal - a git `commit-msg` hook that journals every commit
//!
//! Each commit is written to three places in a notes vault:
//!
//! | Target | Path (under the vault) | How |
//! |--------|------------------------|-----|
//! | Daily note | `Periodic/Daily/<YYYY-MM-DD>.md` | appended line |
//! | CSV log | `Journal/CSV/Git.csv` | appended row, header on creation |
//! | Rolling journal | `Journal/☄️ Git.md` | rewritten, newest date first |
//!
//! The vault is `$Ndz/Chishiki` unless a config file says otherwise.
//!
//! # Quick Start
//!
//! ```
//! use commit_journal::JournalDocument;
//!
//! let mut doc = JournalDocument::parse("");
//! doc.upsert("2024-01-01", "2024-01-01 10:00:00 **HOST** - ☄️ _[[widget]]_ - fix bug");
//! doc.upsert("2024-01-01", "2024-01-01 11:30:00 **HOST** - ☄️ _[[widget]]_ - add tests");
//!
//! let rendered = doc.render();
//! assert!(rendered.starts_with("\n# [[2024-01-01]]\n\n2024-01-01 11:30:00"));
//! assert_eq!(rendered.matches("# [[2024-01-01]]").count(), 1);
//! ```

pub mod config;
pub mod export;
pub mod hook;
pub mod record;
pub mod repo;

pub use config::{Config, ConfigError, NotePaths};
pub use export::{
    run_all, CsvExporter, DailyNoteExporter, ExportError, ExportKind, ExportOutcome, Exporter,
    JournalDocument, JournalExporter, JournalSection, Launcher, SystemLauncher,
};
pub use hook::HookError;
pub use record::{CollectContext, CollectError, CommitRecord, FIELD_NAMES};
