//! Repository name lookup
//!
//! Git writes a placeholder into `.git/description` when a repository is
//! created. Anything else in that file is treated as the repository's
//! human-readable name.

use std::fs;
use std::path::{Path, PathBuf};

/// Text git puts in `.git/description` by default
pub const UNNAMED_PLACEHOLDER: &str = "Unnamed repository";

/// Location of the description file for a working directory
pub fn description_path(cwd: &Path) -> PathBuf {
    cwd.join(".git").join("description")
}

/// Name from `.git/description`, or `None` when the file is missing,
/// unreadable, blank, or still holds git's placeholder
pub fn repository_name(cwd: &Path) -> Option<String> {
    let contents = fs::read_to_string(description_path(cwd)).ok()?;
    let line = contents.lines().next()?.trim();

    if line.is_empty() || line.contains(UNNAMED_PLACEHOLDER) {
        return None;
    }
    Some(line.to_string())
}
