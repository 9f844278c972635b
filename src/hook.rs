//! Git hook installation
//!
//! `commit-journal install` writes a `commit-msg` hook that hands the message
//! file to `commit-journal`. `uninstall` removes it again, but only if the
//! hook is one we wrote.

use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// First comment line of every hook we write
pub const HOOK_MARKER: &str = "# Installed by commit-journal";

pub const HOOK_NAME: &str = "commit-msg";

/// Error type for hook management
#[derive(Debug)]
pub enum HookError {
    NotARepository(PathBuf),
    AlreadyInstalled(PathBuf),
    NotInstalled(PathBuf),
    ForeignHook(PathBuf),
    Io { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for HookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookError::NotARepository(dir) => {
                write!(f, "{} is not a git repository", dir.display())
            }
            HookError::AlreadyInstalled(path) => write!(
                f,
                "{} already exists. Re-run with --force to replace it.",
                path.display()
            ),
            HookError::NotInstalled(path) => write!(f, "No hook at {}", path.display()),
            HookError::ForeignHook(path) => write!(
                f,
                "{} was not installed by commit-journal; leaving it alone",
                path.display()
            ),
            HookError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for HookError {}

pub type Result<T> = std::result::Result<T, HookError>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> HookError + '_ {
    move |source| HookError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Shell script for the hook
pub fn hook_script(program: &str) -> String {
    format!(
        "#!/bin/sh\n{}\n# Journals each commit message into the notes vault.\n\"{}\" \"$1\"\n",
        HOOK_MARKER, program
    )
}

/// Hooks directory for the repository at `repo_root`.
///
/// Asks git first so worktrees and `core.hooksPath` are honoured, then falls
/// back to `.git/hooks`.
pub fn hooks_dir(repo_root: &Path) -> Result<PathBuf> {
    let from_git = Command::new("git")
        .args(["rev-parse", "--git-path", "hooks"])
        .current_dir(repo_root)
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            } else {
                None
            }
        });

    if let Some(dir) = from_git {
        return Ok(repo_root.join(dir));
    }

    let git_dir = repo_root.join(".git");
    if git_dir.is_dir() {
        Ok(git_dir.join("hooks"))
    } else {
        Err(HookError::NotARepository(repo_root.to_path_buf()))
    }
}

/// Write the `commit-msg` hook. Returns the hook path.
pub fn install(repo_root: &Path, program: &str, force: bool) -> Result<PathBuf> {
    let dir = hooks_dir(repo_root)?;
    let hook_path = dir.join(HOOK_NAME);

    if hook_path.exists() && !force {
        return Err(HookError::AlreadyInstalled(hook_path));
    }

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        println!("   {} {}", "Creating".green(), dir.display());
    }

    let verb = if hook_path.exists() { "Replacing" } else { "Creating" };
    fs::write(&hook_path, hook_script(program)).map_err(io_err(&hook_path))?;
    make_executable(&hook_path)?;
    println!("   {} {}", verb.green(), hook_path.display());

    Ok(hook_path)
}

/// Remove the `commit-msg` hook if we installed it
pub fn uninstall(repo_root: &Path) -> Result<PathBuf> {
    let hook_path = hooks_dir(repo_root)?.join(HOOK_NAME);

    if !hook_path.exists() {
        return Err(HookError::NotInstalled(hook_path));
    }

    let existing = fs::read_to_string(&hook_path).map_err(io_err(&hook_path))?;
    if !existing.lines().any(|line| line.trim() == HOOK_MARKER) {
        return Err(HookError::ForeignHook(hook_path));
    }

    fs::remove_file(&hook_path).map_err(io_err(&hook_path))?;
    println!("   {} {}", "Removed".green(), hook_path.display());
    Ok(hook_path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).map_err(io_err(path))?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).map_err(io_err(path))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
