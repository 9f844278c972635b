//! Configuration file support for commit-journal
//!
//! Reads from `.commit-journal.toml` (walking up from the working directory)
//! or `~/.config/commit-journal/config.toml`, then layers the environment on
//! top: `Ndz` names the base notes directory and the host variable (default
//! `COMPUTERNAME`) names the machine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the base notes directory
pub const BASE_DIR_VAR: &str = "Ndz";

/// File name searched for when walking up from the working directory
pub const LOCAL_CONFIG_NAME: &str = ".commit-journal.toml";

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Where the vault lives and how its files are laid out
    #[serde(default)]
    pub notes: NotesConfig,

    /// Daily note creation through the notes app
    #[serde(default)]
    pub daily: DailyConfig,

    /// Entry formatting
    #[serde(default)]
    pub entry: EntryConfig,
}

/// Vault layout, all paths relative to the vault root
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotesConfig {
    /// Base notes directory. Overrides `$Ndz` and the platform default.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Vault directory under the base directory
    /// Default: "Chishiki"
    #[serde(default = "default_vault_dir_name")]
    pub vault_dir_name: String,

    /// Directory holding `<YYYY-MM-DD>.md` daily notes
    #[serde(default = "default_daily_dir")]
    pub daily_dir: PathBuf,

    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,

    #[serde(default = "default_journal_file")]
    pub journal_file: PathBuf,
}

/// Daily note creation settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DailyConfig {
    /// URI opened to ask the notes app to create today's note
    #[serde(default = "default_create_uri")]
    pub create_uri: String,

    /// How many times to check for the note after opening the URI
    /// Default: 10
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Seconds between checks
    /// Default: 3
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Entry formatting settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EntryConfig {
    /// Marker placed before the project link
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Environment variable naming this machine
    #[serde(default = "default_host_var")]
    pub host_var: String,
}

fn default_vault_dir_name() -> String {
    "Chishiki".to_string()
}

fn default_daily_dir() -> PathBuf {
    Path::new("Periodic").join("Daily")
}

fn default_csv_file() -> PathBuf {
    Path::new("Journal").join("CSV").join("Git.csv")
}

fn default_journal_file() -> PathBuf {
    Path::new("Journal").join("☄️ Git.md")
}

fn default_create_uri() -> String {
    "obsidian://actions-uri/daily-note/create?vault=chishiki&silent=true".to_string()
}

fn default_poll_attempts() -> u32 {
    10
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_symbol() -> String {
    "☄️".to_string()
}

fn default_host_var() -> String {
    "COMPUTERNAME".to_string()
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            vault_dir_name: default_vault_dir_name(),
            daily_dir: default_daily_dir(),
            csv_file: default_csv_file(),
            journal_file: default_journal_file(),
        }
    }
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            create_uri: default_create_uri(),
            poll_attempts: default_poll_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            host_var: default_host_var(),
        }
    }
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Could not read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Invalid config {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The three files a commit is written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePaths {
    pub daily: PathBuf,
    pub csv: PathBuf,
    pub journal: PathBuf,
}

impl Config {
    /// Load config from the first file found by [`Config::find_config_path`].
    /// Returns default config if no file exists; a file that does not parse
    /// is an error so the caller can decide whether to mention it.
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Find `.commit-journal.toml` by walking up the directory tree, then
    /// fall back to the per-user config file
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(LOCAL_CONFIG_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }

        let home = std::env::var_os("HOME")?;
        let user_config = PathBuf::from(home)
            .join(".config")
            .join("commit-journal")
            .join("config.toml");
        user_config.is_file().then_some(user_config)
    }

    /// Base notes directory: config, then `$Ndz`, then the platform default
    pub fn base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.notes.base_dir {
            return dir.clone();
        }
        match std::env::var_os(BASE_DIR_VAR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_base_dir(),
        }
    }

    /// Root of the notes vault
    pub fn vault_dir(&self) -> PathBuf {
        self.base_dir().join(&self.notes.vault_dir_name)
    }

    /// Resolve the target files for a commit made on `date` (`YYYY-MM-DD`)
    pub fn note_paths(&self, date: &str) -> NotePaths {
        let vault = self.vault_dir();
        NotePaths {
            daily: vault.join(&self.notes.daily_dir).join(format!("{}.md", date)),
            csv: vault.join(&self.notes.csv_file),
            journal: vault.join(&self.notes.journal_file),
        }
    }

    /// Machine identifier from the configured host variable, used verbatim
    pub fn host(&self) -> Option<String> {
        std::env::var(&self.entry.host_var).ok()
    }
}

#[cfg(windows)]
fn default_base_dir() -> PathBuf {
    PathBuf::from("C:\\Ndz")
}

#[cfg(not(windows))]
fn default_base_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("Ndz"),
        None => PathBuf::from("/Ndz"),
    }
}
