//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, HistoryFile, SnapshotFile};

/// Name of the per-project data directory
pub const PROJECT_DIR: &str = ".staffbook";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a staffbook project. Run 'staffbook init' first.")]
    NotInProject,
}

/// A staffbook project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Existing files are left alone, so running this twice is harmless.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create {PROJECT_DIR} directory: {}", data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# staffbook configuration

# Record book document, relative to this directory
data_file = "records.json"

# Load the bundled sample records when the data file does not exist yet
load_sample_data = true

# What to load when the data file is corrupt: "empty" or "sample"
corrupt_fallback = "empty"

# Number of command lines kept in history.jsonl
history_limit = 100

# Log filter used when RUST_LOG is unset
# log_level = "info"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = data_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Command history is per user
history.jsonl

# Left behind by interrupted writes
*.tmp
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.staffbook` directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the record book document
    pub fn snapshot_file(&self) -> SnapshotFile {
        SnapshotFile::new(self.data_dir().join(&self.config.project.data_file))
    }

    /// Returns the command history file
    pub fn history_file(&self) -> HistoryFile {
        HistoryFile::new(
            self.data_dir().join("history.jsonl"),
            self.config.project.history_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.data_dir().is_dir());
        assert!(project.data_dir().join("config.toml").is_file());
        assert!(project.data_dir().join(".gitignore").is_file());
    }

    #[test]
    fn default_config_file_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().project.history_limit, 100);
        assert_eq!(project.config().project.data_file, PathBuf::from("records.json"));
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        Project::init(dir.path()).unwrap();

        assert!(dir.path().join(PROJECT_DIR).is_dir());
    }

    #[test]
    fn init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join(PROJECT_DIR);
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("config.toml"), "history_limit = 5\n").unwrap();

        let project = Project::init(dir.path()).unwrap();
        assert_eq!(project.config().project.history_limit, 5);
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn files_live_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.snapshot_file().path(), project.data_dir().join("records.json"));
        assert!(project.history_file().path().ends_with("history.jsonl"));
    }
}
