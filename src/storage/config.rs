//! Configuration handling for staffbook
//!
//! Configuration is stored in `.staffbook/config.toml` (project) and
//! `~/.config/staffbook/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::project::PROJECT_DIR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// What to load when the data file exists but cannot be read as a record book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorruptFallback {
    /// Start with an empty record book
    #[default]
    Empty,
    /// Start with the bundled sample records
    Sample,
}

impl CorruptFallback {
    pub fn as_str(&self) -> &str {
        match self {
            CorruptFallback::Empty => "empty",
            CorruptFallback::Sample => "sample",
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Record book document, relative to `.staffbook/`
    pub data_file: PathBuf,

    /// Log filter used when `RUST_LOG` is unset (e.g. "info", "staffbook=debug")
    pub log_level: Option<String>,

    /// Load the sample records when no data file exists yet
    pub load_sample_data: bool,

    /// Contents used when the data file is corrupt
    pub corrupt_fallback: CorruptFallback,

    /// Maximum number of remembered command lines
    pub history_limit: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("records.json"),
            log_level: None,
            load_sample_data: true,
            corrupt_fallback: CorruptFallback::Empty,
            history_limit: 100,
        }
    }
}

impl ProjectConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_file must not be empty".to_string()));
        }
        if self.data_file.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "data_file must be relative to {PROJECT_DIR}/: {}",
                self.data_file.display()
            )));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Print a time-of-day greeting from `staffbook status`
    pub greeting: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            greeting: true,
        }
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "staffbook", "staffbook")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.staffbook/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Walks up from `start` to the first directory holding `.staffbook/`
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Returns true if we're in a staffbook project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert_eq!(config.project.data_file, PathBuf::from("records.json"));
        assert_eq!(config.project.corrupt_fallback, CorruptFallback::Empty);
        assert!(config.project.load_sample_data);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
data_file = "hr.json"
log_level = "debug"
corrupt_fallback = "sample"
history_limit = 20
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.data_file, PathBuf::from("hr.json"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.corrupt_fallback, CorruptFallback::Sample);
        assert_eq!(config.history_limit, 20);
        assert!(config.load_sample_data);
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"
greeting = false
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert!(!config.greeting);
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(PROJECT_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "history_limit = 0\n").unwrap();

        let err = Config::for_project(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("history_limit"));
    }

    #[test]
    fn unknown_fallback_fails_to_parse() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(PROJECT_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "corrupt_fallback = \"panic\"\n").unwrap();

        assert!(Config::for_project(dir.path()).is_err());
    }

    #[test]
    fn find_project_root_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(PROJECT_DIR)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root_from(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn config_not_in_project() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert!(!config.is_in_project());
    }
}
