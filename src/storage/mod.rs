//! # Storage Layer
//!
//! Persistence for staffbook with plain, diffable file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Record book | Pretty-printed JSON document | `.staffbook/records.json` |
//! | Command history | JSONL (one JSON string per line) | `.staffbook/history.jsonl` |
//! | Config | TOML | `.staffbook/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Both files are read under a shared and written under an exclusive `fs2` lock
//! - Full rewrites are atomic (temp file + rename)
//! - [`AutoSaver`] moves document writes onto a background thread
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a staffbook project
//! - [`SnapshotFile`] - Read/write the record book document
//! - [`HistoryFile`] - Read/append submitted command lines
//! - [`Config`] - Project and global configuration

mod autosave;
mod config;
mod history_file;
mod project;
mod snapshot_file;

pub use autosave::{AutoSaver, SaveReport};
pub use config::{Config, ConfigError, CorruptFallback, GlobalConfig, OutputFormat, ProjectConfig};
pub use history_file::HistoryFile;
pub use project::{Project, ProjectError, PROJECT_DIR};
pub use snapshot_file::{load_book, BookSource, SnapshotError, SnapshotFile};
