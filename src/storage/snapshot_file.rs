//! JSON document storage for the record book
//!
//! The whole book lives in one pretty-printed JSON document, by default
//! `.staffbook/records.json`. Every write replaces the full document
//! atomically (temp file + rename) under an exclusive `fs2` lock.

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::{CorruptFallback, ProjectConfig};
use crate::model::{sample_snapshot, BookSnapshot, RecordBook};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Data file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Where the contents of a freshly loaded book came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSource {
    /// Read from the data file
    File,
    /// No data file yet; bundled sample records
    Sample,
    /// No data file yet and sample data disabled
    Empty,
    /// The data file was corrupt; replaced by the configured fallback
    CorruptFallback(CorruptFallback),
}

impl fmt::Display for BookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSource::File => write!(f, "data file"),
            BookSource::Sample => write!(f, "sample records"),
            BookSource::Empty => write!(f, "empty book"),
            BookSource::CorruptFallback(fallback) => {
                write!(f, "{} book (data file was corrupt)", fallback.as_str())
            }
        }
    }
}

/// Store for the record book document
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and validates the document
    ///
    /// Returns `Ok(None)` when the file does not exist. A document that does
    /// not parse, holds an invalid field value, or has two records with the
    /// same identity yields [`SnapshotError::Corrupt`].
    pub fn read(&self) -> Result<Option<BookSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open data file: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on data file")?;

        let snapshot: BookSnapshot =
            serde_json::from_reader(BufReader::new(&file)).map_err(|e| self.corrupt(e))?;

        // Identity collisions are a property of the document, not of one field
        RecordBook::from_snapshot(&snapshot).map_err(|e| self.corrupt(e))?;

        debug!(path = %self.path.display(), records = snapshot.record_count(), "read data file");
        Ok(Some(snapshot))
    }

    /// Writes the full document (atomic replace)
    pub fn write(&self, snapshot: &BookSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on data file")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, snapshot)
                .context("Failed to serialize record book")?;
            writeln!(writer).context("Failed to write data file")?;
            writer.flush().context("Failed to flush data file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        debug!(path = %self.path.display(), records = snapshot.record_count(), "wrote data file");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("records.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, reason: impl fmt::Display) -> SnapshotError {
        SnapshotError::Corrupt {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Loads the record book a session starts from
///
/// - data file present and valid: its contents
/// - data file missing: sample records, or nothing if `load_sample_data` is off
/// - data file corrupt: the configured fallback, with a warning
pub fn load_book(file: &SnapshotFile, config: &ProjectConfig) -> Result<(RecordBook, BookSource)> {
    let (snapshot, source) = match file.read() {
        Ok(Some(snapshot)) => (snapshot, BookSource::File),
        Ok(None) if config.load_sample_data => (bundled_sample()?, BookSource::Sample),
        Ok(None) => (BookSnapshot::default(), BookSource::Empty),
        Err(err) => match err.downcast_ref::<SnapshotError>() {
            Some(corrupt) => {
                warn!(error = %corrupt, fallback = config.corrupt_fallback.as_str(), "falling back");
                let snapshot = match config.corrupt_fallback {
                    CorruptFallback::Empty => BookSnapshot::default(),
                    CorruptFallback::Sample => bundled_sample()?,
                };
                (snapshot, BookSource::CorruptFallback(config.corrupt_fallback))
            }
            None => return Err(err),
        },
    };

    let book = RecordBook::from_snapshot(&snapshot).context("Failed to build record book")?;
    info!(%source, records = snapshot.record_count(), "record book loaded");
    Ok((book, source))
}

fn bundled_sample() -> Result<BookSnapshot> {
    sample_snapshot().context("Bundled sample records are invalid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> BookSnapshot {
        sample_snapshot().unwrap()
    }

    #[test]
    fn read_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("records.json"));

        assert!(file.read().unwrap().is_none());
    }

    #[test]
    fn write_and_read() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("records.json"));

        file.write(&sample()).unwrap();

        assert_eq!(file.read().unwrap(), Some(sample()));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested").join("records.json"));

        file.write(&BookSnapshot::default()).unwrap();

        assert!(file.exists());
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("records.json"));

        file.write(&sample()).unwrap();
        file.write(&BookSnapshot::default()).unwrap();

        assert!(!dir.path().join("records.json.tmp").exists());
        assert_eq!(file.read().unwrap(), Some(BookSnapshot::default()));
    }

    #[test]
    fn unparsable_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SnapshotFile::new(&path).read().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SnapshotError>(),
            Some(SnapshotError::Corrupt { .. })
        ));
    }

    #[test]
    fn invalid_field_value_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        let mut doc = serde_json::to_value(sample()).unwrap();
        doc["employees"][0]["email"] = serde_json::json!("not-an-email");
        fs::write(&path, doc.to_string()).unwrap();

        let err = SnapshotFile::new(&path).read().unwrap_err();
        assert!(err.downcast_ref::<SnapshotError>().is_some());
    }

    #[test]
    fn duplicate_identity_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        let mut snapshot = sample();
        let first = snapshot.employees[0].clone();
        snapshot.employees.push(first);
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let err = SnapshotFile::new(&path).read().unwrap_err();
        assert!(format!("{err}").contains("already exists"));
    }

    #[test]
    fn load_missing_uses_sample() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("records.json"));

        let (book, source) = load_book(&file, &ProjectConfig::default()).unwrap();

        assert_eq!(source, BookSource::Sample);
        assert_eq!(book.snapshot(), sample());
    }

    #[test]
    fn load_missing_without_sample_is_empty() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("records.json"));
        let config = ProjectConfig {
            load_sample_data: false,
            ..ProjectConfig::default()
        };

        let (book, source) = load_book(&file, &config).unwrap();

        assert_eq!(source, BookSource::Empty);
        assert!(book.snapshot().is_empty());
    }

    #[test]
    fn load_corrupt_falls_back_without_partial_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        let mut snapshot = sample();
        let first = snapshot.postings[0].clone();
        snapshot.postings.push(first);
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let (book, source) = load_book(&SnapshotFile::new(&path), &ProjectConfig::default()).unwrap();

        assert_eq!(source, BookSource::CorruptFallback(CorruptFallback::Empty));
        assert!(book.snapshot().is_empty());
    }

    #[test]
    fn load_corrupt_can_fall_back_to_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(&path, "42").unwrap();
        let config = ProjectConfig {
            corrupt_fallback: CorruptFallback::Sample,
            ..ProjectConfig::default()
        };

        let (book, source) = load_book(&SnapshotFile::new(&path), &config).unwrap();

        assert_eq!(source, BookSource::CorruptFallback(CorruptFallback::Sample));
        assert_eq!(book.snapshot(), sample());
    }
}
