//! JSONL storage for submitted command lines
//!
//! One JSON string per line in `.staffbook/history.jsonl`, oldest first.
//! Appends take an exclusive `fs2` lock and, once the file grows past the
//! limit, truncate it to the newest entries before releasing that lock.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tracing::warn;

use crate::model::InputHistory;

pub struct HistoryFile {
    path: PathBuf,
    limit: usize,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit: limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all entries, oldest first
    ///
    /// Lines that are not JSON strings are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open history: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on history")?;

        parse_entries(&file)
    }

    /// Loads the entries into a navigable history
    pub fn load(&self) -> Result<InputHistory> {
        Ok(InputHistory::from_entries(self.read_all()?, Some(self.limit)))
    }

    /// Appends one submitted line
    pub fn append(&self, entry: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history: {}", self.path.display()))?;

        // Held until `file` drops, so reading, appending and trimming are one step
        file.lock_exclusive()
            .context("Failed to acquire write lock on history")?;

        let mut entries = parse_entries(&file)?;
        entries.push(entry.to_string());

        if entries.len() > self.limit {
            file.set_len(0).context("Failed to truncate history")?;
            write_entries(&file, &entries[entries.len() - self.limit..])
        } else {
            write_entries(&file, &entries[entries.len() - 1..])
        }
    }

    /// Rewrites the file with exactly `entries` (atomic replace)
    pub fn write_all(&self, entries: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on history")?;

            write_entries(&file, entries)?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })
    }
}

/// Parses JSON string lines, skipping unreadable ones with a warning
fn parse_entries(source: impl Read) -> Result<Vec<String>> {
    let reader = BufReader::new(source);
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<String>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(line = line_num + 1, error = %e, "skipping unreadable history line"),
        }
    }

    Ok(entries)
}

fn write_entries(sink: impl Write, entries: &[String]) -> Result<()> {
    let mut writer = BufWriter::new(sink);
    for entry in entries {
        let line = serde_json::to_string(entry).context("Failed to serialize history entry")?;
        writeln!(writer, "{}", line).context("Failed to write history entry")?;
    }
    writer.flush().context("Failed to flush history")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_empty_history() {
        let dir = TempDir::new().unwrap();
        let file = HistoryFile::new(dir.path().join("history.jsonl"), 10);

        assert!(file.read_all().unwrap().is_empty());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn append_and_read() {
        let dir = TempDir::new().unwrap();
        let file = HistoryFile::new(dir.path().join("history.jsonl"), 10);

        file.append("employee list").unwrap();
        file.append("employee add --name \"Alex Yeoh\"").unwrap();

        assert_eq!(
            file.read_all().unwrap(),
            vec!["employee list", "employee add --name \"Alex Yeoh\""]
        );
    }

    #[test]
    fn append_trims_to_limit() {
        let dir = TempDir::new().unwrap();
        let file = HistoryFile::new(dir.path().join("history.jsonl"), 2);

        file.append("one").unwrap();
        file.append("two").unwrap();
        file.append("three").unwrap();

        assert_eq!(file.read_all().unwrap(), vec!["two", "three"]);
        assert!(!dir.path().join("history.jsonl.tmp").exists());
    }

    #[test]
    fn concurrent_appends_keep_the_newest_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.jsonl");
        let limit = 20;

        let writers: Vec<_> = (0..4)
            .map(|writer| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let file = HistoryFile::new(path, limit);
                    for n in 0..30 {
                        file.append(&format!("{writer} {n}")).unwrap();
                    }
                })
            })
            .collect();
        for handle in writers {
            handle.join().unwrap();
        }

        let entries = HistoryFile::new(&path, limit).read_all().unwrap();
        assert_eq!(entries.len(), limit);

        let newest = entries.last().unwrap();
        assert!(newest.ends_with(" 29"), "newest entry was {newest}");
        for writer in 0..4 {
            let prefix = format!("{writer} ");
            let seen: Vec<u32> = entries
                .iter()
                .filter_map(|e| e.strip_prefix(prefix.as_str()))
                .map(|n| n.parse().unwrap())
                .collect();
            assert!(seen.windows(2).all(|w| w[1] == w[0] + 1), "writer {writer}: {seen:?}");
        }
    }

    #[test]
    fn unreadable_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.jsonl");
        fs::write(&path, "\"list\"\n{broken\n\n\"clear\"\n").unwrap();

        let entries = HistoryFile::new(&path, 10).read_all().unwrap();
        assert_eq!(entries, vec!["list", "clear"]);
    }

    #[test]
    fn loaded_history_starts_at_present() {
        let dir = TempDir::new().unwrap();
        let file = HistoryFile::new(dir.path().join("history.jsonl"), 10);
        file.append("find Alex").unwrap();
        file.append("list").unwrap();

        let mut history = file.load().unwrap();

        assert!(history.is_at_present());
        assert_eq!(history.previous(), Some("list"));
    }
}
