//! One command's view of a project: the loaded book plus its autosaver

use anyhow::{Context, Result};

use super::output::Output;
use crate::model::RecordBook;
use crate::storage::{load_book, AutoSaver, BookSource, Project};

pub struct Session {
    project: Project,
    book: RecordBook,
    source: BookSource,
    saver: AutoSaver,
}

impl Session {
    /// Opens the current project, loads its book and starts saving changes
    pub fn open(output: &Output) -> Result<Self> {
        let project = Project::open_current()?;
        let file = project.snapshot_file();
        output.verbose_ctx("session", &format!("Loading {}", file.path().display()));

        let (mut book, source) = load_book(&file, &project.config().project)?;
        if let BookSource::CorruptFallback(_) = source {
            eprintln!("Warning: {} could not be read; loaded {}", file.path().display(), source);
        }
        output.verbose_ctx("session", &format!("Loaded {}", source));

        let saver = AutoSaver::attach(&mut book, file)?;

        Ok(Self {
            project,
            book,
            source,
            saver,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn book(&self) -> &RecordBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut RecordBook {
        &mut self.book
    }

    pub fn source(&self) -> BookSource {
        self.source
    }

    /// Opens a session, runs `command` against it and always finishes it
    ///
    /// Changes made before `command` fails are still saved.
    pub fn run<R>(output: &Output, command: impl FnOnce(&mut Session) -> Result<R>) -> Result<R> {
        let mut session = Self::open(output)?;
        let result = command(&mut session);
        session.finish(output)?;
        result
    }

    /// Waits for every pending change to reach the data file
    pub fn finish(mut self, output: &Output) -> Result<()> {
        let report = self
            .saver
            .finish(&mut self.book)
            .context("Failed to save record book")?;
        output.verbose_ctx(
            "session",
            &format!("{} change(s), {} write(s)", report.updates, report.writes),
        );
        Ok(())
    }
}
