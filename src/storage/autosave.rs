//! Background persistence of the record book
//!
//! [`AutoSaver::attach`] subscribes to all four stores. Each notification
//! only sends the changed collection over an `mpsc` channel; a writer thread
//! owns the data file, folds the update into its own copy of the book and
//! rewrites the document. Updates that queue up while a write is in
//! progress are coalesced into one write.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, error};

use super::snapshot_file::SnapshotFile;
use crate::domain::{Employee, ExpenseClaim, Record, RecruitmentPosting, Schedule};
use crate::model::{BookSnapshot, ChangeEvent, EntityStore, RecordBook, SubscriptionId};

enum Message {
    Employees(Vec<Employee>),
    Schedules(Vec<Schedule>),
    Claims(Vec<ExpenseClaim>),
    Postings(Vec<RecruitmentPosting>),
    Shutdown,
}

impl Message {
    fn apply(self, book: &mut BookSnapshot) {
        match self {
            Message::Employees(records) => book.employees = records,
            Message::Schedules(records) => book.schedules = records,
            Message::Claims(records) => book.claims = records,
            Message::Postings(records) => book.postings = records,
            Message::Shutdown => {}
        }
    }
}

/// Summary returned once the writer thread has drained its queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Notifications received
    pub updates: usize,
    /// Documents written
    pub writes: usize,
}

struct Subscriptions {
    employees: SubscriptionId,
    schedules: SubscriptionId,
    claims: SubscriptionId,
    postings: SubscriptionId,
}

/// Handle to the background writer
pub struct AutoSaver {
    tx: mpsc::Sender<Message>,
    handle: JoinHandle<Result<SaveReport>>,
    subscriptions: Subscriptions,
}

impl AutoSaver {
    /// Starts the writer thread and subscribes it to every store in `book`
    pub fn attach(book: &mut RecordBook, file: SnapshotFile) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let initial = book.snapshot();

        let handle = thread::Builder::new()
            .name("staffbook-writer".to_string())
            .spawn(move || run_writer(file, initial, rx))
            .context("Failed to start background writer")?;

        let subscriptions = Subscriptions {
            employees: forward(book.employees_mut().store_mut(), &tx, Message::Employees),
            schedules: forward(book.schedules_mut().store_mut(), &tx, Message::Schedules),
            claims: forward(book.claims_mut().store_mut(), &tx, Message::Claims),
            postings: forward(book.postings_mut().store_mut(), &tx, Message::Postings),
        };

        Ok(Self {
            tx,
            handle,
            subscriptions,
        })
    }

    /// Unsubscribes from `book`, flushes pending updates and stops the writer
    ///
    /// Returns the first write error the writer ran into, if any.
    pub fn finish(self, book: &mut RecordBook) -> Result<SaveReport> {
        book.employees_mut().store_mut().unsubscribe(self.subscriptions.employees);
        book.schedules_mut().store_mut().unsubscribe(self.subscriptions.schedules);
        book.claims_mut().store_mut().unsubscribe(self.subscriptions.claims);
        book.postings_mut().store_mut().unsubscribe(self.subscriptions.postings);

        // The writer may already have stopped after a failure; join reports it
        let _ = self.tx.send(Message::Shutdown);

        self.handle
            .join()
            .map_err(|_| anyhow!("Background writer panicked"))?
    }
}

fn forward<T>(
    store: &mut EntityStore<T>,
    tx: &mpsc::Sender<Message>,
    wrap: fn(Vec<T>) -> Message,
) -> SubscriptionId
where
    T: Record + 'static,
{
    let tx = tx.clone();
    store.subscribe(move |event: &ChangeEvent<'_, T>| {
        if tx.send(wrap(event.contents.to_vec())).is_err() {
            debug!(kind = %event.kind, "writer stopped; dropping update");
        }
    })
}

fn run_writer(file: SnapshotFile, mut book: BookSnapshot, rx: mpsc::Receiver<Message>) -> Result<SaveReport> {
    let mut report = SaveReport::default();

    while let Ok(message) = rx.recv() {
        let mut shutdown = matches!(message, Message::Shutdown);
        let mut dirty = !shutdown;
        if dirty {
            report.updates += 1;
        }
        message.apply(&mut book);

        // Coalesce whatever queued up behind this message
        while let Ok(next) = rx.try_recv() {
            if matches!(next, Message::Shutdown) {
                shutdown = true;
                continue;
            }
            report.updates += 1;
            dirty = true;
            next.apply(&mut book);
        }

        if dirty {
            if let Err(err) = file.write(&book) {
                error!(path = %file.path().display(), error = %format!("{err:#}"), "failed to save record book");
                return Err(err);
            }
            report.writes += 1;
        }

        if shutdown {
            break;
        }
    }

    debug!(updates = report.updates, writes = report.writes, "writer finished");
    Ok(report)
}
