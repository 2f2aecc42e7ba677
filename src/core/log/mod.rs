use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use crate::core::error::Result;
use crate::core::event::{Event, EventOp};

/// Append-only record of queue operations, shared between workers
/// as `Arc<Journal<T>>`.
#[derive(Debug)]
pub struct Journal<T> {
    entries: Mutex<Vec<Event<T>>>,
}

impl<T> Journal<T> {
    pub fn new() -> Self {
        Self { entries: Mutex::new(Vec::new()) }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one event
    pub fn record(&self, event: Event<T>) {
        self.lock().push(event);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of recorded events of the given kind that were accepted
    pub fn count(&self, op: EventOp) -> usize {
        self.lock()
            .iter()
            .filter(|e| e.op == op && e.accepted)
            .count()
    }
}

impl<T: Clone> Journal<T> {
    /// Snapshot of every recorded event, oldest first
    pub fn entries(&self) -> Vec<Event<T>> {
        self.lock().clone()
    }

    /// Recorded events of one worker, oldest first
    pub fn entries_for(&self, worker: &str) -> Vec<Event<T>> {
        self.lock()
            .iter()
            .filter(|e| e.worker == worker)
            .cloned()
            .collect()
    }
}

impl<T: Serialize> Journal<T> {
    /// Append every entry to `path` as NDJSON, one object per line.
    ///
    /// The file is created if missing. Returns the number of lines written.
    pub fn append_ndjson<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        let entries = self.lock();
        for entry in entries.iter() {
            serde_json::to_writer(&mut writer, entry)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        tracing::debug!(path = %path.as_ref().display(), lines = entries.len(), "journal appended");
        Ok(entries.len())
    }
}

impl<T> Default for Journal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read back a journal written by [`Journal::append_ndjson`]. Blank lines are skipped.
pub fn read_ndjson<T, P>(path: P) -> Result<Vec<Event<T>>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}
