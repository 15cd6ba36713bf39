//! History storage for started tasks.
//!
//! The log is plain text, one record per line, with three `|`-separated
//! fields: task name, canonical duration, and the local time the task was
//! logged. Appends take an exclusive `fs2` lock and reads a shared one, so two
//! timers running in the same directory do not interleave partial lines.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::HistoryError;
use crate::types::HistoryRecord;

/// Default history file name, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "timer_history.log";

/// Trait for history storage backends.
pub trait HistoryStore: Send + Sync {
    /// Appends one record.
    ///
    /// ## Errors
    ///
    /// Returns an error if the record cannot be written.
    fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError>;

    /// Loads every well-formed record in file order.
    ///
    /// Returns `Ok(None)` when no history has been written yet. Malformed
    /// lines are skipped.
    ///
    /// ## Errors
    ///
    /// Returns an error if the history exists but cannot be read.
    fn load_all(&self) -> Result<Option<Vec<HistoryRecord>>, HistoryError>;
}

/// Pipe-delimited text file history storage.
///
/// ## Examples
///
/// ```no_run
/// use std::time::Duration;
/// use chrono::Local;
/// use timer_lib::{HistoryRecord, HistoryStore, PipeFileStore, Task};
///
/// let store = PipeFileStore::new("/tmp/timer_history.log".into());
/// let task = Task::new("Focus", Duration::from_secs(90));
/// store.append(&HistoryRecord::from_task(&task, Local::now())).unwrap();
///
/// let records = store.load_all().unwrap().unwrap_or_default();
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PipeFileStore {
    path: PathBuf,
}

impl PipeFileStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path to the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for PipeFileStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(HistoryError::Write)?;

        FileExt::lock_exclusive(&file).map_err(|_| HistoryError::Lock)?;
        let written = writeln!(file, "{}", record.to_line()).map_err(HistoryError::Write);
        FileExt::unlock(&file).map_err(|_| HistoryError::Lock)?;

        written
    }

    fn load_all(&self) -> Result<Option<Vec<HistoryRecord>>, HistoryError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(HistoryError::Read(err)),
        };

        FileExt::lock_shared(&file).map_err(|_| HistoryError::Lock)?;

        let mut records = Vec::new();
        let mut read_error = None;
        for line in BufReader::new(&file).lines() {
            match line {
                Ok(line) => records.extend(HistoryRecord::parse_line(&line)),
                Err(err) => {
                    read_error = Some(err);
                    break;
                }
            }
        }

        FileExt::unlock(&file).map_err(|_| HistoryError::Lock)?;

        match read_error {
            Some(err) => Err(HistoryError::Read(err)),
            None => Ok(Some(records)),
        }
    }
}

/// Writes the human-readable history listing.
///
/// `None` means no history exists yet and prints a single notice.
///
/// ## Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_report<W: Write>(out: &mut W, records: Option<&[HistoryRecord]>) -> io::Result<()> {
    let Some(records) = records else {
        return writeln!(out, "No history available");
    };

    writeln!(out, "\nTask History:")?;
    writeln!(out, "{}", "-".repeat(40))?;
    for record in records {
        writeln!(out, "{record}\n")?;
    }
    Ok(())
}

/// Writes the history as JSON lines, one object per record.
///
/// Nothing is written when no history exists.
///
/// ## Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_json_report<W: Write>(
    out: &mut W,
    records: Option<&[HistoryRecord]>,
) -> Result<(), HistoryError> {
    for record in records.unwrap_or_default() {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out).map_err(HistoryError::Write)?;
    }
    Ok(())
}
