//! Core data types for the timer.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::duration::format_duration;

/// Timestamp layout used in history records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field separator in the history file.
const FIELD_DELIMITER: char = '|';

/// A named countdown waiting in the queue.
///
/// Tasks are immutable once built and are consumed exactly once when the
/// scheduler pops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    duration: Duration,
}

impl Task {
    /// Creates a new task.
    ///
    /// ## Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use timer_lib::Task;
    ///
    /// let task = Task::new("Study Session", Duration::from_secs(25 * 60));
    /// assert_eq!(task.name(), "Study Session");
    /// ```
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    /// The display name of the task.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How long the countdown runs.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// One line of the history log.
///
/// Fields are kept as text: the log is read back for display only, and lines
/// written by other versions must still list cleanly.
///
/// A record is written when a task is popped from the queue, before its
/// countdown finishes, so the timestamp marks when the task was started and a
/// task cut short by `exit` is still listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The task name.
    pub name: String,
    /// The duration in canonical text form (`1m30s`).
    pub duration: String,
    /// When the record was logged, as `YYYY-MM-DD HH:MM:SS`.
    pub logged_at: String,
}

impl HistoryRecord {
    /// Builds the record for a task logged at `at`.
    pub fn from_task<Tz>(task: &Task, at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            name: task.name().to_string(),
            duration: format_duration(task.duration()),
            logged_at: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Parses one history line.
    ///
    /// Returns `None` unless the line splits into exactly three fields.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split(FIELD_DELIMITER);
        let name = fields.next()?;
        let duration = fields.next()?;
        let logged_at = fields.next()?;
        if fields.next().is_some() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            duration: duration.to_string(),
            logged_at: logged_at.to_string(),
        })
    }

    /// Renders the record as a history line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.name, self.duration, self.logged_at
        )
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task: {}", self.name)?;
        writeln!(f, "Duration: {}", self.duration)?;
        write!(f, "Completed: {}", self.logged_at)
    }
}
