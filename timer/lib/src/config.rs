//! Session configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_FILE;

/// Default wait between idle checks of the command channel.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Settings for an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Where history records are appended.
    pub history_file: PathBuf,
    /// Longest the scheduler waits for a command while the queue is empty
    /// before checking the queue again.
    pub poll_interval: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TimerConfig {
    /// Sets the history file path.
    #[must_use]
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = path.into();
        self
    }

    /// Sets the idle poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
