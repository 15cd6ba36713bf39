//! Countdown timer library.
//!
//! This library holds everything behind the `timer` CLI: a FIFO of named
//! countdowns, the one-second tick loop that runs the active countdown, the
//! parser for interactive commands, and the history log.
//!
//! ## Core Types
//!
//! - [`Task`] - A named countdown waiting to run
//! - [`TaskQueue`] - Mutex-guarded FIFO shared by the command side and the scheduler
//! - [`HistoryRecord`] - One line of the history log
//!
//! ## Running Timers
//!
//! - [`TimerRunner`] - Runs one countdown, reporting [`TimerEvent`]s to a [`TickObserver`]
//! - [`TimerHandle`] - Completion signal for a spawned countdown
//! - [`Scheduler`] - The session loop tying input, queue and timer together
//!
//! ## Commands
//!
//! - [`dispatch`] - Parse one input line into an [`Action`]
//! - [`parse_duration_flags`] - Parse `-h N -m N -s N` into a duration
//! - [`format_duration`] - Render a duration as `1h2m3s`
//!
//! ## History Storage
//!
//! - [`HistoryStore`] - Trait for history storage backends
//! - [`PipeFileStore`] - `|`-delimited text file storage with file locking

mod command;
mod config;
mod console;
mod duration;
mod error;
mod history;
mod queue;
mod scheduler;
mod timer;
mod types;

pub use command::{Action, dispatch};
pub use config::{DEFAULT_POLL_INTERVAL, TimerConfig};
pub use console::Console;
pub use duration::{format_duration, parse_duration_flags, round_to_secs};
pub use error::{HistoryError, ParseError};
pub use history::{
    DEFAULT_HISTORY_FILE, HistoryStore, PipeFileStore, write_json_report, write_report,
};
pub use queue::TaskQueue;
pub use scheduler::{Scheduler, SessionEnd, spawn_input_reader};
pub use timer::{TICK, TickObserver, TimerEvent, TimerHandle, TimerRunner};
pub use types::{HistoryRecord, TIMESTAMP_FORMAT, Task};
