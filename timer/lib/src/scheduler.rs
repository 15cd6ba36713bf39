//! The interactive session loop.
//!
//! The [`Scheduler`] is the only component that decides what runs next. It
//! alternates between two modes:
//!
//! - **Idle** (queue empty): wait up to the poll interval for a command, then
//!   look at the queue again.
//! - **Active**: pop one task, start its timer, log it to history, and keep
//!   serving commands until the timer signals completion.
//!
//! Commands are read by a separate task ([`spawn_input_reader`]) and arrive
//! through an mpsc channel, so a slow terminal never stalls the countdown and
//! a running countdown never stalls command entry.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::command::{Action, dispatch};
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::console::Console;
use crate::history::HistoryStore;
use crate::queue::TaskQueue;
use crate::timer::TimerRunner;
use crate::types::{HistoryRecord, Task};

/// Lines buffered between the input reader and the scheduler.
const INPUT_BUFFER: usize = 16;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `exit`.
    ExitRequested,
    /// The input stream closed; no more commands can arrive.
    InputClosed,
}

/// Spawns the task that reads command lines and forwards them in order.
///
/// Lines that are not valid UTF-8 are forwarded with the bad bytes replaced,
/// so they reach the dispatcher like any other unknown command. The returned
/// channel closes when the input reaches end-of-file or a read fails. A read
/// failure is reported on the console first.
pub fn spawn_input_reader<R>(mut reader: R, console: Console) -> mpsc::Receiver<String>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    tokio::spawn(async move {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(decode_line(&buf)).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to read command");
                    console.line(format_args!("Input error: {err}"));
                    break;
                }
            }
        }
        debug!("input reader finished");
    });

    rx
}

/// Strips the line terminator (`\n` or `\r\n`) and decodes lossily.
fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Runs queued tasks one at a time while serving commands.
pub struct Scheduler<S> {
    queue: TaskQueue,
    store: S,
    console: Console,
    runner: TimerRunner,
    poll_interval: Duration,
}

impl<S: HistoryStore> Scheduler<S> {
    /// Creates a scheduler with an empty queue.
    pub fn new(store: S, console: Console) -> Self {
        let runner = TimerRunner::new(Arc::new(console.clone()));
        Self {
            queue: TaskQueue::new(),
            store,
            console,
            runner,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Uses an existing queue handle instead of a fresh one.
    #[must_use]
    pub fn with_queue(mut self, queue: TaskQueue) -> Self {
        self.queue = queue;
        self
    }

    /// Sets how long an idle scheduler waits for a command between queue
    /// checks.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The queue this scheduler pops from.
    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    /// Runs the session until `exit` or until `commands` closes.
    ///
    /// Neither way out waits for a running timer: the countdown is simply
    /// abandoned.
    #[instrument(skip_all)]
    pub async fn run(self, mut commands: mpsc::Receiver<String>) -> SessionEnd {
        self.console.print("$");

        loop {
            let Some(task) = self.queue.pop_front() else {
                match timeout(self.poll_interval, commands.recv()).await {
                    Ok(Some(line)) => {
                        if let ControlFlow::Break(end) = self.handle_line(&line) {
                            return end;
                        }
                    }
                    Ok(None) => return self.finish(SessionEnd::InputClosed),
                    Err(_elapsed) => {}
                }
                continue;
            };

            debug!(task = task.name(), waiting = self.queue.len(), "popped task");
            let mut timer = self.runner.start(task.clone());
            self.log_history(&task);

            loop {
                tokio::select! {
                    line = commands.recv() => match line {
                        Some(line) => {
                            if let ControlFlow::Break(end) = self.handle_line(&line) {
                                return end;
                            }
                        }
                        None => return self.finish(SessionEnd::InputClosed),
                    },
                    () = timer.finished() => break,
                }
            }
        }
    }

    /// Applies one command. Breaks with the session end on `exit`.
    fn handle_line(&self, line: &str) -> ControlFlow<SessionEnd> {
        let action = dispatch(line);
        debug!(?action, "dispatched command");

        if let Action::AddTask(task) = &action {
            self.queue.push(task.clone());
        }
        self.console.line(&action);

        if action == Action::Exit {
            return ControlFlow::Break(self.finish(SessionEnd::ExitRequested));
        }
        ControlFlow::Continue(())
    }

    fn log_history(&self, task: &Task) {
        let record = HistoryRecord::from_task(task, Local::now());
        if let Err(err) = self.store.append(&record) {
            warn!(task = task.name(), error = %err, "failed to log history");
            self.console.line(format_args!("Error logging history: {err}"));
        }
    }

    fn finish(&self, end: SessionEnd) -> SessionEnd {
        info!(?end, abandoned = self.queue.len(), "session ended");
        end
    }
}
