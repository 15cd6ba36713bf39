//! Countdown execution for the active task.
//!
//! A timer runs on its own tokio task and ticks once per second. Each tick
//! recomputes the remaining time from the fixed start instant, so a late tick
//! never makes the countdown drift; it only skips a display update.
//!
//! A running timer cannot be cancelled. Once started it always reaches
//! `Completed`, unless the whole process exits first.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use timer_lib::{Console, Task, TimerRunner};
//!
//! # async fn example() {
//! let runner = TimerRunner::new(Arc::new(Console::stdout()));
//! let mut handle = runner.start(Task::new("Tea", Duration::from_secs(180)));
//!
//! // ... keep serving commands ...
//!
//! handle.finished().await;
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::duration::round_to_secs;
use crate::types::Task;

/// Fixed tick cadence.
pub const TICK: Duration = Duration::from_secs(1);

/// Event emitted by a running timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The countdown has begun.
    Started {
        /// The task name.
        name: String,
        /// The full countdown length.
        duration: Duration,
    },
    /// A tick with time still left.
    Progress {
        /// The task name.
        name: String,
        /// Remaining time, rounded to whole seconds. Never zero.
        remaining: Duration,
    },
    /// The countdown reached zero. Emitted exactly once, last.
    Completed {
        /// The task name.
        name: String,
    },
}

/// Receives timer events as they happen.
///
/// Observers are called from the timer's own task and must not block.
pub trait TickObserver: Send + Sync {
    /// Handles one event.
    fn observe(&self, event: &TimerEvent);
}

/// Runs countdowns and reports their events to an observer.
#[derive(Clone)]
pub struct TimerRunner {
    observer: Arc<dyn TickObserver>,
}

impl TimerRunner {
    /// Creates a runner reporting to `observer`.
    #[must_use]
    pub fn new(observer: Arc<dyn TickObserver>) -> Self {
        Self { observer }
    }

    /// Spawns the countdown for `task` and returns its completion handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, task: Task) -> TimerHandle {
        let (done_tx, done_rx) = watch::channel(false);
        let runner = self.clone();

        tokio::spawn(async move {
            runner.run(&task).await;
            done_tx.send_replace(true);
        });

        TimerHandle { done: done_rx }
    }

    /// Runs the countdown for `task` to completion on the current task.
    pub async fn run(&self, task: &Task) {
        let name = task.name().to_string();
        self.observer.observe(&TimerEvent::Started {
            name: name.clone(),
            duration: task.duration(),
        });
        info!(task = %name, seconds = task.duration().as_secs(), "timer started");

        let start = Instant::now();
        let mut ticks = interval_at(start + TICK, TICK);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;

            let remaining = round_to_secs(task.duration().saturating_sub(start.elapsed()));
            if remaining == 0 {
                self.observer.observe(&TimerEvent::Completed { name: name.clone() });
                info!(task = %name, "timer completed");
                return;
            }

            debug!(task = %name, remaining, "tick");
            self.observer.observe(&TimerEvent::Progress {
                name: name.clone(),
                remaining: Duration::from_secs(remaining),
            });
        }
    }
}

/// Completion signal for a spawned timer.
///
/// The signal fires once and stays set.
#[derive(Debug)]
pub struct TimerHandle {
    done: watch::Receiver<bool>,
}

impl TimerHandle {
    /// Waits until the timer has completed.
    ///
    /// Also returns if the timer task went away without completing, which
    /// only happens when the runtime is shutting down.
    pub async fn finished(&mut self) {
        let _ = self.done.wait_for(|done| *done).await;
    }

    /// Returns true once the timer has completed.
    pub fn is_finished(&self) -> bool {
        *self.done.borrow()
    }
}
