//! Shared console output.
//!
//! The scheduler and the active timer both write to the terminal. Writes go
//! through one mutex so a progress line and a command reply never interleave
//! mid-line.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::duration::format_duration;
use crate::timer::{TickObserver, TimerEvent};

/// Cloneable handle to the program's output stream.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Console {
    /// Wraps any writer.
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    /// Console writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Writes a full line.
    pub fn line(&self, text: impl fmt::Display) {
        self.write(format_args!("{text}\n"));
    }

    /// Writes text without a trailing newline and flushes it.
    pub fn print(&self, text: impl fmt::Display) {
        self.write(format_args!("{text}"));
    }

    // Write failures only reach the debug log.
    fn write(&self, args: fmt::Arguments<'_>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = out.write_fmt(args).and_then(|()| out.flush()) {
            debug!(error = %err, "console write failed");
        }
    }
}

impl TickObserver for Console {
    fn observe(&self, event: &TimerEvent) {
        match event {
            TimerEvent::Started { name, duration } => {
                self.print(format_args!(
                    "\nStarting {name} timer for {}\n",
                    format_duration(*duration)
                ));
            }
            TimerEvent::Progress { name, remaining } => {
                let remaining = format_duration(*remaining);
                self.print(format_args!("\r{name}: {remaining:<10} remaining"));
            }
            TimerEvent::Completed { name } => {
                self.print(format_args!("\r{name}: \x1b[32mCompleted!\x1b[0m\n"));
            }
        }
    }
}
