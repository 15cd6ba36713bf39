//! Interactive command parsing.
//!
//! [`dispatch`] turns one input line into an [`Action`] without touching any
//! state. The scheduler applies the action: pushing the task, printing the
//! reply, or ending the session.

use std::fmt;
use std::time::Duration;

use crate::duration::{format_duration, parse_duration_flags};
use crate::error::ParseError;
use crate::types::Task;

const ADD_PREFIX: &str = "add ";

/// What a command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// End the session immediately.
    Exit,
    /// Queue a new task.
    AddTask(Task),
    /// Not an `add` or `exit` command.
    Unrecognized,
    /// `add` with no name before the first flag.
    RejectedEmptyName,
    /// The duration flags did not parse.
    RejectedBadDuration(ParseError),
    /// The duration flags summed to zero.
    RejectedNonPositiveDuration,
}

impl fmt::Display for Action {
    /// The console reply for this action.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exit => write!(f, "Exiting..."),
            Self::AddTask(task) => write!(
                f,
                "Added task: {} ({})",
                task.name(),
                format_duration(task.duration())
            ),
            Self::Unrecognized => write!(f, "Unknown command. Use 'add <task> [flags]' or 'exit'"),
            Self::RejectedEmptyName => {
                write!(f, "Invalid command format. Use: add <task name> [flags]")
            }
            Self::RejectedBadDuration(err) => write!(f, "Error parsing duration: {err}"),
            Self::RejectedNonPositiveDuration => write!(f, "Duration must be positive"),
        }
    }
}

/// Parses one line of user input.
///
/// ## Grammar
///
/// - `exit` in any letter case ends the session.
/// - `add <name tokens...> [-h N] [-m N] [-s N]` queues a task. The name is
///   every token before the first one starting with `-`, joined by single
///   spaces; the rest are duration flags.
/// - Anything else is unrecognized.
///
/// ## Examples
///
/// ```
/// use std::time::Duration;
/// use timer_lib::{Action, Task, dispatch};
///
/// assert_eq!(
///     dispatch("add Study Session -m 25"),
///     Action::AddTask(Task::new("Study Session", Duration::from_secs(25 * 60))),
/// );
/// assert_eq!(dispatch("EXIT"), Action::Exit);
/// assert_eq!(dispatch("add -m 5"), Action::RejectedEmptyName);
/// ```
pub fn dispatch(line: &str) -> Action {
    if line.to_lowercase() == "exit" {
        return Action::Exit;
    }

    let Some(rest) = line.strip_prefix(ADD_PREFIX) else {
        return Action::Unrecognized;
    };

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let (name_tokens, flag_tokens) = match tokens.iter().position(|t| t.starts_with('-')) {
        Some(0) => return Action::RejectedEmptyName,
        Some(index) => tokens.split_at(index),
        None => (tokens.as_slice(), &[][..]),
    };

    if name_tokens.is_empty() {
        return Action::RejectedEmptyName;
    }

    let duration = match parse_duration_flags(&flag_tokens.join(" ")) {
        Ok(duration) => duration,
        Err(err) => return Action::RejectedBadDuration(err),
    };

    if duration == Duration::ZERO {
        return Action::RejectedNonPositiveDuration;
    }

    Action::AddTask(Task::new(name_tokens.join(" "), duration))
}
