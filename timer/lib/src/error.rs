//! Error types for the timer library.

use thiserror::Error;

/// Errors that can occur when working with history storage.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Failed to read from the history file.
    #[error("failed to read history: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to append to the history file.
    #[error("failed to write history: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to encode a history record for output.
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),

    /// Failed to acquire a file lock.
    #[error("failed to acquire lock")]
    Lock,
}

/// Errors produced while parsing duration flags such as `-h 1 -m 30`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token looked like a flag but is not one of `h`, `m` or `s`.
    #[error("flag provided but not defined: {0}")]
    UnknownFlag(String),

    /// A flag appeared as the last token with nothing after it.
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    /// The flag value is not an integer.
    #[error("invalid value {value:?} for flag -{flag}")]
    InvalidValue {
        /// The flag name without dashes.
        flag: String,
        /// The raw value text.
        value: String,
    },

    /// A token appeared where a flag was expected.
    #[error("unexpected argument {0:?}, durations must use -h, -m or -s")]
    UnexpectedArgument(String),

    /// One of the values was below zero.
    #[error("negative values not allowed")]
    Negative,

    /// The summed duration does not fit in a duration value.
    #[error("duration is too large")]
    Overflow,
}
