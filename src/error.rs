//! Error type shared by the variable store, session, and program info.

use thiserror::Error;

/// Result alias for fallible session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced through a session's `err()` accessor.
///
/// Expansion and declaration parsing never produce errors; only writes to
/// the process environment and OS lookups do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The OS refuses environment names that are empty or contain `=` or NUL.
    #[error("invalid environment variable name: {0:?}")]
    InvalidEnvName(String),

    /// Environment values cannot contain NUL.
    #[error("environment variable {name:?} has a value containing NUL")]
    InvalidEnvValue { name: String },

    /// Caller-built error with an expanded message.
    #[error("{0}")]
    Message(String),

    /// Program info lookup failed (executable path, working directory, PATH search).
    #[error("program info: {0}")]
    Prog(String),
}
