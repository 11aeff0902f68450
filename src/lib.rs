//! shellglue: shell-style variables and `$VAR` expansion for typed scripting glue.
//!
//! A [`Session`] holds local variables that shadow process environment
//! variables, and expands `$NAME` / `${NAME}` references in any string the
//! caller hands it: command lines, file paths, messages. Expansion is
//! lenient: unknown names expand to nothing and malformed references are
//! copied through unchanged.
//!
//! # Architecture
//!
//! - **[`expand`](mod@expand)**: Expansion engine: single-pass scanner and the [`Resolver`] seam.
//! - **[`vars`]**: Variable store: local map, environment write-through, `NAME=VALUE` parser.
//! - **[`session`]**: Session object tying store, config, and program info together.
//! - **[`words`]**: shlex word splitting of expanded command strings.
//! - **[`prog`]**: Running program info (pid, executable, PATH lookup).
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: simplelog setup for stderr and an optional log file.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Crate error type.
pub mod error;
/// Variable reference scanner and name resolvers.
pub mod expand;
/// Logger installation.
pub mod logging;
/// Program information bound to a session.
pub mod prog;
/// Session object and the shared global session.
pub mod session;
/// Local/environment variable store and declaration parsing.
pub mod vars;
/// Command word splitting.
pub mod words;

pub use error::{Error, Result};
pub use expand::{Resolver, expand, expand_with};
pub use session::Session;
pub use vars::Variables;

/// Expand `text` against the shared global session.
///
/// For isolated state, build a [`Session`] directly.
pub fn eval(text: &str) -> String {
    Session::global().eval(text)
}
