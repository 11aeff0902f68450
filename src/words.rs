//! Word splitting for command strings handed to process spawning.

/// Split a command into words using shlex (POSIX word splitting).
///
/// Quotes group words and are removed. An unbalanced quote falls back to
/// plain whitespace splitting rather than failing.
pub fn split(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        log::debug!("unbalanced quotes, splitting on whitespace: {command:?}");
        command.split_whitespace().map(String::from).collect()
    })
}
