//! Name lookup strategies injected into the scanner.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Maps a variable name to its value.
///
/// Unknown names resolve to the empty string; expansion never fails on a
/// missing variable.
pub trait Resolver {
    fn resolve(&self, name: &str) -> String;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, name: &str) -> String {
        self(name)
    }
}

impl<S: BuildHasher> Resolver for HashMap<String, String, S> {
    fn resolve(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

/// Resolves names against the process environment only.
///
/// Variables whose value is not valid UTF-8 resolve to the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl Resolver for Environment {
    fn resolve(&self, name: &str) -> String {
        env_value(name)
    }
}

/// Read a process environment variable, empty when unset or unreadable.
pub(crate) fn env_value(name: &str) -> String {
    // std::env::var panics on names it can never hold; those are simply unset.
    if name.is_empty() || name.contains(['=', '\0']) {
        return String::new();
    }
    std::env::var(name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_resolver() {
        let r = |name: &str| name.to_uppercase();
        assert_eq!(r.resolve("abc"), "ABC");
    }

    #[test]
    fn map_resolver_missing_is_empty() {
        let mut map = HashMap::new();
        map.insert("foo".to_string(), "bar".to_string());
        assert_eq!(map.resolve("foo"), "bar");
        assert_eq!(map.resolve("nope"), "");
    }

    #[test]
    fn environment_resolver_reads_path() {
        let path = std::env::var("PATH").unwrap_or_default();
        assert_eq!(Environment.resolve("PATH"), path);
    }

    #[test]
    fn environment_resolver_rejects_impossible_names() {
        assert_eq!(Environment.resolve(""), "");
        assert_eq!(Environment.resolve("A=B"), "");
        assert_eq!(Environment.resolve("A\0B"), "");
    }
}
