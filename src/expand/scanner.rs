//! Single-pass reference scanner.
//!
//! The scanner copies input to the output by default and stops on two
//! characters only: the escape character and `$`.
//!
//! - A run of escape characters that ends right before `$` pairs off: every
//!   two escapes emit one literal escape, and an odd leftover suppresses the
//!   `$`, which is then emitted literally. A run followed by anything else is
//!   copied verbatim.
//! - `${NAME}` ends at the first `}` (no nesting). Without a closing `}` the
//!   `${` is copied and scanning resumes after the `{`.
//! - `$NAME` is a single ASCII digit, or a letter or underscore followed by
//!   the longest run of ASCII letters, digits, and underscores.
//! - A `$` that starts neither form is copied.
//!
//! Every reference is replaced with whatever the resolver returns, which is
//! the empty string for unknown names.

use super::resolve::Resolver;

/// Escape character used when none is configured.
pub const DEFAULT_ESCAPE: char = '\\';

/// Expand `input` with the default `\` escape character.
pub fn expand<R: Resolver + ?Sized>(input: &str, resolver: &R) -> String {
    expand_with(input, DEFAULT_ESCAPE, resolver)
}

/// Expand `input`, treating `escape` as the character that suppresses a
/// following `$`.
///
/// Passing `$` as the escape character disables expansion entirely.
pub fn expand_with<R: Resolver + ?Sized>(input: &str, escape: char, resolver: &R) -> String {
    // Escape runs only change meaning in front of `$`.
    if !input.contains('$') {
        return input.to_string();
    }
    Scanner::new(input, escape).run(resolver)
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    escape: char,
    out: String,
    /// Lowest position known to have no `}` at or after it.
    unclosed_from: Option<usize>,
}

impl Scanner {
    fn new(input: &str, escape: char) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            escape,
            out: String::with_capacity(input.len()),
            unclosed_from: None,
        }
    }

    fn run<R: Resolver + ?Sized>(mut self, resolver: &R) -> String {
        while let Some(&c) = self.chars.get(self.pos) {
            if c == self.escape {
                self.escape_run();
            } else if c == '$' {
                self.reference(resolver);
            } else {
                self.out.push(c);
                self.pos += 1;
            }
        }
        self.out
    }

    /// Consume a maximal run of escape characters starting at `pos`.
    fn escape_run(&mut self) {
        let start = self.pos;
        let mut end = start;
        while self.chars.get(end) == Some(&self.escape) {
            end += 1;
        }
        let run = end - start;

        if self.chars.get(end) != Some(&'$') {
            self.push_escapes(run);
            self.pos = end;
            return;
        }

        self.push_escapes(run / 2);
        if run % 2 == 1 {
            self.out.push('$');
            self.pos = end + 1;
        } else {
            // Paired off completely; the `$` is handled as a reference next.
            self.pos = end;
        }
    }

    fn push_escapes(&mut self, count: usize) {
        for _ in 0..count {
            self.out.push(self.escape);
        }
    }

    /// Handle an unsuppressed `$` at `pos`.
    fn reference<R: Resolver + ?Sized>(&mut self, resolver: &R) {
        match self.chars.get(self.pos + 1).copied() {
            Some('{') => self.braced(resolver),
            Some(d) if d.is_ascii_digit() => {
                self.out.push_str(&resolver.resolve(d.encode_utf8(&mut [0; 4])));
                self.pos += 2;
            }
            Some(c) if is_name_start(c) => {
                let start = self.pos + 1;
                let mut end = start + 1;
                while self.chars.get(end).is_some_and(|&c| is_name_char(c)) {
                    end += 1;
                }
                let name: String = self.chars[start..end].iter().collect();
                self.out.push_str(&resolver.resolve(&name));
                self.pos = end;
            }
            _ => {
                self.out.push('$');
                self.pos += 1;
            }
        }
    }

    /// Handle `${` at `pos`.
    fn braced<R: Resolver + ?Sized>(&mut self, resolver: &R) {
        let name_start = self.pos + 2;
        let Some(close) = self.find_close(name_start) else {
            self.out.push_str("${");
            self.pos = name_start;
            return;
        };

        if close == name_start {
            self.out.push_str("${}");
        } else {
            let name: String = self.chars[name_start..close].iter().collect();
            self.out.push_str(&resolver.resolve(&name));
        }
        self.pos = close + 1;
    }

    /// Position of the first `}` at or after `from`.
    ///
    /// A failed search is remembered so later unterminated `${` do not rescan
    /// the tail of the input.
    fn find_close(&mut self, from: usize) -> Option<usize> {
        if self.unclosed_from.is_some_and(|p| from >= p) {
            return None;
        }
        let found = self.chars[from.min(self.chars.len())..]
            .iter()
            .position(|&c| c == '}')
            .map(|offset| from + offset);
        if found.is_none() {
            self.unclosed_from = Some(from);
        }
        found
    }
}
