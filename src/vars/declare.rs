//! Parser for `NAME=VALUE` declaration text.
//!
//! Accepts whitespace-separated pairs such as `GOOS=linux GOARCH=amd64`,
//! with optional whitespace around `=` and values that may be quoted
//! (`KEY="a value"`, `KEY='a value'`) or built from quoted and bare pieces.
//! Malformed tokens are dropped one at a time; the rest of the text still
//! parses.

use log::debug;

/// A single parsed `NAME=VALUE` pair, value still unexpanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

/// True for names of the form `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse every item in order. Each item may hold one or many pairs.
pub fn parse_all<I, S>(items: I) -> Vec<Declaration>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .flat_map(|item| parse(item.as_ref()))
        .collect()
}

/// Parse a whitespace-separated list of pairs, in the order they appear.
pub fn parse(text: &str) -> Vec<Declaration> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut result = Vec::new();
    let mut i = 0;

    loop {
        while i < len && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }

        let name_start = i;
        while i < len && !chars[i].is_whitespace() && chars[i] != '=' {
            i += 1;
        }
        let name: String = chars[name_start..i].iter().collect();

        let mut j = i;
        while j < len && chars[j].is_whitespace() {
            j += 1;
        }
        if j >= len || chars[j] != '=' {
            debug!("skipping declaration without '=': {name:?}");
            continue;
        }

        // Whitespace after `=` is tolerated the same as before it.
        i = j + 1;
        while i < len && chars[i].is_whitespace() {
            i += 1;
        }

        let (value, next) = scan_value(&chars, i);
        i = next;
        let Some(value) = value else {
            debug!("skipping declaration with unterminated quote: {name:?}");
            continue;
        };
        if !is_identifier(&name) {
            debug!("skipping declaration with invalid name: {name:?}");
            continue;
        }
        result.push(Declaration { name, value });
    }

    result
}

/// Scan a value starting at `start` up to the first unquoted whitespace.
///
/// Quotes are stripped; everything else, backslashes included, is kept for
/// the expansion step. Returns `None` for an unterminated quote, which
/// consumes the rest of the input.
fn scan_value(chars: &[char], start: usize) -> (Option<String>, usize) {
    let len = chars.len();
    let mut value = String::new();
    let mut i = start;

    while i < len {
        let c = chars[i];
        if c.is_whitespace() {
            break;
        }
        if c == '"' || c == '\'' {
            let Some(offset) = chars[i + 1..].iter().position(|&q| q == c) else {
                return (None, len);
            };
            let close = i + 1 + offset;
            value.extend(&chars[i + 1..close]);
            i = close + 1;
            continue;
        }
        value.push(c);
        i += 1;
    }

    (Some(value), i)
}
