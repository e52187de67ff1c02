//! Two-part composite key.
//!
//! # Invariants
//! - Ordering is lexicographic: `first`, then `second`.
//! - `encode`/`decode` round-trip any pair of strings, including ones that
//!   contain the separator.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const SEPARATOR: char = ':';
const ESCAPE: char = '\\';

/// Ordered pair used as a composite identity key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Display, B: Display> Display for Pair<A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

impl Pair<String, String> {
    /// Canonical single-string form: `first:second` with `\` escaping.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.first.len() + self.second.len() + 1);
        push_escaped(&mut out, &self.first);
        out.push(SEPARATOR);
        push_escaped(&mut out, &self.second);
        out
    }

    /// Parses the output of [`Pair::encode`].
    ///
    /// Returns `None` when the text has no unescaped separator, more than
    /// one, or a dangling escape character.
    pub fn decode(text: &str) -> Option<Self> {
        let mut parts = vec![String::new()];
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            match ch {
                ESCAPE => {
                    let escaped = chars.next()?;
                    parts.last_mut()?.push(escaped);
                }
                SEPARATOR => parts.push(String::new()),
                other => parts.last_mut()?.push(other),
            }
        }

        if parts.len() != 2 {
            return None;
        }
        let second = parts.pop()?;
        let first = parts.pop()?;
        Some(Self::new(first, second))
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        if ch == SEPARATOR || ch == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::Pair;

    #[test]
    fn encode_escapes_separator_and_escape_characters() {
        let pair = Pair::new("a:b".to_string(), "c\\d".to_string());
        assert_eq!(pair.encode(), "a\\:b:c\\\\d");
        assert_eq!(Pair::decode(&pair.encode()), Some(pair));
    }

    #[test]
    fn decode_rejects_ambiguous_text() {
        assert_eq!(Pair::decode("no-separator"), None);
        assert_eq!(Pair::decode("a:b:c"), None);
        assert_eq!(Pair::decode("dangling\\"), None);
    }

    #[test]
    fn display_lists_both_components() {
        let pair = Pair::new("1".to_string(), "2".to_string());
        assert_eq!(pair.to_string(), "(1, 2)");
    }
}
