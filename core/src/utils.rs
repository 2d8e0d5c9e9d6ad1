//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// Strings shorter than 12 characters are hidden entirely; longer ones keep
/// their first and last three characters so that different credentials can
/// still be told apart in logs. Lengths count characters, not bytes.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("EMPTY");
        }
        if self.0.chars().count() < 12 {
            return f.write_str("***");
        }

        // Cut on char boundaries, never on bytes.
        let head: String = self.0.chars().take(3).collect();
        let mut tail: Vec<char> = self.0.chars().rev().take(3).collect();
        tail.reverse();

        write!(f, "{head}***{}", tail.into_iter().collect::<String>())
    }
}
