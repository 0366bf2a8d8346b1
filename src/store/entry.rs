//! A single line of the todo list and the index that addresses it.

use std::fmt;

use crate::error::{Result, TodoError};

/// One task: its position in current file order and its text.
///
/// The index is not a stable identifier. Deleting an earlier entry shifts
/// every later one down by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub index: usize,
    pub text: String,
}

impl Entry {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index, self.text)
    }
}

/// Parse a command-line index.
///
/// Accepts base-10 non-negative integers only. Signs other than a leading
/// `+`, whitespace, and trailing characters are rejected.
pub fn parse_index(input: &str) -> Result<usize> {
    input
        .parse::<usize>()
        .map_err(|_| TodoError::InvalidIndex(input.to_string()))
}
