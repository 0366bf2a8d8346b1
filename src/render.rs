//! List output formatting.

use std::io::{IsTerminal, Write, stdout};

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Entry;

/// Default width the index column is padded to.
pub const DEFAULT_PADDING: usize = 3;

/// When to color the index column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout().is_terminal(),
        }
    }
}

/// Format one entry as `<index padded to width><text>`.
///
/// An index wider than the column still gets a single space before the text.
pub fn format_entry(entry: &Entry, padding: usize, color: bool) -> String {
    let width = padding.max(digits(entry.index) + 1);
    let index = format!("{:<width$}", entry.index, width = width);
    if color {
        format!("{}{}", index.as_str().green(), entry.text)
    } else {
        format!("{}{}", index, entry.text)
    }
}

/// Write entries one per line, returning how many were written.
pub fn write_entries<W, I>(out: &mut W, entries: I, padding: usize, color: bool) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<Entry>>,
{
    let mut count = 0;
    for entry in entries {
        writeln!(out, "{}", format_entry(&entry?, padding, color))?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
