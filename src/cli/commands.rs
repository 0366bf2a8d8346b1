//! CLI command definitions using clap.
//!
//! Every revision's spelling is accepted:
//! - no action: list
//! - add / -a: append an entry
//! - del / -d: delete an entry by index
//! - edit / -e: replace an entry by index

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use todo::TodoError;
use todo::render::ColorMode;
use todo::store::parse_index;

/// todo - keep a todo list in a plain text file
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Todo file to use instead of ~/.local/share/<program>
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// When to color the index column
    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorMode>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append an entry
    #[arg(short = 'a', long = "add", value_name = "TEXT", allow_hyphen_values = true)]
    pub add: Option<String>,

    /// Delete the entry at NUMBER
    #[arg(short = 'd', long = "del", value_name = "NUMBER", allow_hyphen_values = true)]
    pub del: Option<String>,

    /// Replace the entry at NUMBER with TEXT
    #[arg(
        short = 'e',
        long = "edit",
        num_args = 2,
        value_names = ["NUMBER", "TEXT"],
        allow_hyphen_values = true
    )]
    pub edit: Option<Vec<String>>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every entry with its index
    List,

    /// Append an entry
    Add {
        /// Entry text
        #[arg(allow_hyphen_values = true)]
        text: String,
    },

    /// Delete an entry
    Del {
        /// Index of the entry to delete
        #[arg(allow_hyphen_values = true)]
        index: String,
    },

    /// Replace the text of an entry
    Edit {
        /// Index of the entry to replace
        #[arg(allow_hyphen_values = true)]
        index: String,

        /// New entry text
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
}

/// The single operation an invocation performs, with its index already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Add(String),
    Delete(usize),
    Edit(usize, String),
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Resolve the subcommand and flags into one action.
    ///
    /// Giving more than one action is a usage error. Index arguments are
    /// parsed here so a bad index is rejected before the file is touched.
    pub fn action(&self) -> Result<Action, TodoError> {
        let mut actions = Vec::new();

        match &self.command {
            Some(Commands::List) => actions.push(Action::List),
            Some(Commands::Add { text }) => actions.push(Action::Add(text.clone())),
            Some(Commands::Del { index }) => actions.push(Action::Delete(parse_index(index)?)),
            Some(Commands::Edit { index, text }) => {
                actions.push(Action::Edit(parse_index(index)?, text.clone()))
            }
            None => {}
        }

        if let Some(text) = &self.add {
            actions.push(Action::Add(text.clone()));
        }
        if let Some(index) = &self.del {
            actions.push(Action::Delete(parse_index(index)?));
        }
        if let Some(values) = &self.edit {
            match values.as_slice() {
                [index, text] => actions.push(Action::Edit(parse_index(index)?, text.clone())),
                _ => return Err(TodoError::Usage("-e takes a number and a string".to_string())),
            }
        }

        match actions.len() {
            0 => Ok(Action::List),
            1 => Ok(actions.remove(0)),
            _ => Err(TodoError::Usage(
                "only one of add, del or edit may be given".to_string(),
            )),
        }
    }
}
