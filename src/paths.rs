//! Default location of the todo file.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Result, TodoError};

/// Directory under `$HOME` that holds the list.
pub const DATA_SUBDIR: &str = ".local/share";

/// `<home>/.local/share/<program>`, from an explicit home value.
///
/// An unset or empty home is an error rather than a silent relative path.
pub fn default_todo_path(home: Option<OsString>, program: &str) -> Result<PathBuf> {
    let home = home.filter(|h| !h.is_empty()).ok_or(TodoError::HomeNotSet)?;
    Ok(PathBuf::from(home).join(DATA_SUBDIR).join(program))
}

/// Same as [`default_todo_path`] using the `HOME` environment variable.
pub fn todo_path_from_env(program: &str) -> Result<PathBuf> {
    default_todo_path(std::env::var_os("HOME"), program)
}
