//! todo - a todo list kept as a plain text file
//!
//! Each line of the file is one task, addressed by its 0-based position.
//! The library covers the file itself; argument parsing and config live
//! in the binary.

pub mod error;
pub mod paths;
pub mod render;
pub mod store;

pub use error::{Result, TodoError};
