//! Storage layer for todo.
//!
//! The list lives in one plain text file, one entry per line:
//! - **list**: stream lines in order
//! - **append**: add a line at the end
//! - **delete / edit**: load everything, change one line, rewrite the file
//!
//! # Example
//!
//! ```no_run
//! use todo::store::TodoStore;
//!
//! let store = TodoStore::new("/home/me/.local/share/todo");
//! store.append("buy milk")?;
//! for entry in store.list()? {
//!     let entry = entry?;
//!     println!("{} {}", entry.index, entry.text);
//! }
//! store.delete(0)?;
//! # Ok::<(), todo::TodoError>(())
//! ```

mod entry;
mod todo_store;

pub use entry::{Entry, parse_index};
pub use todo_store::{Entries, TodoStore};
