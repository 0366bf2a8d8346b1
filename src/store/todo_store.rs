//! Line-per-entry todo file with whole-file rewrites.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use super::entry::Entry;
use crate::error::{Result, TodoError};

/// Todo list backed by a plain text file, one entry per line.
///
/// Holds nothing but the path. Every operation goes back to disk, so two
/// stores over the same path always agree with each other.
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    /// Create a store over the given file. Nothing is touched on disk.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream entries in file order.
    ///
    /// The file must already exist; listing never creates it.
    pub fn list(&self) -> Result<Entries> {
        let file = File::open(&self.path).map_err(|e| self.open_error(e))?;
        debug!("Listing entries from {}", self.path.display());
        Ok(Entries {
            path: self.path.clone(),
            lines: BufReader::new(file).lines(),
            next_index: 0,
        })
    }

    /// Read every entry into memory.
    pub fn load(&self) -> Result<Vec<Entry>> {
        self.list()?.collect()
    }

    /// Append one entry, creating the file (and its directory) if needed.
    pub fn append(&self, text: &str) -> Result<()> {
        if text.contains('\n') {
            warn!("Entry contains a newline and will occupy more than one index");
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.open_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.open_error(e))?;

        // One write call so the line lands in a single append.
        file.write_all(format!("{}\n", text).as_bytes())
            .map_err(|e| self.write_error(e))?;

        info!("Appended entry to {}", self.path.display());
        Ok(())
    }

    /// Remove the entry at `index` and return it.
    ///
    /// An index past the end is an error and leaves the file untouched.
    pub fn delete(&self, index: usize) -> Result<Entry> {
        let mut lines = self.load_lines()?;
        check_range(index, lines.len())?;

        let text = lines.remove(index);
        self.rewrite_file(&lines)?;

        info!("Deleted entry {} from {}", index, self.path.display());
        Ok(Entry::new(index, text))
    }

    /// Replace the text of the entry at `index`, returning the old entry.
    pub fn edit(&self, index: usize, text: &str) -> Result<Entry> {
        if text.contains('\n') {
            warn!("Entry contains a newline and will occupy more than one index");
        }

        let mut lines = self.load_lines()?;
        check_range(index, lines.len())?;

        let previous = std::mem::replace(&mut lines[index], text.to_string());
        self.rewrite_file(&lines)?;

        info!("Edited entry {} in {}", index, self.path.display());
        Ok(Entry::new(index, previous))
    }

    fn load_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| self.open_error(e))?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .map_err(|e| self.read_error(e))?;
        debug!("Loaded {} entries from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    /// Rewrite the whole file from `lines`.
    ///
    /// Lines go to a temporary file next to the real list which is then
    /// renamed over it, so a failed write leaves the old list in place.
    /// A symlinked list is written through the link, never over it.
    fn rewrite_file(&self, lines: &[String]) -> Result<()> {
        let target = self.rewrite_target()?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        let mut writer = BufWriter::new(tmp);
        for line in lines {
            writeln!(writer, "{}", line).map_err(|e| self.write_error(e))?;
        }
        let tmp = writer
            .into_inner()
            .map_err(|e| self.write_error(e.into_error()))?;

        // NamedTempFile is created 0600; keep whatever mode the list had.
        if let Ok(metadata) = fs::metadata(&target) {
            fs::set_permissions(tmp.path(), metadata.permissions()).map_err(|e| self.write_error(e))?;
        }

        tmp.as_file().sync_all().map_err(|e| self.write_error(e))?;
        tmp.persist(&target).map_err(|e| self.write_error(e.error))?;

        debug!("Rewrote {} with {} entries", target.display(), lines.len());
        Ok(())
    }

    /// The file a rewrite lands on: the path with every symlink resolved.
    fn rewrite_target(&self) -> Result<PathBuf> {
        match fs::canonicalize(&self.path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(self.write_error(e)),
        }
    }

    fn open_error(&self, source: io::Error) -> TodoError {
        TodoError::Open {
            path: self.path.clone(),
            source,
        }
    }

    fn read_error(&self, source: io::Error) -> TodoError {
        TodoError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> TodoError {
        TodoError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn check_range(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(TodoError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// Lazy iterator over the entries of an open todo file.
#[derive(Debug)]
pub struct Entries {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    next_index: usize,
}

impl Iterator for Entries {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let index = self.next_index;
        self.next_index += 1;
        Some(
            line.map(|text| Entry::new(index, text))
                .map_err(|source| TodoError::Read {
                    path: self.path.clone(),
                    source,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TodoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TodoStore::new(temp_dir.path().join("todo"));
        (store, temp_dir)
    }

    fn texts(store: &TodoStore) -> Vec<String> {
        store.load().unwrap().into_iter().map(|e| e.text).collect()
    }

    #[test]
    fn test_list_missing_file_fails() {
        let (store, _temp) = create_test_store();
        let result = store.list();
        assert!(matches!(result, Err(TodoError::Open { .. })));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_list_empty_file() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "").unwrap();
        assert_eq!(store.list().unwrap().count(), 0);
    }

    #[test]
    fn test_append_creates_file() {
        let (store, _temp) = create_test_store();
        store.append("buy milk").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "buy milk\n");
    }

    #[test]
    fn test_append_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = TodoStore::new(temp_dir.path().join(".local").join("share").join("todo"));
        store.append("buy milk").unwrap();
        assert_eq!(texts(&store), vec!["buy milk"]);
    }

    #[test]
    fn test_append_then_list_shows_last() {
        let (store, _temp) = create_test_store();
        store.append("buy milk").unwrap();
        store.append("call mom").unwrap();

        let entries = store.load().unwrap();
        assert_eq!(entries.last(), Some(&Entry::new(1, "call mom")));
    }

    #[test]
    fn test_list_indices_follow_file_order() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "a\nb\nc\n").unwrap();

        let entries: Vec<Entry> = store.list().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(
            entries,
            vec![Entry::new(0, "a"), Entry::new(1, "b"), Entry::new(2, "c")]
        );
    }

    #[test]
    fn test_list_last_line_without_newline() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "a\nb").unwrap();
        assert_eq!(texts(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_delete_middle() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "A\nB\nC\n").unwrap();

        let removed = store.delete(1).unwrap();
        assert_eq!(removed, Entry::new(1, "B"));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "A\nC\n");

        store.delete(1).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "A\n");
    }

    #[test]
    fn test_delete_renumbers() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "A\nB\nC\nD\n").unwrap();

        store.delete(0).unwrap();
        let entries = store.load().unwrap();
        assert_eq!(
            entries,
            vec![Entry::new(0, "B"), Entry::new(1, "C"), Entry::new(2, "D")]
        );
    }

    #[test]
    fn test_delete_last_leaves_empty_file() {
        let (store, _temp) = create_test_store();
        store.append("only").unwrap();
        store.delete(0).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn test_delete_out_of_range_leaves_file() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "A\nB").unwrap();

        let result = store.delete(2);
        assert!(matches!(
            result,
            Err(TodoError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "A\nB");
    }

    #[test]
    fn test_delete_missing_file_fails() {
        let (store, _temp) = create_test_store();
        assert!(matches!(store.delete(0), Err(TodoError::Open { .. })));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_edit_replaces_only_target() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "A\nB\nC\n").unwrap();

        let previous = store.edit(1, "b2").unwrap();
        assert_eq!(previous.text, "B");
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "A\nb2\nC\n");
    }

    #[test]
    fn test_edit_out_of_range_leaves_file() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "A\n").unwrap();

        assert!(matches!(
            store.edit(3, "x"),
            Err(TodoError::IndexOutOfRange { index: 3, len: 1 })
        ));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "A\n");
    }

    #[test]
    fn test_rewrite_leaves_no_temp_files() {
        let (store, temp) = create_test_store();
        fs::write(store.path(), "A\nB\n").unwrap();
        store.delete(0).unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("todo")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp) = create_test_store();
        fs::write(store.path(), "A\nB\n").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.delete(0).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_through_symlink() {
        let (store, temp) = create_test_store();
        let real = temp.path().join("real_list");
        fs::write(&real, "A\nB\n").unwrap();
        std::os::unix::fs::symlink(&real, store.path()).unwrap();

        store.delete(0).unwrap();
        assert!(fs::symlink_metadata(store.path()).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "B\n");

        store.edit(0, "b2").unwrap();
        assert!(fs::symlink_metadata(store.path()).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "b2\n");
    }

    #[test]
    fn test_list_is_repeatable() {
        let (store, _temp) = create_test_store();
        fs::write(store.path(), "a\nb\n").unwrap();
        assert_eq!(store.load().unwrap(), store.load().unwrap());
    }
}
