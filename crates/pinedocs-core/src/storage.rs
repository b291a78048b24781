//! Output directory management.
//!
//! The output documents are append-only: the pipeline writes the header once
//! and then appends completed pages in index order. Write failures here are
//! the only fatal errors in a run.

use crate::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem writer rooted at the output directory.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create the output directory (and parents) if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot create output directory '{}': {e}", root.display()),
            ))
        })?;
        Ok(Self { root })
    }

    /// Absolute path of a file inside the output directory.
    #[must_use]
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Start a fresh document, truncating any previous run's output.
    pub fn create(&self, file: &str, content: &str) -> Result<()> {
        let path = self.path(file);
        fs::write(&path, content)?;
        debug!("Created {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    /// Append a chunk to an existing document.
    pub fn append(&self, file: &str, content: &str) -> Result<()> {
        let path = self.path(file);
        let mut handle = OpenOptions::new().create(true).append(true).open(&path)?;
        handle.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Read a document back (used to re-load a URL index).
    pub fn read(&self, file: &str) -> Result<String> {
        let path = self.path(file);
        fs::read_to_string(&path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read '{}': {e}", path.display()),
            ))
        })
    }

    /// Whether a document exists in the output directory.
    #[must_use]
    pub fn exists(&self, file: &str) -> bool {
        self.path(file).exists()
    }

    /// Size of a written document in bytes.
    pub fn size(&self, file: &str) -> Result<u64> {
        Ok(fs::metadata(self.path(file))?.len())
    }

    /// The output directory itself.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_then_append_builds_document_incrementally() {
        let dir = tempdir().expect("tempdir");
        let storage = Storage::new(dir.path().join("output")).expect("storage");

        storage.create("doc.md", "# Header\n\n").expect("create");
        storage.append("doc.md", "First page\n").expect("append");
        storage.append("doc.md", "Second page\n").expect("append");

        let content = storage.read("doc.md").expect("read");
        assert_eq!(content, "# Header\n\nFirst page\nSecond page\n");
        assert!(storage.size("doc.md").expect("size") > 0);
    }

    #[test]
    fn create_truncates_previous_run() {
        let dir = tempdir().expect("tempdir");
        let storage = Storage::new(dir.path()).expect("storage");

        storage.create("doc.md", "old run").expect("create");
        storage.create("doc.md", "new run\n").expect("create");

        assert_eq!(storage.read("doc.md").expect("read"), "new run\n");
    }

    #[test]
    fn missing_file_reads_as_io_error() {
        let dir = tempdir().expect("tempdir");
        let storage = Storage::new(dir.path()).expect("storage");
        assert!(!storage.exists("absent.md"));
        assert!(matches!(storage.read("absent.md"), Err(Error::Io(_))));
    }
}
