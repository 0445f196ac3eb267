//! I/O boundary traits for testability
//!
//! These traits abstract external I/O and the triple store, allowing services
//! to be tested with in-memory graphs and mock filesystems.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::{NodeId, ObjectPattern, Value};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Read-only pattern queries over a set of triples.
///
/// Predicates are full IRIs, see [`crate::domain::vocab`].
pub trait TripleStore {
    /// All subjects having `predicate` with an object matching `object`.
    ///
    /// Order is whatever the store yields; callers must not rely on it.
    fn subjects_matching(&self, predicate: &str, object: ObjectPattern<'_>) -> Vec<NodeId>;

    /// One object for `subject` / `predicate`, if any.
    fn value_of(&self, subject: &NodeId, predicate: &str) -> Option<Value>;

    /// All objects for `subject` / `predicate`.
    fn values_of(&self, subject: &NodeId, predicate: &str) -> Vec<Value>;

    /// Number of triples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}
