//! Tests for services running against an in-memory FileSystem

mod common;

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use common::{document, mathematics};
use curriculum_tree::application::services::{CurriculumService, MarkdownRenderer};
use curriculum_tree::application::ApplicationError;
use curriculum_tree::config::{LoadSettings, RenderSettings};
use curriculum_tree::infrastructure::traits::FileSystem;

/// Files and directories held in memory.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
        fs
    }

    fn content(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if !self.dirs.lock().unwrap().contains(&parent) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "parent directory missing"));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.as_bytes().to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}

#[test]
fn given_in_memory_file_when_loaded_and_rendered_then_pages_written_to_memory() {
    // Arrange
    let fs = Arc::new(MemoryFileSystem::with_file(
        "/curriculum/MAT.rdf",
        &document(&mathematics()),
    ));
    let mut service = CurriculumService::new(fs.clone(), LoadSettings::default());

    // Act
    service.add_file(Path::new("/curriculum/MAT.rdf")).unwrap();
    let renderer = MarkdownRenderer::new(fs.clone(), RenderSettings::default()).unwrap();
    let report = renderer
        .render(service.curriculum(), Path::new("/site"))
        .unwrap();

    // Assert
    assert_eq!(report.pages.len(), 2);
    let page = fs
        .content(Path::new("/site/Mathematics/AC9M7N02.md"))
        .unwrap();
    assert!(page.contains("> represent natural numbers as products of powers of prime numbers"));
    assert!(fs.exists(Path::new("/site/Mathematics")));
}

#[test]
fn given_path_missing_from_memory_when_loaded_then_file_not_found() {
    let fs = Arc::new(MemoryFileSystem::default());
    let mut service = CurriculumService::new(fs, LoadSettings::default());

    let result = service.add_file(Path::new("/curriculum/MAT.rdf")).map(|_| ());

    assert!(matches!(result, Err(ApplicationError::FileNotFound(_))));
}

#[test]
fn given_unwritable_target_when_rendered_then_operation_failed_names_path() {
    /// Accepts directories but refuses every write.
    struct ReadOnly(MemoryFileSystem);

    impl FileSystem for ReadOnly {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.0.read(path)
        }
        fn write(&self, _path: &Path, _content: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
        fn exists(&self, path: &Path) -> bool {
            self.0.exists(path)
        }
        fn is_file(&self, path: &Path) -> bool {
            self.0.is_file(path)
        }
        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            self.0.create_dir_all(path)
        }
    }

    let fs = Arc::new(ReadOnly(MemoryFileSystem::with_file(
        "/curriculum/MAT.rdf",
        &document(&mathematics()),
    )));
    let mut service = CurriculumService::new(fs.clone(), LoadSettings::default());
    service.add_file(Path::new("/curriculum/MAT.rdf")).unwrap();

    let result = MarkdownRenderer::new(fs, RenderSettings::default())
        .unwrap()
        .render(service.curriculum(), Path::new("/site"));

    match result {
        Err(ApplicationError::OperationFailed { context, .. }) => {
            assert!(context.contains("/site/Mathematics/"), "context: {context}");
        }
        other => panic!("expected operation failure, got {:?}", other),
    }
}
