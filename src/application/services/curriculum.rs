//! Curriculum loading service
//!
//! Owns the merged triple store and the curriculum model. Each file is parsed,
//! merged, built and committed as one step; a failure undoes the merge.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::application::services::builder::TreeBuilder;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::LoadSettings;
use crate::domain::{Curriculum, SourceFile};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::RdfStore;

const RDF_EXTENSIONS: [&str; 2] = ["rdf", "xml"];

/// Service accumulating learning areas from RDF/XML files.
pub struct CurriculumService {
    fs: Arc<dyn FileSystem>,
    settings: LoadSettings,
    store: RdfStore,
    curriculum: Curriculum,
}

impl CurriculumService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: LoadSettings) -> Self {
        Self {
            fs,
            settings,
            store: RdfStore::new(),
            curriculum: Curriculum::new(),
        }
    }

    /// Load one file and attach its learning areas.
    ///
    /// On error neither the curriculum nor the merged store is changed.
    #[instrument(level = "debug", skip(self))]
    pub fn add_file(&mut self, path: &Path) -> ApplicationResult<&SourceFile> {
        let file_store = RdfStore::load(self.fs.as_ref(), path)?;
        let added = self.store.merge(&file_store);
        debug!("merged {} new triples", added.len());

        let result = self.build_and_commit(path, &file_store);
        if let Err(e) = result {
            self.store.retract(&added);
            return Err(e);
        }

        let source = self
            .curriculum
            .files()
            .last()
            .ok_or_else(|| ApplicationError::OperationFailed {
                context: format!("record source file {}", path.display()),
                source: "no source file recorded after commit".into(),
            })?;
        info!(
            "loaded {}: {} learning area(s)",
            path.display(),
            source.learning_areas.len()
        );
        Ok(source)
    }

    fn build_and_commit(&mut self, path: &Path, file_store: &RdfStore) -> ApplicationResult<()> {
        let build = TreeBuilder::new(&self.store, &self.settings).build(file_store)?;
        let source = SourceFile {
            path: path.to_path_buf(),
            root: build.root,
            learning_areas: build
                .learning_areas
                .iter()
                .map(|la| la.meta.title.clone())
                .collect(),
        };
        self.curriculum
            .commit(source, build.learning_areas, self.settings.duplicate_keys)?;
        Ok(())
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Every triple merged so far.
    pub fn store(&self) -> &RdfStore {
        &self.store
    }

    pub fn into_curriculum(self) -> Curriculum {
        self.curriculum
    }
}

/// Expand directories to the RDF/XML files they contain, sorted by name.
///
/// Plain paths are passed through untouched so a missing file is reported
/// by the load itself.
pub fn expand_inputs(paths: &[PathBuf]) -> ApplicationResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::OperationFailed {
                context: format!("scan {}", path.display()),
                source: Box::new(e),
            })?;
            if entry.file_type().is_file() && is_rdf_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn is_rdf_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RDF_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
