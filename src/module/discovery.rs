//! Module discovery
//!
//! Maps `(library, module)` identifier pairs to physical directories without
//! a central index. Every lookup re-reads candidate metadata and recomputes
//! the derived identifier, so manual renames and hand edits are tolerated at
//! the cost of a linear scan per call. There is deliberately no cache.

use std::fs;
use std::path::{Path, PathBuf};

use crate::library::LibraryStorage;
use crate::store::StoreError;

use super::models::{ModuleMetadata, ModuleOverview, MODULE_DIR};
use super::storage::{ModuleError, Result};

/// Find all first-level subdirectories of a library root that carry the
/// `.mod` marker. Flat scan; nested libraries are not supported.
pub fn scan_library_module_paths(library_root: &Path) -> Result<Vec<PathBuf>> {
    if !library_root.exists() {
        return Ok(Vec::new());
    }

    let mut module_paths = Vec::new();
    for entry in fs::read_dir(library_root).map_err(StoreError::Io)? {
        let entry = entry.map_err(StoreError::Io)?;
        let path = entry.path();
        if path.is_dir() && path.join(MODULE_DIR).is_dir() {
            module_paths.push(path);
        }
    }
    module_paths.sort();
    Ok(module_paths)
}

/// Resolve a module identifier to its directory within a library.
///
/// Scans the library root and, for each candidate, re-reads the metadata and
/// recomputes the id from `(slug, createdAt)`; the first match wins. Returns
/// `Ok(None)` when no module matches. Candidates whose metadata cannot be
/// read are logged and skipped.
pub fn resolve_module_path(
    libraries: &LibraryStorage,
    library_id: &str,
    module_id: &str,
) -> Result<Option<PathBuf>> {
    let library = libraries.get(library_id)?;

    for module_path in scan_library_module_paths(&library.root())? {
        match read_candidate(&module_path) {
            Some(metadata) if metadata.derived_id() == module_id => {
                return Ok(Some(module_path));
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Enumerate a library's modules as lightweight overviews, without loading
/// full aggregates. Unreadable candidates are logged and skipped.
pub fn module_overviews(libraries: &LibraryStorage, library_id: &str) -> Result<Vec<ModuleOverview>> {
    let library = libraries.get(library_id)?;

    let mut overviews = Vec::new();
    for module_path in scan_library_module_paths(&library.root())? {
        if let Some(metadata) = read_candidate(&module_path) {
            overviews.push(ModuleOverview {
                id: metadata.derived_id(),
                slug: metadata.slug,
                display_name: metadata.title,
                library_slug: library.slug.clone(),
            });
        }
    }
    Ok(overviews)
}

fn read_candidate(module_path: &Path) -> Option<ModuleMetadata> {
    match super::storage::read_metadata(module_path) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            log::warn!(
                "Skipping module candidate {}: {}",
                module_path.display(),
                e
            );
            None
        }
    }
}
