//! Library storage operations
//!
//! CRUD over per-library metadata files, built on the registry and the JSON
//! store. Each library keeps its own `.lib/meta.json` under its root; the
//! registry only knows root paths and slugs.

use std::path::Path;

use crate::registry::LibraryRegistry;
use crate::store::{self, StoreError};

use super::models::{Library, LIBRARY_DIR};

/// Error type for library operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("Library path already registered: {0}")]
    PathAlreadyRegistered(String),
}

pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library metadata CRUD over the registry and JSON store.
pub struct LibraryStorage {
    registry: LibraryRegistry,
}

impl LibraryStorage {
    pub fn new(registry: LibraryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    /// Create a library at `path` and register it.
    ///
    /// Ensures the root and its `.lib` subdirectory exist, writes the
    /// metadata file with a freshly derived slug, then registers the path.
    pub fn create(&mut self, path: &str, name: String, description: String) -> Result<Library> {
        if self.registry.exists(path) {
            return Err(LibraryError::PathAlreadyRegistered(path.to_string()));
        }

        let library = Library::new(path, name, description);
        store::ensure_dir(&library.root().join(LIBRARY_DIR))?;
        store::write_json(&library.meta_path(), &library)?;

        self.registry.register(&library.path, &library.slug)?;

        log::info!("Created library '{}' at {}", library.name, library.path);
        Ok(library)
    }

    /// Read a library's metadata by slug.
    pub fn get(&self, slug: &str) -> Result<Library> {
        let path = self
            .registry
            .resolve_slug(slug)
            .ok_or_else(|| LibraryError::LibraryNotFound(slug.to_string()))?;
        Ok(store::read_json(&Library::meta_path_for(Path::new(&path)))?)
    }

    /// List every registered library whose metadata loads.
    ///
    /// Collect-and-skip: a registered path whose metadata file is missing or
    /// corrupt is logged and excluded; one broken library never aborts the
    /// listing.
    pub fn list(&self) -> Vec<Library> {
        let mut libraries = Vec::new();
        for path in self.registry.paths() {
            match store::read_json::<Library>(&Library::meta_path_for(Path::new(&path))) {
                Ok(library) => libraries.push(library),
                Err(e) => {
                    log::warn!("Skipping library at {}: {}", path, e);
                }
            }
        }
        libraries
    }

    /// Delete a library: unregister its path, then remove the directory tree.
    ///
    /// The unregister must succeed before anything is removed, so a failed
    /// unregister never leaves an orphaned deletion.
    pub fn delete(&mut self, slug: &str) -> Result<()> {
        let path = self
            .registry
            .resolve_slug(slug)
            .ok_or_else(|| LibraryError::LibraryNotFound(slug.to_string()))?;

        self.registry.unregister(&path)?;
        store::remove_tree(Path::new(&path))?;

        log::info!("Deleted library '{}' at {}", slug, path);
        Ok(())
    }
}
