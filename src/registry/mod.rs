//! Library registry
//!
//! Process-wide list of known library root paths plus a slug → path index,
//! persisted in the settings store. The registry tracks *intent*, not
//! validity: no file-existence check happens on register or unregister, and a
//! dangling path is skipped by consumers when its metadata cannot be read.
//!
//! Every operation funnels paths through [`paths::normalize_path`] and
//! compares with [`paths::paths_equal`], so registration, membership checks
//! and removal always agree on separators and case.

use std::collections::BTreeMap;

use crate::paths;
use crate::settings::SettingsStore;
use crate::store::Result;

const LIBRARY_PATHS_KEY: &str = "libraryPaths";
const SLUG_INDEX_KEY: &str = "slugIndex";

/// Registry of library roots backed by a [`SettingsStore`].
pub struct LibraryRegistry {
    store: SettingsStore,
}

impl LibraryRegistry {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    /// All registered library root paths, in registration order.
    pub fn paths(&self) -> Vec<String> {
        self.store
            .get::<Vec<String>>(LIBRARY_PATHS_KEY)
            .unwrap_or_default()
    }

    fn slug_index(&self) -> BTreeMap<String, String> {
        self.store
            .get::<BTreeMap<String, String>>(SLUG_INDEX_KEY)
            .unwrap_or_default()
    }

    /// Register a library root under the given slug.
    ///
    /// No-ops on the path list if an equal path is already present. On a slug
    /// collision the newest registration wins; uniqueness is the caller's
    /// concern.
    pub fn register(&mut self, path: &str, slug: &str) -> Result<()> {
        let normalized = paths::normalize_path(path);

        let mut known = self.paths();
        if !known.iter().any(|p| paths::paths_equal(p, &normalized)) {
            known.push(normalized.clone());
            self.store.set(LIBRARY_PATHS_KEY, &known)?;
        }

        let mut index = self.slug_index();
        if index.get(slug) != Some(&normalized) {
            index.insert(slug.to_string(), normalized.clone());
            self.store.set(SLUG_INDEX_KEY, &index)?;
        }

        log::info!("Registered library path {}", normalized);
        Ok(())
    }

    /// Remove a library root from the path list and drop every slug entry
    /// that points at it.
    pub fn unregister(&mut self, path: &str) -> Result<()> {
        let normalized = paths::normalize_path(path);

        let mut known = self.paths();
        known.retain(|p| !paths::paths_equal(p, &normalized));
        self.store.set(LIBRARY_PATHS_KEY, &known)?;

        let mut index = self.slug_index();
        index.retain(|_, target| !paths::paths_equal(target, &normalized));
        self.store.set(SLUG_INDEX_KEY, &index)?;

        log::info!("Unregistered library path {}", normalized);
        Ok(())
    }

    /// Resolve a library slug to its registered root path.
    pub fn resolve_slug(&self, slug: &str) -> Option<String> {
        self.slug_index().get(slug).cloned()
    }

    /// Whether a path is registered (by normalized-path equality).
    pub fn exists(&self, path: &str) -> bool {
        self.paths().iter().any(|p| paths::paths_equal(p, path))
    }
}
