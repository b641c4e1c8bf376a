//! Library data models
//!
//! A library is a user-chosen root directory grouping study modules. Its
//! metadata lives in a reserved `.lib` subdirectory so the rest of the root
//! stays free for module directories.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paths;

/// Reserved subdirectory holding a library's own metadata.
pub const LIBRARY_DIR: &str = ".lib";

/// Metadata file name inside [`LIBRARY_DIR`].
pub const LIBRARY_META_FILE: &str = "meta.json";

/// A registered study library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Root directory, stored with normalized separators.
    pub path: String,

    /// Display name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Public identifier, derived from the name.
    pub slug: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Library {
    /// Create library metadata for a root path. The slug is derived from the
    /// name and becomes the library's public identifier.
    pub fn new(path: &str, name: String, description: String) -> Self {
        Self {
            path: paths::normalize_path(path),
            slug: paths::slugify(&name),
            name,
            description,
            created_at: Utc::now(),
        }
    }

    /// The library root as a filesystem path.
    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Location of the metadata file under an arbitrary root.
    pub fn meta_path_for(root: &std::path::Path) -> PathBuf {
        root.join(LIBRARY_DIR).join(LIBRARY_META_FILE)
    }

    /// Location of this library's metadata file.
    pub fn meta_path(&self) -> PathBuf {
        Self::meta_path_for(&self.root())
    }
}
