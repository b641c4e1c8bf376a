//! Durable JSON store
//!
//! Low-level primitives shared by the library and module layers: typed JSON
//! reads with a `NotFound` / `Corrupt` / `Io` taxonomy, pretty-printed writes
//! that go through a temp file and rename (so a crash cannot leave a
//! truncated file behind), single-level glob listings and recursive removal.
//!
//! Everything on disk is UTF-8 JSON with 2-space indentation; users are
//! expected to browse and occasionally hand-edit their library folders.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Corrupt file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Create a directory and its parent chain. Idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Read and deserialize a JSON file.
///
/// An absent file is `NotFound`; a file that exists but does not parse into
/// `T` is `Corrupt`; anything else surfaces as `Io`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty-printed JSON and write it to `path`.
///
/// The parent directory is created if missing. The bytes go to a sibling
/// `.tmp` file first and are renamed over the target, so readers see either
/// the old content or the new content, never a partial write.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = tmp_sibling(path);
    fs::write(&tmp, content)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// List files in `dir` matching a glob pattern, e.g. `*.json`.
///
/// Single level only (no recursion). An absent directory yields an empty
/// list rather than an error.
pub fn list_matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let full = dir.join(pattern);
    let full = full.to_string_lossy();
    let entries = glob::glob(&full)
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => return Err(StoreError::Io(e.into_error())),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Remove a directory tree. Ok when the path is already gone.
pub fn remove_tree(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_dir_all(path)?;
    Ok(())
}
