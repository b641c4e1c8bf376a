//! Library management: models and file-backed CRUD.

pub mod models;
pub mod storage;

pub use models::{Library, LIBRARY_DIR, LIBRARY_META_FILE};
pub use storage::{LibraryError, LibraryStorage};
