//! Storage operations for modules
//!
//! Directory structure per module (the directory name is the module's slug):
//! ```text
//! <library>/<slug>/
//! ├── .mod/
//! │   ├── meta.json                        # ModuleMetadata
//! │   ├── stats.json                       # ModuleStats
//! │   ├── quizzes/{quiz-id}.json           # one file per quiz
//! │   └── submissions/{quiz-id}-{n}.json   # one file per attempt
//! └── *.{txt,pdf,...}                      # source files, module root
//! ```
//!
//! Source files are managed only by [`copy_source_file`] / [`delete_source_file`];
//! aggregate writes never touch them, so saving a metadata edit can never
//! delete uploaded content.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::library::storage::LibraryError;
use crate::paths;
use crate::store::{self, StoreError};

use super::models::*;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module already exists: {0}")]
    ModuleAlreadyExists(String),

    #[error("Quiz not found: {0}")]
    QuizNotFound(Uuid),

    #[error("Submission not found: quiz {quiz_id} attempt {attempt}")]
    SubmissionNotFound { quiz_id: Uuid, attempt: u32 },
}

impl From<LibraryError> for ModuleError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::LibraryNotFound(slug) => Self::LibraryNotFound(slug),
            LibraryError::PathAlreadyRegistered(path) => Self::LibraryNotFound(path),
            LibraryError::Store(e) => Self::Store(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModuleError>;

fn mod_dir(module_path: &Path) -> PathBuf {
    module_path.join(MODULE_DIR)
}

fn meta_path(module_path: &Path) -> PathBuf {
    mod_dir(module_path).join(MODULE_META_FILE)
}

fn stats_path(module_path: &Path) -> PathBuf {
    mod_dir(module_path).join(MODULE_STATS_FILE)
}

fn quizzes_dir(module_path: &Path) -> PathBuf {
    mod_dir(module_path).join(QUIZZES_DIR)
}

fn submissions_dir(module_path: &Path) -> PathBuf {
    mod_dir(module_path).join(SUBMISSIONS_DIR)
}

fn quiz_path(module_path: &Path, quiz_id: Uuid) -> PathBuf {
    quizzes_dir(module_path).join(format!("{}.json", quiz_id))
}

fn submission_path(module_path: &Path, quiz_id: Uuid, attempt: u32) -> PathBuf {
    submissions_dir(module_path).join(format!("{}-{}.json", quiz_id, attempt))
}

/// Create a module directory under a library root and write its initial
/// metadata and stats (box 1, due immediately).
pub fn create_module(
    library_root: &Path,
    library_id: &str,
    title: &str,
    overview: &str,
) -> Result<ModuleMetadata> {
    let slug = paths::slugify(title);
    let module_path = library_root.join(&slug);

    if mod_dir(&module_path).exists() {
        return Err(ModuleError::ModuleAlreadyExists(slug));
    }

    store::ensure_dir(&quizzes_dir(&module_path))?;
    store::ensure_dir(&submissions_dir(&module_path))?;

    let metadata = ModuleMetadata::new(
        library_id.to_string(),
        title.to_string(),
        overview.to_string(),
        &module_path.to_string_lossy(),
    );
    store::write_json(&meta_path(&module_path), &metadata)?;
    store::write_json(
        &stats_path(&module_path),
        &ModuleStats::new(metadata.id.clone()),
    )?;

    log::info!("Created module '{}' in library '{}'", slug, library_id);
    Ok(metadata)
}

/// Remove a module directory tree. Idempotent on a missing path.
pub fn delete_module(module_path: &Path) -> Result<()> {
    store::remove_tree(module_path)?;
    log::info!("Deleted module at {}", module_path.display());
    Ok(())
}

// ==================== Metadata & Stats ====================

pub fn read_metadata(module_path: &Path) -> Result<ModuleMetadata> {
    match store::read_json(&meta_path(module_path)) {
        Ok(metadata) => Ok(metadata),
        Err(StoreError::NotFound(_)) => Err(ModuleError::ModuleNotFound(
            module_path.display().to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn write_metadata(module_path: &Path, metadata: &ModuleMetadata) -> Result<()> {
    store::write_json(&meta_path(module_path), metadata)?;
    Ok(())
}

/// Read module stats, tolerating the legacy `{lastReviewDate, nextDueDate}`
/// shape. A missing stats file yields the first-access default: box 1, due
/// now.
pub fn read_stats(module_path: &Path, module_id: &str) -> Result<ModuleStats> {
    match store::read_json::<StatsOnDisk>(&stats_path(module_path)) {
        Ok(disk) => Ok(disk.into()),
        Err(StoreError::NotFound(_)) => Ok(ModuleStats::new(module_id.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Write module stats, always in the current shape.
pub fn write_stats(module_path: &Path, stats: &ModuleStats) -> Result<()> {
    store::write_json(&stats_path(module_path), stats)?;
    Ok(())
}

// ==================== Aggregate ====================

/// Load a module's full aggregate.
///
/// Metadata is read first and any failure there fails the read. Missing
/// quizzes/submissions directories yield empty lists (first access may
/// predate them), but a corrupt individual quiz or submission file fails the
/// whole read.
pub fn read_aggregate(module_path: &Path) -> Result<ModuleAggregate> {
    let metadata = read_metadata(module_path)?;

    let mut quizzes = Vec::new();
    for path in store::list_matching(&quizzes_dir(module_path), "*.json")? {
        quizzes.push(store::read_json::<Quiz>(&path)?);
    }

    let mut submissions = Vec::new();
    for path in store::list_matching(&submissions_dir(module_path), "*.json")? {
        submissions.push(store::read_json::<Submission>(&path)?);
    }

    let sources = list_source_files(module_path)?;
    let stats = read_stats(module_path, &metadata.id)?;

    Ok(ModuleAggregate {
        metadata,
        stats,
        sources,
        quizzes,
        submissions,
    })
}

/// Persist a module aggregate: metadata plus every quiz and submission, each
/// in its own file. Source files and stats are managed by their own
/// operations and are deliberately not written here.
pub fn write_aggregate(module_path: &Path, module: &ModuleAggregate) -> Result<()> {
    store::ensure_dir(&quizzes_dir(module_path))?;
    store::ensure_dir(&submissions_dir(module_path))?;

    write_metadata(module_path, &module.metadata)?;
    for quiz in &module.quizzes {
        write_quiz(module_path, quiz)?;
    }
    for submission in &module.submissions {
        write_submission(module_path, submission)?;
    }
    Ok(())
}

/// Source files in the module root: plain files only, dotfiles and the
/// `.mod` directory excluded.
pub fn list_source_files(module_path: &Path) -> Result<Vec<PathBuf>> {
    if !module_path.exists() {
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(module_path).map_err(StoreError::Io)? {
        let entry = entry.map_err(StoreError::Io)?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_file() && !hidden {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

// ==================== Quizzes ====================

pub fn read_quiz(module_path: &Path, quiz_id: Uuid) -> Result<Quiz> {
    match store::read_json(&quiz_path(module_path, quiz_id)) {
        Ok(quiz) => Ok(quiz),
        Err(StoreError::NotFound(_)) => Err(ModuleError::QuizNotFound(quiz_id)),
        Err(e) => Err(e.into()),
    }
}

pub fn write_quiz(module_path: &Path, quiz: &Quiz) -> Result<()> {
    store::write_json(&quiz_path(module_path, quiz.id), quiz)?;
    Ok(())
}

pub fn delete_quiz(module_path: &Path, quiz_id: Uuid) -> Result<()> {
    let path = quiz_path(module_path, quiz_id);
    if !path.exists() {
        return Err(ModuleError::QuizNotFound(quiz_id));
    }
    fs::remove_file(&path).map_err(StoreError::Io)?;
    Ok(())
}

// ==================== Submissions ====================

pub fn read_submission(module_path: &Path, quiz_id: Uuid, attempt: u32) -> Result<Submission> {
    match store::read_json(&submission_path(module_path, quiz_id, attempt)) {
        Ok(submission) => Ok(submission),
        Err(StoreError::NotFound(_)) => {
            Err(ModuleError::SubmissionNotFound { quiz_id, attempt })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn write_submission(module_path: &Path, submission: &Submission) -> Result<()> {
    store::write_json(
        &submission_path(module_path, submission.quiz_id, submission.attempt_number),
        submission,
    )?;
    Ok(())
}

/// Number of stored attempts for a quiz. An absent submissions directory
/// counts as zero.
pub fn count_attempts(module_path: &Path, quiz_id: Uuid) -> Result<u32> {
    let pattern = format!("{}-*.json", quiz_id);
    let files = store::list_matching(&submissions_dir(module_path), &pattern)?;
    Ok(files.len() as u32)
}

// ==================== Source files ====================

/// Copy an external file into the module root. Returns the new path.
/// Failures propagate as plain IO errors.
pub fn copy_source_file(module_path: &Path, source_file: &Path) -> Result<PathBuf> {
    let file_name = source_file.file_name().ok_or_else(|| {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "source file has no file name",
        ))
    })?;
    store::ensure_dir(module_path)?;

    let dest = module_path.join(file_name);
    fs::copy(source_file, &dest).map_err(StoreError::Io)?;
    Ok(dest)
}

/// Delete a source file. Failures propagate as plain IO errors.
pub fn delete_source_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(StoreError::Io)?;
    Ok(())
}
