//! Practice feed
//!
//! Orchestrates discovery, module storage and the scheduler: produces the
//! globally due, priority-sorted module list, and advances a module's
//! schedule after a graded submission.

use std::cmp::Ordering;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::library::LibraryStorage;
use crate::module::storage::{self as module_storage, ModuleError, Result};
use crate::module::{discovery, ModuleAggregate, Submission, SubmissionStatus};
use crate::scheduler;

/// Minimum grade (0..=100) that counts as a pass.
pub const PASSING_GRADE: u8 = 60;

/// A due module with its computed review priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueModule {
    pub module: ModuleAggregate,
    pub priority: f64,
}

/// Collect every due module across all registered libraries, sorted by
/// descending priority.
///
/// Collect-and-skip throughout: a library whose metadata or scan fails, or a
/// module whose aggregate fails to load, is logged and excluded. This call
/// never fails wholesale because one entry is broken.
pub fn due_modules(libraries: &LibraryStorage) -> Vec<DueModule> {
    let now = Utc::now();
    let mut due = Vec::new();

    for library in libraries.list() {
        let overviews = match discovery::module_overviews(libraries, &library.slug) {
            Ok(overviews) => overviews,
            Err(e) => {
                log::warn!("Skipping library '{}' in practice feed: {}", library.slug, e);
                continue;
            }
        };

        for overview in overviews {
            let module_path = library.root().join(&overview.slug);
            let aggregate = match module_storage::read_aggregate(&module_path) {
                Ok(aggregate) => aggregate,
                Err(e) => {
                    log::warn!(
                        "Skipping module '{}' in practice feed: {}",
                        overview.slug,
                        e
                    );
                    continue;
                }
            };

            if aggregate.stats.next_review_date <= now {
                let priority = scheduler::priority(Some(&aggregate.stats), now);
                due.push(DueModule {
                    module: aggregate,
                    priority,
                });
            }
        }
    }

    // Stable sort keeps arrival order among exact ties.
    due.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(Ordering::Equal)
    });
    due
}

/// Advance a module's review schedule from a graded submission.
///
/// Returns `Ok(false)` without touching anything when the submission is not
/// graded, carries no grade, or is stale (its `completed_at` is not strictly
/// newer than the stats' last recorded review). Otherwise the Leitner box is
/// advanced (pass means `grade >= PASSING_GRADE`), the new stats are
/// persisted and `Ok(true)` is returned.
pub fn update_review_schedule(
    libraries: &LibraryStorage,
    library_id: &str,
    module_id: &str,
    submission: &Submission,
) -> Result<bool> {
    if submission.status != SubmissionStatus::Graded {
        return Ok(false);
    }
    let Some(grade) = submission.grade else {
        return Ok(false);
    };

    let module_path = discovery::resolve_module_path(libraries, library_id, module_id)?
        .ok_or_else(|| ModuleError::ModuleNotFound(module_id.to_string()))?;

    let metadata = module_storage::read_metadata(&module_path)?;
    let stats = module_storage::read_stats(&module_path, &metadata.id)?;

    // Guard against duplicate or out-of-order grading calls rewinding the
    // schedule.
    if let Some(last) = stats.last_review_date {
        if submission.completed_at <= last {
            log::info!(
                "Ignoring stale submission for module '{}' (completed {} <= last review {})",
                module_id,
                submission.completed_at,
                last
            );
            return Ok(false);
        }
    }

    let passed = grade >= PASSING_GRADE;
    let mut advanced = scheduler::advance(&stats, passed, Utc::now());
    advanced.last_review_date = Some(submission.completed_at);
    module_storage::write_stats(&module_path, &advanced)?;

    log::info!(
        "Module '{}' {} (grade {}): box {} -> {}, next review {}",
        module_id,
        if passed { "passed" } else { "failed" },
        grade,
        stats.current_box,
        advanced.current_box,
        advanced.next_review_date
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::storage::{create_module, read_stats, write_stats};
    use crate::module::{ModuleMetadata, Response};
    use crate::registry::LibraryRegistry;
    use crate::settings::SettingsStore;
    use chrono::{DateTime, Duration, Utc};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn library_with_storage(dir: &TempDir) -> (LibraryStorage, PathBuf) {
        let settings = SettingsStore::load(dir.path()).unwrap();
        let mut libs = LibraryStorage::new(LibraryRegistry::new(settings));
        let root = dir.path().join("study-root");
        libs.create(
            &root.to_string_lossy(),
            "Study".to_string(),
            String::new(),
        )
        .unwrap();
        (libs, root)
    }

    fn graded_submission(meta: &ModuleMetadata, grade: u8, completed_at: DateTime<Utc>) -> Submission {
        Submission {
            quiz_id: Uuid::new_v4(),
            attempt_number: 1,
            quiz_title: "Quiz".to_string(),
            library_id: meta.library_id.clone(),
            module_slug: meta.slug.clone(),
            completed_at,
            time_elapsed: 60,
            time_limit: 0,
            status: SubmissionStatus::Graded,
            grade: Some(grade),
            letter_grade: None,
            responses: vec![Response {
                question_index: 0,
                answer: "4".to_string(),
                correct: Some(grade >= PASSING_GRADE),
                feedback: None,
            }],
        }
    }

    #[test]
    fn test_due_modules_filters_and_sorts_by_priority() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);
        let now = Utc::now();

        let fresh = create_module(&root, "study", "Fresh", "").unwrap();
        let overdue = create_module(&root, "study", "Overdue", "").unwrap();
        let future = create_module(&root, "study", "Future", "").unwrap();

        let mut stats = read_stats(&root.join("overdue"), &overdue.id).unwrap();
        stats.next_review_date = now - Duration::days(3);
        write_stats(&root.join("overdue"), &stats).unwrap();

        let mut stats = read_stats(&root.join("future"), &future.id).unwrap();
        stats.next_review_date = now + Duration::days(3);
        write_stats(&root.join("future"), &stats).unwrap();

        let due = due_modules(&libs);
        let slugs: Vec<&str> = due.iter().map(|d| d.module.metadata.slug.as_str()).collect();

        assert_eq!(slugs, vec!["overdue", "fresh"]);
        assert!(due[0].priority > due[1].priority);
        assert_eq!(due[1].module.metadata.id, fresh.id);
        for entry in &due {
            assert!(entry.module.stats.next_review_date <= Utc::now());
        }
    }

    #[test]
    fn test_due_modules_skips_broken_entries() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);

        create_module(&root, "study", "Good", "").unwrap();
        create_module(&root, "study", "Broken", "").unwrap();
        std::fs::write(root.join("broken").join(".mod").join("meta.json"), "{ bad").unwrap();

        let due = due_modules(&libs);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].module.metadata.slug, "good");
    }

    #[test]
    fn test_passing_grade_advances_box() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);
        let meta = create_module(&root, "study", "Algebra", "").unwrap();

        let submission = graded_submission(&meta, 75, Utc::now());
        let applied =
            update_review_schedule(&libs, "study", &meta.id, &submission).unwrap();
        assert!(applied);

        let stats = read_stats(&root.join("algebra"), &meta.id).unwrap();
        assert_eq!(stats.current_box, 2);
        assert_eq!(stats.last_review_date, Some(submission.completed_at));
        assert!(stats.next_review_date > Utc::now() + Duration::days(1));
    }

    #[test]
    fn test_failing_grade_resets_to_box_one() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);
        let meta = create_module(&root, "study", "Algebra", "").unwrap();
        let module_path = root.join("algebra");

        let mut stats = read_stats(&module_path, &meta.id).unwrap();
        stats.current_box = 4;
        write_stats(&module_path, &stats).unwrap();

        let applied = update_review_schedule(
            &libs,
            "study",
            &meta.id,
            &graded_submission(&meta, 40, Utc::now()),
        )
        .unwrap();
        assert!(applied);

        assert_eq!(read_stats(&module_path, &meta.id).unwrap().current_box, 1);
    }

    #[test]
    fn test_threshold_grade_is_a_pass() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);
        let meta = create_module(&root, "study", "Algebra", "").unwrap();

        update_review_schedule(
            &libs,
            "study",
            &meta.id,
            &graded_submission(&meta, PASSING_GRADE, Utc::now()),
        )
        .unwrap();

        assert_eq!(
            read_stats(&root.join("algebra"), &meta.id).unwrap().current_box,
            2
        );
    }

    #[test]
    fn test_ungraded_submission_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);
        let meta = create_module(&root, "study", "Algebra", "").unwrap();

        let mut pending = graded_submission(&meta, 90, Utc::now());
        pending.status = SubmissionStatus::Pending;
        assert!(!update_review_schedule(&libs, "study", &meta.id, &pending).unwrap());

        let mut gradeless = graded_submission(&meta, 90, Utc::now());
        gradeless.grade = None;
        assert!(!update_review_schedule(&libs, "study", &meta.id, &gradeless).unwrap());

        assert_eq!(
            read_stats(&root.join("algebra"), &meta.id).unwrap().current_box,
            1
        );
    }

    #[test]
    fn test_stale_submission_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let (libs, root) = library_with_storage(&dir);
        let meta = create_module(&root, "study", "Algebra", "").unwrap();
        let module_path = root.join("algebra");

        let now = Utc::now();
        update_review_schedule(&libs, "study", &meta.id, &graded_submission(&meta, 80, now))
            .unwrap();
        let after_first = read_stats(&module_path, &meta.id).unwrap();

        // Same timestamp: not strictly newer, must not apply.
        assert!(!update_review_schedule(
            &libs,
            "study",
            &meta.id,
            &graded_submission(&meta, 80, now)
        )
        .unwrap());

        // Older timestamp: must not rewind.
        assert!(!update_review_schedule(
            &libs,
            "study",
            &meta.id,
            &graded_submission(&meta, 20, now - Duration::hours(1))
        )
        .unwrap());

        assert_eq!(read_stats(&module_path, &meta.id).unwrap(), after_first);
    }

    #[test]
    fn test_unknown_module_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (libs, _root) = library_with_storage(&dir);

        let meta = ModuleMetadata::new(
            "study".to_string(),
            "Ghost".to_string(),
            String::new(),
            "/nowhere/ghost",
        );
        assert!(matches!(
            update_review_schedule(
                &libs,
                "study",
                "no-such-id",
                &graded_submission(&meta, 80, Utc::now())
            ),
            Err(ModuleError::ModuleNotFound(_))
        ));
    }
}
