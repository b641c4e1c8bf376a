//! Data models for study modules
//!
//! A module is a directory under a library root whose name is the module's
//! slug. Everything the engine manages lives in a reserved `.mod`
//! subdirectory; the module root itself holds the user's source files.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::paths;

/// Reserved marker subdirectory holding a module's managed data.
pub const MODULE_DIR: &str = ".mod";
pub const MODULE_META_FILE: &str = "meta.json";
pub const MODULE_STATS_FILE: &str = "stats.json";
pub const QUIZZES_DIR: &str = "quizzes";
pub const SUBMISSIONS_DIR: &str = "submissions";

/// Module metadata, stored at `<module>/.mod/meta.json`.
///
/// The logical identifier is derived from `(slug, created_at)` and can be
/// recomputed from this file alone; editing either stored field changes the
/// identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetadata {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub overview: String,
    /// Owning library's slug.
    pub library_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Module directory, stored with normalized separators.
    pub path: String,
}

impl ModuleMetadata {
    pub fn new(library_id: String, title: String, overview: String, path: &str) -> Self {
        let now = Utc::now();
        let slug = paths::slugify(&title);
        Self {
            id: paths::derive_module_id(&slug, now),
            title,
            slug,
            overview,
            library_id,
            created_at: now,
            updated_at: now,
            path: paths::normalize_path(path),
        }
    }

    /// Recompute the derived identifier from the stored slug and timestamp.
    pub fn derived_id(&self) -> String {
        paths::derive_module_id(&self.slug, self.created_at)
    }
}

/// Review statistics, stored at `<module>/.mod/stats.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleStats {
    pub module_id: String,
    /// Leitner box, 1..=5.
    pub current_box: u8,
    /// When the schedule was last advanced by a graded submission.
    #[serde(default)]
    pub last_review_date: Option<DateTime<Utc>>,
    pub next_review_date: DateTime<Utc>,
}

impl ModuleStats {
    /// Stats for a module that has never been reviewed: box 1, due now.
    pub fn new(module_id: String) -> Self {
        Self {
            module_id,
            current_box: 1,
            last_review_date: None,
            next_review_date: Utc::now(),
        }
    }
}

/// On-disk stats, current or legacy shape.
///
/// Older installations stored `{lastReviewDate, nextDueDate}`; current files
/// use `nextReviewDate`. Reads accept both and normalize into [`ModuleStats`];
/// writes always emit the current shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StatsOnDisk {
    #[serde(rename_all = "camelCase")]
    Current {
        module_id: String,
        current_box: u8,
        #[serde(default)]
        last_review_date: Option<DateTime<Utc>>,
        next_review_date: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Legacy {
        module_id: String,
        current_box: u8,
        #[serde(default)]
        last_review_date: Option<DateTime<Utc>>,
        next_due_date: DateTime<Utc>,
    },
}

impl From<StatsOnDisk> for ModuleStats {
    fn from(disk: StatsOnDisk) -> Self {
        match disk {
            StatsOnDisk::Current {
                module_id,
                current_box,
                last_review_date,
                next_review_date,
            } => Self {
                module_id,
                current_box: current_box.clamp(1, 5),
                last_review_date,
                next_review_date,
            },
            StatsOnDisk::Legacy {
                module_id,
                current_box,
                last_review_date,
                next_due_date,
            } => Self {
                module_id,
                current_box: current_box.clamp(1, 5),
                last_review_date,
                next_review_date: next_due_date,
            },
        }
    }
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    /// Empty for open-ended questions.
    #[serde(default)]
    pub choices: Vec<String>,
    pub answer: String,
}

/// A quiz, stored at `<module>/.mod/quizzes/<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    /// Seconds; 0 means unlimited.
    #[serde(default)]
    pub time_limit: u64,
    /// Reference strings naming the source material the quiz was built from.
    #[serde(default)]
    pub sources: Vec<String>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(title: String, time_limit: u64, sources: Vec<String>, questions: Vec<Question>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            time_limit,
            sources,
            questions,
            created_at: Utc::now(),
        }
    }
}

/// Grading state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionStatus {
    Pending,
    Graded,
}

/// One answer within a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_index: usize,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// A quiz attempt, stored at
/// `<module>/.mod/submissions/<quizId>-<attempt>.json`.
///
/// `attempt_number` is 1-based and assigned by the caller; together with
/// `quiz_id` it is the submission's identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub quiz_id: Uuid,
    pub attempt_number: u32,
    pub quiz_title: String,
    pub library_id: String,
    pub module_slug: String,
    pub completed_at: DateTime<Utc>,
    /// Seconds spent.
    #[serde(default)]
    pub time_elapsed: u64,
    /// Seconds allowed; 0 means unlimited.
    #[serde(default)]
    pub time_limit: u64,
    pub status: SubmissionStatus,
    /// 0..=100, present once graded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_grade: Option<String>,
    #[serde(default)]
    pub responses: Vec<Response>,
}

/// Full in-memory assembly of one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAggregate {
    pub metadata: ModuleMetadata,
    pub stats: ModuleStats,
    /// Source files in the module root (managed by copy/delete, never by
    /// aggregate writes).
    pub sources: Vec<PathBuf>,
    pub quizzes: Vec<Quiz>,
    pub submissions: Vec<Submission>,
}

/// Lightweight projection used to enumerate modules without loading
/// aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOverview {
    pub id: String,
    pub slug: String,
    pub display_name: String,
    pub library_slug: String,
}
