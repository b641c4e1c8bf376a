//! studium — personal study library engine
//!
//! File-system-backed storage and Leitner-box review scheduling for study
//! material organized as libraries of modules. Everything lives in plain
//! JSON files under user-chosen directories, addressed by human-meaningful
//! slugs; there is no database and no central index. On-disk layout:
//!
//! ```text
//! <library>/.lib/meta.json                       library metadata
//! <library>/<module-slug>/.mod/meta.json         module metadata
//! <library>/<module-slug>/.mod/stats.json        review statistics
//! <library>/<module-slug>/.mod/quizzes/…         one file per quiz
//! <library>/<module-slug>/.mod/submissions/…     one file per attempt
//! <library>/<module-slug>/*                      user source files
//! ```
//!
//! Files are pretty-printed UTF-8 JSON so users can browse and hand-edit
//! their library folders; discovery re-derives module identifiers from
//! metadata on every lookup instead of trusting an index, which keeps
//! manual edits survivable at the cost of linear scans.
//!
//! Known consistency gap, by design: there is no cross-process file locking.
//! Two concurrent writers to the same metadata or stats file race and the
//! last write wins. Acceptable for a single-user desktop tool.

pub mod library;
pub mod module;
pub mod paths;
pub mod practice;
pub mod registry;
pub mod scheduler;
pub mod settings;
pub mod store;

pub use library::{Library, LibraryError, LibraryStorage};
pub use module::{
    ModuleAggregate, ModuleError, ModuleMetadata, ModuleOverview, ModuleStats, Question, Quiz,
    Response, Submission, SubmissionStatus,
};
pub use practice::DueModule;
pub use registry::LibraryRegistry;
pub use settings::SettingsStore;
pub use store::StoreError;
