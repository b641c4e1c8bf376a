//! Study modules: models, file-backed storage and slug-based discovery.

pub mod discovery;
pub mod models;
pub mod storage;

pub use models::{
    ModuleAggregate, ModuleMetadata, ModuleOverview, ModuleStats, Question, Quiz, Response,
    Submission, SubmissionStatus, MODULE_DIR,
};
pub use storage::ModuleError;
