//! Error kinds surfaced by the public service operations.

/// Errors returned by [`crate::TaskService`] and the sync engine.
///
/// Remote-transport failures never appear here: they are absorbed at the
/// engine boundary and leave the affected records pending for a later pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied input violated a precondition. Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Local storage medium failure. Fatal to the operation in progress.
    #[error("local storage failure: {0}")]
    Storage(#[from] sea_orm::DbErr),

    /// The remote fetch of a full merge failed; callers fall back to
    /// serving local data. Never shown to the user as a hard failure.
    #[error("remote fetch failed, merge abandoned")]
    MergeAborted,
}

pub type Result<T> = std::result::Result<T, Error>;
