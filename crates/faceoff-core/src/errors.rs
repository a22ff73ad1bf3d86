use thiserror::Error;

/// Engine failure taxonomy.
///
/// `InsufficientCandidates` and `UnknownOutcome` are caller-facing and never
/// retried. `ConcurrentUpdateConflict` is produced only after the store layer
/// has exhausted its internal retries. `StoreUnavailable` wraps any other
/// database failure and is fatal for the request.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient candidates for use case '{use_case}': found {found}, need 2")]
    InsufficientCandidates { use_case: String, found: usize },

    #[error("unknown outcome '{0}' (expected one of: win, loss, both_good, both_bad)")]
    UnknownOutcome(String),

    #[error("concurrent update conflict, gave up after {attempts} attempts")]
    ConcurrentUpdateConflict { attempts: u32 },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Busy/locked errors are transient and worth a bounded retry; everything
/// else surfaces as `StoreUnavailable`.
pub(crate) fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
    )
}
