use thiserror::Error;

/// Errors raised by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent unit of work changed the rows this one depends on
    #[error("concurrent modification: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Stored data no longer satisfies a domain invariant
    #[error("corrupt stored data: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
