use std::future::Future;

use crate::domain::team::TeamResult;

/// Runs `operation` again while it fails with `ConflictRetry`
///
/// At most `max_attempts` runs are made (at least one). Every other error,
/// and the last conflict, is returned as is.
pub async fn retry_on_conflict<T, F, Fut>(max_attempts: u32, mut operation: F) -> TeamResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TeamResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                tracing::warn!(attempt, max_attempts, "concurrent team modification, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}
