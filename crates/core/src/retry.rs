//! Retry mechanism with exponential backoff and jitter
//!
//! The listing engine never retries on its own. Transient catalog failures
//! are retried here, on the catalog side, by wrapping any [`Catalog`] in a
//! [`RetryingCatalog`].

use std::time::Duration;

use async_trait::async_trait;

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::traits::{Branch, Catalog, Entry};

/// Retry a fallible async operation with exponential backoff
///
/// # Example
/// ```ignore
/// let page = retry_with_backoff(
///     &config,
///     || async { catalog.list_branches_by_prefix("lake", "", 10, "").await },
///     is_retryable_error,
/// ).await;
/// ```
pub async fn retry_with_backoff<T, F, Fut, R>(
    config: &RetryConfig,
    mut operation: F,
    is_retryable: R,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
    R: Fn(&Error) -> bool,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt >= config.max_attempts || !is_retryable(&e) {
                    return Err(e);
                }

                let backoff = calculate_backoff(config, attempt);
                tracing::debug!(
                    attempt = attempt,
                    backoff_ms = backoff.as_millis(),
                    error = %e,
                    "Retrying catalog call after transient error"
                );

                tokio::time::sleep(backoff).await;
            }
        }
    }
}

/// Calculate backoff duration with jitter
fn calculate_backoff(config: &RetryConfig, attempt: u32) -> Duration {
    // initial * 2^(attempt-1)
    let base_ms = config.initial_backoff_ms * (1u64 << (attempt - 1).min(10));
    let capped_ms = base_ms.min(config.max_backoff_ms);

    let jitter_ms = rand_jitter(capped_ms);
    Duration::from_millis(capped_ms + jitter_ms)
}

/// Pseudo-random jitter in `0..max` taken from the clock
fn rand_jitter(max: u64) -> u64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as u64;
    nanos % max.max(1)
}

/// Check if a catalog error is transient
pub fn is_retryable_error(error: &Error) -> bool {
    match error {
        Error::Unavailable(_) => true,
        Error::Io(e) => matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::Interrupted
        ),
        Error::General(msg) => {
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("timeout") || msg_lower.contains("temporary")
        }
        Error::NotFound(_)
        | Error::RepositoryNotFound(_)
        | Error::BranchNotFound(_)
        | Error::InvalidPath(_)
        | Error::InvalidArgument(_)
        | Error::Config(_) => false,
    }
}

/// Catalog decorator that retries transient failures of the wrapped catalog
pub struct RetryingCatalog<C> {
    inner: C,
    config: RetryConfig,
}

impl<C: Catalog> RetryingCatalog<C> {
    pub fn new(inner: C, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl<C: Catalog> Catalog for RetryingCatalog<C> {
    async fn list_branches_by_prefix(
        &self,
        repository: &str,
        prefix: &str,
        limit: usize,
        after: &str,
    ) -> Result<(Vec<Branch>, bool)> {
        retry_with_backoff(
            &self.config,
            || {
                self.inner
                    .list_branches_by_prefix(repository, prefix, limit, after)
            },
            is_retryable_error,
        )
        .await
    }

    async fn list_objects_by_prefix(
        &self,
        repository: &str,
        ref_id: &str,
        path: &str,
        after: &str,
        limit: usize,
        recursive: bool,
    ) -> Result<(Vec<Entry>, bool)> {
        retry_with_backoff(
            &self.config,
            || {
                self.inner
                    .list_objects_by_prefix(repository, ref_id, path, after, limit, recursive)
            },
            is_retryable_error,
        )
        .await
    }
}
