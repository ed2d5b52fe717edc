//! Polling-based verification of asynchronous creation.
//!
//! Creation submissions are acknowledged before the resource is observably
//! live, so verification polls the relevant lookup until it succeeds or a
//! wall-clock timeout elapses. Lookup failures of any kind are swallowed and
//! logged; they count as "not yet found" and never abort the poll.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::WharfClient;
use crate::api::ManagementApi;
use crate::error::Result;

/// Fixed spacing between verification attempts.
///
/// The sleep is applied regardless of how long the lookup itself took, so
/// the actual call cadence is `max(POLL_INTERVAL, lookup latency)` apart.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Verification timeout applied when none is specified.
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Coerce a raw millisecond timeout into a usable duration.
///
/// Negative values cannot express a timeout and are coerced to
/// [`DEFAULT_VERIFY_TIMEOUT`] with a warning; coercion is never a hard
/// failure.
#[must_use]
pub fn normalize_timeout_ms(raw_ms: i64) -> Duration {
    u64::try_from(raw_ms).map_or_else(
        |_| {
            warn!(raw_ms, "invalid verification timeout; using default");
            DEFAULT_VERIFY_TIMEOUT
        },
        Duration::from_millis,
    )
}

/// Poll a lookup until it succeeds or the timeout elapses.
///
/// Returns `true` as soon as the lookup yields a resource, without waiting
/// out the remainder of the timeout. Total wall-clock time does not exceed
/// `timeout` (measured from the first invocation) plus one lookup's
/// latency.
pub(super) async fn poll_until_found<F, Fut, R>(mut lookup: F, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let started = tokio::time::Instant::now();
    while started.elapsed() < timeout {
        match lookup().await {
            Ok(_) => return true,
            Err(error) => {
                warn!(%error, "verification lookup failed; continuing to poll");
            }
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    false
}

impl<T: ManagementApi> WharfClient<T> {
    /// Poll until a stack with the given name is listed.
    ///
    /// `timeout` defaults to [`DEFAULT_VERIFY_TIMEOUT`] when unspecified.
    /// Returns `false` when the timeout elapses without the stack
    /// appearing.
    pub async fn verify_stack_created(&self, name: &str, timeout: Option<Duration>) -> bool {
        let bound = timeout.unwrap_or(DEFAULT_VERIFY_TIMEOUT);
        poll_until_found(|| self.find_stack_by_name(name), bound).await
    }

    /// Poll until a container matching the given name is listed.
    ///
    /// `timeout` defaults to [`DEFAULT_VERIFY_TIMEOUT`] when unspecified.
    /// Returns `false` when the timeout elapses without the container
    /// appearing.
    pub async fn verify_container_created(&self, name: &str, timeout: Option<Duration>) -> bool {
        let bound = timeout.unwrap_or(DEFAULT_VERIFY_TIMEOUT);
        poll_until_found(|| self.find_container_by_name(name), bound).await
    }
}
