//! Client handle composing resolution, lookup, verification and creation.
//!
//! [`WharfClient`] is an explicit, passed-in handle rather than a hidden
//! process-wide singleton: construction validates the transport's
//! configuration once, and every piece of session state (the cached
//! environment id) lives on the handle so tests can instantiate isolated
//! instances.

mod create;
mod lookup;
mod resolve;
mod verify;

#[cfg(test)]
mod tests;

pub use create::{
    ContainerCreateRequest, ContainerCreated, CreationMethod, DEFAULT_MAX_RETRY_COUNT,
    RetryPolicy, sanitize_name,
};
pub use lookup::ContainerQuery;
pub use verify::{DEFAULT_VERIFY_TIMEOUT, POLL_INTERVAL, normalize_timeout_ms};

use std::sync::{Mutex, PoisonError};

use crate::api::{EnvironmentId, HttpTransport, ManagementApi};
use crate::config::ApiConfig;
use crate::error::{Result, TransportError};

/// Client for a container-orchestration management API.
///
/// The client is generic over its transport so orchestration logic can be
/// exercised against mocks; production code uses the reqwest-backed
/// [`HttpTransport`].
pub struct WharfClient<T: ManagementApi = HttpTransport> {
    api: T,
    /// Cached default environment id; resolved lazily, at most once per
    /// session unless explicitly cleared or overridden.
    environment: Mutex<Option<EnvironmentId>>,
}

impl WharfClient<HttpTransport> {
    /// Build a client over an HTTP transport from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when the API URL or key is
    /// absent from the configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(HttpTransport::new(config)?)
    }
}

impl<T: ManagementApi> WharfClient<T> {
    /// Wrap a transport in a client handle.
    ///
    /// The transport's configuration flag is consulted exactly once, here;
    /// a client that exists can issue calls.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotConfigured` when the transport reports
    /// itself unconfigured.
    pub fn new(api: T) -> Result<Self> {
        if !api.is_configured() {
            return Err(TransportError::NotConfigured.into());
        }
        Ok(Self {
            api,
            environment: Mutex::new(None),
        })
    }

    /// Override the session's target environment.
    ///
    /// Subsequent operations use this id without fetching the environment
    /// listing.
    pub fn set_environment(&self, id: EnvironmentId) {
        *self.lock_environment() = Some(id);
    }

    /// Clear the cached environment so the next operation resolves afresh.
    pub fn clear_environment(&self) {
        *self.lock_environment() = None;
    }

    /// The transport behind this client.
    pub(crate) const fn api(&self) -> &T {
        &self.api
    }

    /// Read the cached environment id, if any.
    pub(crate) fn cached_environment(&self) -> Option<EnvironmentId> {
        *self.lock_environment()
    }

    /// Store a freshly resolved environment id.
    pub(crate) fn store_environment(&self, id: EnvironmentId) {
        *self.lock_environment() = Some(id);
    }

    /// Lock the environment cache, recovering from poisoning.
    ///
    /// The guard is only ever held for a copy or a store, never across an
    /// await point.
    fn lock_environment(&self) -> std::sync::MutexGuard<'_, Option<EnvironmentId>> {
        self.environment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
