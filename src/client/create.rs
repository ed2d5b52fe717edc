//! Creation orchestration: idempotency check, submit, verify, retry.
//!
//! Each creation call runs the same state machine: validate (at request
//! construction), reuse an existing resource with the same name, resolve the
//! target environment, then loop submit-and-verify up to the policy's retry
//! count. A failed verification does not roll back the submitted resource;
//! a partially-created, unverified resource may remain on the remote side
//! once retries are exhausted. That risk is documented rather than masked.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use super::verify::{DEFAULT_VERIFY_TIMEOUT, POLL_INTERVAL, normalize_timeout_ms};
use super::WharfClient;
use crate::api::{EnvironmentId, ManagementApi, Stack, StackCreateRequest};
use crate::error::{ConfigError, CreateError, Result};

/// Creation attempts made when none are specified.
pub const DEFAULT_MAX_RETRY_COUNT: u32 = 3;

/// Retry and verification bounds for a creation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of create-and-verify attempts.
    pub max_retry_count: u32,

    /// Wall-clock bound for each verification poll.
    pub verify_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retry_count: DEFAULT_MAX_RETRY_COUNT,
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from raw, possibly invalid numeric parameters.
    ///
    /// Negative values cannot express a bound and are coerced to the
    /// documented defaults (3 attempts, 5000 ms) with a warning; invalid
    /// input is never a hard failure.
    #[must_use]
    pub fn from_raw(max_retry_count: i64, verify_timeout_ms: i64) -> Self {
        let retries = u32::try_from(max_retry_count).unwrap_or_else(|_| {
            warn!(max_retry_count, "invalid retry count; using default");
            DEFAULT_MAX_RETRY_COUNT
        });
        Self {
            max_retry_count: retries,
            verify_timeout: normalize_timeout_ms(verify_timeout_ms),
        }
    }
}

/// Transform a resource name to satisfy engine naming constraints.
///
/// The result is lowercase with every character outside `[a-z0-9-]`
/// replaced by `-`.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Container-creation request parameters.
///
/// The requested name is sanitized into an engine-safe identifier at
/// construction; the original name is kept for the idempotency check, the
/// sanitized one is used for cleanup, submission and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCreateRequest {
    /// The name as requested by the caller.
    name: String,

    /// The engine-safe form of the name.
    sanitized_name: String,

    /// Engine-specific creation payload, passed through opaquely.
    payload: serde_json::Value,
}

impl ContainerCreateRequest {
    /// Create a request with a name and an engine-specific payload.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `name` is empty or
    /// whitespace-only, or when `payload` is JSON null. Missing creation
    /// inputs are a precondition failure, never a retryable condition.
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Result<Self> {
        let name_value = name.into();
        if name_value.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("name"),
            }
            .into());
        }
        if payload.is_null() {
            return Err(ConfigError::MissingRequired {
                field: String::from("payload"),
            }
            .into());
        }

        let sanitized_name = sanitize_name(&name_value);
        Ok(Self {
            name: name_value,
            sanitized_name,
            payload,
        })
    }

    /// Return the name as requested by the caller.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the engine-safe form of the name.
    #[must_use]
    pub fn sanitized_name(&self) -> &str {
        &self.sanitized_name
    }

    /// Return the engine-specific creation payload.
    #[must_use]
    pub const fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}

/// How a container-creation call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationMethod {
    /// A new container was submitted and verified.
    Created,

    /// An existing container with the same name was returned unchanged.
    Reused,
}

/// Result record synthesized for a container-creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCreated {
    /// The engine-assigned container id.
    pub id: String,

    /// The engine-safe container name.
    pub name: String,

    /// How the call was satisfied.
    pub method: CreationMethod,

    /// Whether a creation request was submitted.
    pub created: bool,

    /// Whether the container was observed live after creation.
    pub verified: bool,
}

impl<T: ManagementApi> WharfClient<T> {
    /// Create a stack, or reuse an existing one with the same name.
    ///
    /// An existing stack is returned immediately with no creation call:
    /// name collision makes creation a no-op ("create or reuse", not
    /// "create or fail"). Otherwise the environment is resolved and up to
    /// `policy.max_retry_count` create-and-verify attempts are made, each
    /// submitting one creation request, waiting one poll interval, then
    /// polling for the stack to appear.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::EnvironmentUnresolved` when no environment can
    /// be resolved (a precondition, not retried) and
    /// `CreateError::VerificationExhausted` when every attempt was
    /// submitted without a verified result.
    pub async fn create_stack(
        &self,
        request: StackCreateRequest,
        policy: RetryPolicy,
    ) -> Result<Stack> {
        if let Ok(existing) = self.find_stack_by_name(request.name()).await {
            info!(
                stack = %existing.name,
                id = existing.id,
                "stack already exists; reusing"
            );
            return Ok(existing);
        }

        let environment_id = self.resolve_environment().await?;

        for attempt in 1..=policy.max_retry_count {
            match self.api().create_stack(environment_id, request.clone()).await {
                Ok(created) => {
                    sleep(POLL_INTERVAL).await;
                    if self
                        .verify_stack_created(request.name(), Some(policy.verify_timeout))
                        .await
                    {
                        info!(stack = request.name(), attempt, "stack created and verified");
                        return Ok(created);
                    }
                    warn!(
                        stack = request.name(),
                        attempt, "stack creation not verified; retrying"
                    );
                }
                Err(submit_error) => {
                    warn!(
                        stack = request.name(),
                        attempt,
                        error = %submit_error,
                        "stack creation submission failed"
                    );
                }
            }
        }

        error!(
            stack = request.name(),
            attempts = policy.max_retry_count,
            "stack creation exhausted retries"
        );
        Err(CreateError::VerificationExhausted {
            name: String::from(request.name()),
            attempts: policy.max_retry_count,
        }
        .into())
    }

    /// Create a container, or reuse an existing one with the same name.
    ///
    /// The idempotency check uses the name as requested; each attempt then
    /// performs a best-effort cleanup of any pre-existing container sharing
    /// the sanitized name (stop if running, then remove; failures are
    /// logged, not fatal) before submitting the creation payload and
    /// polling for the container to appear.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::EnvironmentUnresolved` when no environment can
    /// be resolved (a precondition, not retried) and
    /// `CreateError::VerificationExhausted` when every attempt was
    /// submitted without a verified result.
    pub async fn create_container(
        &self,
        request: ContainerCreateRequest,
        policy: RetryPolicy,
    ) -> Result<ContainerCreated> {
        if let Ok(existing) = self.find_container_by_name(request.name()).await {
            info!(
                container = request.name(),
                id = %existing.id,
                "container already exists; reusing"
            );
            return Ok(ContainerCreated {
                id: existing.id,
                name: String::from(request.sanitized_name()),
                method: CreationMethod::Reused,
                created: false,
                verified: true,
            });
        }

        let environment_id = self.resolve_environment().await?;

        for attempt in 1..=policy.max_retry_count {
            self.cleanup_stale_container(environment_id, request.sanitized_name())
                .await;

            let submitted = self
                .api()
                .create_container(
                    environment_id,
                    String::from(request.sanitized_name()),
                    request.payload().clone(),
                )
                .await;

            match submitted {
                Ok(response) => {
                    sleep(POLL_INTERVAL).await;
                    if self
                        .verify_container_created(
                            request.sanitized_name(),
                            Some(policy.verify_timeout),
                        )
                        .await
                    {
                        info!(
                            container = request.sanitized_name(),
                            attempt, "container created and verified"
                        );
                        return Ok(ContainerCreated {
                            id: response.id,
                            name: String::from(request.sanitized_name()),
                            method: CreationMethod::Created,
                            created: true,
                            verified: true,
                        });
                    }
                    warn!(
                        container = request.sanitized_name(),
                        attempt, "container creation not verified; retrying"
                    );
                }
                Err(submit_error) => {
                    warn!(
                        container = request.sanitized_name(),
                        attempt,
                        error = %submit_error,
                        "container creation submission failed"
                    );
                }
            }
        }

        error!(
            container = request.sanitized_name(),
            attempts = policy.max_retry_count,
            "container creation exhausted retries"
        );
        Err(CreateError::VerificationExhausted {
            name: String::from(request.sanitized_name()),
            attempts: policy.max_retry_count,
        }
        .into())
    }

    /// Best-effort removal of a pre-existing container with the given name.
    ///
    /// Stops the container first when it is running, then removes it.
    /// Every failure here is logged and swallowed; cleanup never aborts a
    /// creation attempt.
    async fn cleanup_stale_container(&self, environment_id: EnvironmentId, name: &str) {
        let containers = match self.api().list_containers(environment_id).await {
            Ok(containers) => containers,
            Err(list_error) => {
                warn!(error = %list_error, "cleanup listing failed; skipping cleanup");
                return;
            }
        };

        let Some(stale) = containers
            .into_iter()
            .find(|container| container.matches_name(name))
        else {
            return;
        };

        if stale.is_running() {
            if let Err(stop_error) = self
                .api()
                .stop_container(environment_id, stale.id.clone())
                .await
            {
                warn!(
                    container = %stale.id,
                    error = %stop_error,
                    "failed to stop stale container"
                );
            }
        }

        if let Err(remove_error) = self
            .api()
            .remove_container(environment_id, stale.id.clone())
            .await
        {
            warn!(
                container = %stale.id,
                error = %remove_error,
                "failed to remove stale container"
            );
        }
    }
}
