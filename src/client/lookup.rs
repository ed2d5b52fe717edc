//! Resource lookup over full listings.
//!
//! The management API offers no server-side filtering the client relies on;
//! every lookup fetches the complete listing and scans it linearly. A failed
//! listing fetch is logged at warn level and reported with the same
//! not-found error as a genuine miss. Callers that need to distinguish the
//! two must consult the transport directly.

use tracing::warn;

use super::WharfClient;
use crate::api::{Container, EnvironmentId, ManagementApi, Stack};
use crate::error::{LookupError, Result};

/// Criteria for finding a container by details.
///
/// At least one of `image` and `label` must be provided; all provided
/// criteria must match. The label criterion checks key presence only, not
/// the label's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerQuery {
    /// Match containers created from exactly this image reference.
    pub image: Option<String>,

    /// Match containers carrying this label key (any value).
    pub label: Option<String>,
}

impl ContainerQuery {
    /// Whether no criteria were provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.label.is_none()
    }

    /// Whether the container satisfies every provided criterion.
    fn matches(&self, container: &Container) -> bool {
        let image_matches = self
            .image
            .as_deref()
            .is_none_or(|image| container.image == image);
        let label_matches = self
            .label
            .as_deref()
            .is_none_or(|label| container.labels.contains_key(label));
        image_matches && label_matches
    }

    /// Human-readable form for diagnostics.
    fn describe(&self) -> String {
        let image = self.image.as_deref().unwrap_or("*");
        let label = self.label.as_deref().unwrap_or("*");
        format!("image={image} label={label}")
    }
}

impl<T: ManagementApi> WharfClient<T> {
    /// Find a stack by exact name.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::StackNameNotFound` when no stack has the name,
    /// or when the stack listing could not be fetched (logged at warn).
    pub async fn find_stack_by_name(&self, name: &str) -> Result<Stack> {
        self.stacks_for_lookup()
            .await
            .into_iter()
            .find(|stack| stack.name == name)
            .ok_or_else(|| {
                LookupError::StackNameNotFound {
                    name: String::from(name),
                }
                .into()
            })
    }

    /// Find a stack by id within one environment.
    ///
    /// A stack id existing under a different environment is not a match:
    /// the `(id, environment_id)` pair is the strict identity key.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::StackIdNotFound` when no stack matches both id
    /// and environment, or when the stack listing could not be fetched.
    pub async fn find_stack_by_id(
        &self,
        id: i64,
        environment_id: EnvironmentId,
    ) -> Result<Stack> {
        self.stacks_for_lookup()
            .await
            .into_iter()
            .find(|stack| stack.id == id && stack.environment_id == environment_id)
            .ok_or_else(|| {
                LookupError::StackIdNotFound {
                    id,
                    environment_id,
                }
                .into()
            })
    }

    /// Find a container by name within the resolved environment.
    ///
    /// Matching tolerates the engine's leading `/` on names; see
    /// [`Container::matches_name`]. On ambiguity, the first match in the
    /// order the transport returned wins.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::EnvironmentUnresolved` when no environment can
    /// be resolved, and `LookupError::ContainerNotFound` when nothing
    /// matches or the container listing could not be fetched.
    pub async fn find_container_by_name(&self, name: &str) -> Result<Container> {
        let environment_id = self.resolve_environment().await?;
        self.containers_for_lookup(environment_id)
            .await
            .into_iter()
            .find(|container| container.matches_name(name))
            .ok_or_else(|| {
                LookupError::ContainerNotFound {
                    query: String::from(name),
                }
                .into()
            })
    }

    /// Find a container by image and/or label within the resolved
    /// environment.
    ///
    /// All provided criteria must match; the label criterion checks key
    /// presence only.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::EmptyQuery` when no criteria were provided,
    /// `LookupError::EnvironmentUnresolved` when no environment can be
    /// resolved, and `LookupError::ContainerNotFound` when nothing matches
    /// or the container listing could not be fetched.
    pub async fn find_container_by_details(&self, query: &ContainerQuery) -> Result<Container> {
        if query.is_empty() {
            return Err(LookupError::EmptyQuery.into());
        }

        let environment_id = self.resolve_environment().await?;
        self.containers_for_lookup(environment_id)
            .await
            .into_iter()
            .find(|container| query.matches(container))
            .ok_or_else(|| {
                LookupError::ContainerNotFound {
                    query: query.describe(),
                }
                .into()
            })
    }

    /// Fetch the stack listing, degrading a failed fetch to an empty scan.
    async fn stacks_for_lookup(&self) -> Vec<Stack> {
        match self.api().list_stacks().await {
            Ok(stacks) => stacks,
            Err(error) => {
                warn!(%error, "stack listing unavailable; treating as not found");
                Vec::new()
            }
        }
    }

    /// Fetch the container listing, degrading a failed fetch to an empty
    /// scan.
    async fn containers_for_lookup(&self, environment_id: EnvironmentId) -> Vec<Container> {
        match self.api().list_containers(environment_id).await {
            Ok(containers) => containers,
            Err(error) => {
                warn!(%error, "container listing unavailable; treating as not found");
                Vec::new()
            }
        }
    }
}
