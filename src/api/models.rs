//! Data model for the management API.
//!
//! All entities are remote-owned; these types are transient, request-scoped
//! copies decoded from (or encoded into) the wire representation. Field
//! renames follow the management server's Pascal-case JSON for environments
//! and stacks and the engine's container-listing shape for containers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Identifier of a registered remote execution target.
pub type EnvironmentId = i64;

/// A registered remote execution target that owns stacks and containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// The environment id assigned by the management server.
    #[serde(rename = "Id")]
    pub id: EnvironmentId,

    /// The human-readable environment name.
    #[serde(rename = "Name")]
    pub name: String,
}

/// A named, declaratively-defined multi-container application unit.
///
/// The name is the natural key for idempotency checks; the
/// `(id, environment_id)` pair is the strict identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    /// The stack id assigned by the management server.
    #[serde(rename = "Id")]
    pub id: i64,

    /// The stack name.
    #[serde(rename = "Name")]
    pub name: String,

    /// The environment the stack is deployed to.
    #[serde(rename = "EndpointId")]
    pub environment_id: EnvironmentId,
}

/// A container as reported by the engine listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// The engine-assigned container id.
    #[serde(rename = "Id")]
    pub id: String,

    /// Container names; the engine reports each with a leading `/`.
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,

    /// The image the container was created from.
    #[serde(rename = "Image")]
    pub image: String,

    /// Labels attached to the container; absent labels decode as empty.
    #[serde(rename = "Labels", default)]
    pub labels: HashMap<String, String>,

    /// The coarse lifecycle state, e.g. `running` or `exited`.
    #[serde(rename = "State")]
    pub state: String,

    /// The human-readable status line, e.g. `Up 2 hours`.
    #[serde(rename = "Status")]
    pub status: String,
}

impl Container {
    /// Whether any of the container's names matches the target.
    ///
    /// The match is deliberately permissive to tolerate engine naming
    /// conventions: a name entry matches when it contains the target as a
    /// substring, equals `"/" + target` exactly, or equals the target after
    /// stripping one leading `/`.
    #[must_use]
    pub fn matches_name(&self, target: &str) -> bool {
        let prefixed = format!("/{target}");
        self.names.iter().any(|name| {
            name.contains(target) || *name == prefixed || name.strip_prefix('/') == Some(target)
        })
    }

    /// Whether the engine reports the container as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// A name/value pair passed to stack deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// The variable name.
    pub name: String,

    /// The variable value.
    pub value: String,
}

impl EnvVar {
    /// Create a name/value pair.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Stack-creation request parameters.
///
/// Serializes directly into the management server's creation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackCreateRequest {
    /// The stack name.
    #[serde(rename = "Name")]
    name: String,

    /// The compose file content to deploy.
    #[serde(rename = "StackFileContent")]
    compose_content: String,

    /// Environment variables passed to the deployment.
    #[serde(rename = "Env")]
    env: Vec<EnvVar>,
}

impl StackCreateRequest {
    /// Create a request with name and compose content.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `name` or
    /// `compose_content` is empty or whitespace-only. Missing creation
    /// inputs are a precondition failure, never a retryable condition.
    pub fn new(name: impl Into<String>, compose_content: impl Into<String>) -> Result<Self> {
        let name_value = name.into();
        let content_value = compose_content.into();

        if name_value.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("name"),
            }
            .into());
        }
        if content_value.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("compose_content"),
            }
            .into());
        }

        Ok(Self {
            name: name_value,
            compose_content: content_value,
            env: Vec::new(),
        })
    }

    /// Attach environment variables for the deployment.
    #[must_use]
    pub fn with_env(mut self, env: Vec<EnvVar>) -> Self {
        self.env = env;
        self
    }

    /// Return the configured stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the configured compose content.
    #[must_use]
    pub fn compose_content(&self) -> &str {
        &self.compose_content
    }

    /// Return the configured environment variables.
    #[must_use]
    pub fn env(&self) -> &[EnvVar] {
        &self.env
    }
}

/// Response returned by the engine for a container-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCreateResponse {
    /// The engine-assigned id of the created container.
    #[serde(rename = "Id")]
    pub id: String,

    /// Warnings emitted by the engine during creation.
    #[serde(rename = "Warnings", default)]
    pub warnings: Vec<String>,
}
