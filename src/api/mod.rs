//! Management API contract and HTTP transport.
//!
//! This module defines the [`ManagementApi`] trait describing the uniform
//! request/response contract the client depends on, together with the
//! reqwest-backed [`HttpTransport`] implementation. The trait exists to keep
//! resolution, lookup and creation orchestration testable without a live
//! management server.

mod http;
mod models;


pub use http::HttpTransport;
pub use models::{
    Container, ContainerCreateResponse, EnvVar, Environment, EnvironmentId, Stack,
    StackCreateRequest,
};

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Boxed future type returned by [`ManagementApi`] implementors.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Behaviour required from the remote management API.
///
/// Implementors issue single REST calls and surface transport or status
/// failures as [`crate::error::TransportError`]. No server-side filtering is
/// assumed: the listing methods return complete collections and the client
/// scans them locally.
pub trait ManagementApi {
    /// Whether the transport holds a usable base URL and API credential.
    fn is_configured(&self) -> bool;

    /// Fetch the full environment listing, in server order.
    fn list_environments(&self) -> ApiFuture<'_, Vec<Environment>>;

    /// Fetch the full stack listing across all environments.
    fn list_stacks(&self) -> ApiFuture<'_, Vec<Stack>>;

    /// Fetch the full container listing (including stopped containers) for
    /// one environment.
    fn list_containers(&self, environment_id: EnvironmentId) -> ApiFuture<'_, Vec<Container>>;

    /// Submit a stack-creation request to the given environment.
    fn create_stack(
        &self,
        environment_id: EnvironmentId,
        request: StackCreateRequest,
    ) -> ApiFuture<'_, Stack>;

    /// Submit a container-creation request with an engine-specific payload.
    ///
    /// The caller is responsible for passing an engine-safe `name`.
    fn create_container(
        &self,
        environment_id: EnvironmentId,
        name: String,
        payload: serde_json::Value,
    ) -> ApiFuture<'_, ContainerCreateResponse>;

    /// Stop a running container.
    fn stop_container(
        &self,
        environment_id: EnvironmentId,
        container_id: String,
    ) -> ApiFuture<'_, ()>;

    /// Remove a container, forcing removal if it is still running.
    fn remove_container(
        &self,
        environment_id: EnvironmentId,
        container_id: String,
    ) -> ApiFuture<'_, ()>;
}
