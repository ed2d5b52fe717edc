//! Reqwest-backed transport for the management API.
//!
//! The transport is constructed once from validated configuration and issues
//! REST calls against the configured base URL, authenticating every request
//! with the API-key header. Non-success statuses and connection failures are
//! surfaced as [`TransportError`] values; nothing here retries.

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{
    ApiFuture, Container, ContainerCreateResponse, Environment, EnvironmentId, ManagementApi,
    Stack, StackCreateRequest,
};
use crate::config::ApiConfig;
use crate::error::{ConfigError, Result, TransportError};

/// Header carrying the API credential on every request.
const API_KEY_HEADER: &str = "X-API-Key";

/// Per-request timeout in seconds for management API calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the management API.
///
/// Construction validates the configuration once; a transport that exists is
/// always configured. The bearer credential is sent with every request and is
/// never logged.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport from validated configuration.
    ///
    /// The base URL is normalized by trimming any trailing `/` so request
    /// paths can be joined verbatim.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when the API URL or key is
    /// absent, and `ConfigError::InvalidValue` when the underlying HTTP
    /// client cannot be initialised. Both are fatal construction conditions,
    /// surfaced once and never retried.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config
            .api_url
            .clone()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_owned();
        let api_key = config.api_key.clone().unwrap_or_default();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|error| ConfigError::InvalidValue {
                field: String::from("transport"),
                reason: error.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Return the normalized base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and map transport-level failures.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(payload) = body {
            builder = builder.json(payload);
        }

        builder
            .send()
            .await
            .map_err(|error| {
                TransportError::RequestFailed {
                    method: method.to_string(),
                    path: String::from(path),
                    message: error.to_string(),
                }
                .into()
            })
    }

    /// Reject non-success statuses, tolerating the listed exceptions.
    fn check_status(
        method: &Method,
        path: &str,
        response: &reqwest::Response,
        tolerated: &[u16],
    ) -> Result<()> {
        let status = response.status();
        if status.is_success() || tolerated.contains(&status.as_u16()) {
            return Ok(());
        }
        Err(TransportError::UnexpectedStatus {
            method: method.to_string(),
            path: String::from(path),
            status: status.as_u16(),
        }
        .into())
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        Self::check_status(&Method::GET, path, &response, &[])?;
        Self::decode(path, response).await
    }

    /// POST a JSON body and decode a JSON response.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::check_status(&Method::POST, path, &response, &[])?;
        Self::decode(path, response).await
    }

    /// Issue a bodyless request whose response body is discarded.
    async fn send_no_content(&self, method: Method, path: &str, tolerated: &[u16]) -> Result<()> {
        let response = self.send(method.clone(), path, None::<&()>).await?;
        Self::check_status(&method, path, &response, tolerated)
    }

    /// Decode a JSON response body.
    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        response.json::<T>().await.map_err(|error| {
            TransportError::DecodeFailed {
                path: String::from(path),
                message: error.to_string(),
            }
            .into()
        })
    }
}

impl ManagementApi for HttpTransport {
    fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    fn list_environments(&self) -> ApiFuture<'_, Vec<Environment>> {
        Box::pin(async move { self.get_json("/api/endpoints").await })
    }

    fn list_stacks(&self) -> ApiFuture<'_, Vec<Stack>> {
        Box::pin(async move { self.get_json("/api/stacks").await })
    }

    fn list_containers(&self, environment_id: EnvironmentId) -> ApiFuture<'_, Vec<Container>> {
        Box::pin(async move {
            let path = format!("/api/endpoints/{environment_id}/docker/containers/json?all=true");
            self.get_json(&path).await
        })
    }

    fn create_stack(
        &self,
        environment_id: EnvironmentId,
        request: StackCreateRequest,
    ) -> ApiFuture<'_, Stack> {
        Box::pin(async move {
            let path =
                format!("/api/stacks/create/standalone/string?endpointId={environment_id}");
            self.post_json(&path, &request).await
        })
    }

    fn create_container(
        &self,
        environment_id: EnvironmentId,
        name: String,
        payload: serde_json::Value,
    ) -> ApiFuture<'_, ContainerCreateResponse> {
        Box::pin(async move {
            let path = format!(
                "/api/endpoints/{environment_id}/docker/containers/create?name={name}"
            );
            self.post_json(&path, &payload).await
        })
    }

    fn stop_container(
        &self,
        environment_id: EnvironmentId,
        container_id: String,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path =
                format!("/api/endpoints/{environment_id}/docker/containers/{container_id}/stop");
            // 304 means the container was already stopped.
            self.send_no_content(Method::POST, &path, &[304]).await
        })
    }

    fn remove_container(
        &self,
        environment_id: EnvironmentId,
        container_id: String,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!(
                "/api/endpoints/{environment_id}/docker/containers/{container_id}?force=true"
            );
            self.send_no_content(Method::DELETE, &path, &[]).await
        })
    }
}
