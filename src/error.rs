//! Semantic error types for the wharf client library.
//!
//! This module defines the error hierarchy for wharf, following the principle
//! of using semantic error enums (via `thiserror`) for conditions the caller
//! might inspect, retry, or branch on, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.
//!
//! One `Result` discipline is used uniformly: every public operation returns
//! [`Result`]. Precondition failures (missing configuration, unresolved
//! environment) fail fast and are never retried; transient transport failures
//! inside polling loops are swallowed and logged by the caller; exhausted
//! retries surface as [`CreateError::VerificationExhausted`] rather than an
//! empty result value.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: camino::Utf8PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Errors raised by the management API transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport has no usable base URL or API credential.
    #[error("management API client is not configured")]
    NotConfigured,

    /// A request could not be sent or the connection failed mid-flight.
    #[error("{method} {path} failed: {message}")]
    RequestFailed {
        /// The HTTP method of the failed request.
        method: String,
        /// The request path relative to the base URL.
        path: String,
        /// A description of the transport failure.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("{method} {path} returned status {status}")]
    UnexpectedStatus {
        /// The HTTP method of the request.
        method: String,
        /// The request path relative to the base URL.
        path: String,
        /// The HTTP status code returned by the server.
        status: u16,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response from {path}: {message}")]
    DecodeFailed {
        /// The request path relative to the base URL.
        path: String,
        /// A description of the decode failure.
        message: String,
    },
}

/// Errors that can occur while resolving or looking up remote resources.
///
/// A failed listing fetch is reported with the same not-found variants as a
/// genuine miss. This conflation of "no match" with "listing unavailable" is
/// deliberate and documented on each lookup operation; the underlying
/// transport failure is logged at warn level before the error is returned.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No target environment could be resolved.
    #[error("no environment available to resolve")]
    EnvironmentUnresolved,

    /// No stack with the requested name was found.
    #[error("stack '{name}' not found")]
    StackNameNotFound {
        /// The stack name that was searched for.
        name: String,
    },

    /// No stack with the requested id exists under the given environment.
    #[error("stack {id} not found in environment {environment_id}")]
    StackIdNotFound {
        /// The stack id that was searched for.
        id: i64,
        /// The environment the search was scoped to.
        environment_id: i64,
    },

    /// No container matched the requested name or criteria.
    #[error("container matching '{query}' not found")]
    ContainerNotFound {
        /// A description of the name or criteria that did not match.
        query: String,
    },

    /// A detail query was submitted without any criteria.
    #[error("container query requires at least one of image or label")]
    EmptyQuery,
}

/// Errors that can occur during creation orchestration.
#[derive(Debug, Error)]
pub enum CreateError {
    /// Every creation attempt was submitted but none could be verified.
    ///
    /// The last submitted resource is not rolled back; a partially-created,
    /// unverified resource may remain on the remote side.
    #[error("'{name}' was not verified after {attempts} creation attempts")]
    VerificationExhausted {
        /// The (sanitized, where applicable) resource name.
        name: String,
        /// The number of creation attempts that were submitted.
        attempts: u32,
    },
}

/// Top-level error type for the wharf library.
///
/// This enum aggregates all domain-specific errors into a single type used by
/// every public operation. At the application boundary these errors are
/// typically converted to `eyre::Report` for human-readable error reporting.
#[derive(Debug, Error)]
pub enum WharfError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred in the management API transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An error occurred while resolving or looking up a resource.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// An error occurred during creation orchestration.
    #[error(transparent)]
    Create(#[from] CreateError),
}

/// A specialised `Result` type for wharf operations.
pub type Result<T> = std::result::Result<T, WharfError>;
