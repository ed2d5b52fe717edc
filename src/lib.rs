//! Typed client for a container-orchestration management API.
//!
//! `wharf` wraps a remote management API (environments, stacks, containers)
//! behind typed async methods, adding retry and verification logic for
//! asynchronous resource creation. Creation submissions are acknowledged
//! before the resource is observably live, so the client polls the relevant
//! listing until the resource appears or a bounded timeout elapses, retrying
//! the whole create-and-verify cycle a configurable number of times.
//!
//! # Architecture
//!
//! A [`client::WharfClient`] owns a transport implementing the
//! [`api::ManagementApi`] trait and composes three concerns behind it:
//! environment resolution (lazily caching a default target environment),
//! resource lookup (linear scans over full listings), and creation
//! orchestration (idempotency check, submit, poll-verify, retry). All state
//! is explicit on the client handle; tests instantiate isolated clients with
//! mock transports.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading (file and environment layers)
//! - [`api`]: Management API contract, data model, and HTTP transport
//! - [`client`]: Resolution, lookup, verification, and creation orchestration
//! - [`error`]: Semantic error types for the library

pub mod api;
pub mod client;
pub mod config;
pub mod error;
