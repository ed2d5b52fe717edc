//! Unit tests for environment resolution and caching.

use std::sync::atomic::Ordering;

use rstest::rstest;

use super::support::{FakeApi, environment};
use super::{ensure, io_error, runtime};
use crate::error::{LookupError, WharfError};

#[rstest]
fn resolves_first_environment_in_list_order(
    runtime: std::io::Result<tokio::runtime::Runtime>,
) -> std::io::Result<()> {
    let rt = runtime?;
    let (client, _api) = FakeApi::new()
        .with_environments(vec![environment(7, "staging"), environment(9, "production")])
        .into_client()
        .map_err(|error| io_error(format!("client construction should succeed: {error}")))?;

    let resolved = rt
        .block_on(client.resolve_environment())
        .map_err(|error| io_error(format!("resolution should succeed: {error}")))?;

    ensure(resolved == 7, format!("expected first environment 7, got {resolved}"))
}

#[rstest]
fn caches_after_first_successful_resolution(
    runtime: std::io::Result<tokio::runtime::Runtime>,
) -> std::io::Result<()> {
    let rt = runtime?;
    let (client, api) = FakeApi::new()
        .with_environments(vec![environment(7, "staging")])
        .into_client()
        .map_err(|error| io_error(format!("client construction should succeed: {error}")))?;

    let first = rt
        .block_on(client.resolve_environment())
        .map_err(|error| io_error(format!("first resolution should succeed: {error}")))?;
    let second = rt
        .block_on(client.resolve_environment())
        .map_err(|error| io_error(format!("second resolution should succeed: {error}")))?;

    ensure(first == second, "cached resolution should be stable")?;
    ensure(
        api.list_environment_calls.load(Ordering::SeqCst) == 1,
        "exactly one environment listing fetch should be issued",
    )
}

#[rstest]
fn listing_failure_reports_unresolved(
    runtime: std::io::Result<tokio::runtime::Runtime>,
) -> std::io::Result<()> {
    let rt = runtime?;
    let (client, _api) = FakeApi::new()
        .failing_environment_listing()
        .into_client()
        .map_err(|error| io_error(format!("client construction should succeed: {error}")))?;

    let result = rt.block_on(client.resolve_environment());
    ensure(
        matches!(
            result,
            Err(WharfError::Lookup(LookupError::EnvironmentUnresolved))
        ),
        format!("expected unresolved environment, got: {result:?}"),
    )
}

#[rstest]
fn empty_listing_reports_unresolved(
    runtime: std::io::Result<tokio::runtime::Runtime>,
) -> std::io::Result<()> {
    let rt = runtime?;
    let (client, _api) = FakeApi::new()
        .into_client()
        .map_err(|error| io_error(format!("client construction should succeed: {error}")))?;

    let result = rt.block_on(client.resolve_environment());
    ensure(
        matches!(
            result,
            Err(WharfError::Lookup(LookupError::EnvironmentUnresolved))
        ),
        format!("expected unresolved environment, got: {result:?}"),
    )
}

#[rstest]
fn explicit_override_skips_the_fetch(
    runtime: std::io::Result<tokio::runtime::Runtime>,
) -> std::io::Result<()> {
    let rt = runtime?;
    let (client, api) = FakeApi::new()
        .with_environments(vec![environment(7, "staging")])
        .into_client()
        .map_err(|error| io_error(format!("client construction should succeed: {error}")))?;

    client.set_environment(42);
    let resolved = rt
        .block_on(client.resolve_environment())
        .map_err(|error| io_error(format!("resolution should succeed: {error}")))?;

    ensure(resolved == 42, format!("expected override 42, got {resolved}"))?;
    ensure(
        api.list_environment_calls.load(Ordering::SeqCst) == 0,
        "no environment listing fetch should be issued after an override",
    )
}

#[rstest]
fn clearing_the_cache_forces_a_refetch(
    runtime: std::io::Result<tokio::runtime::Runtime>,
) -> std::io::Result<()> {
    let rt = runtime?;
    let (client, api) = FakeApi::new()
        .with_environments(vec![environment(7, "staging")])
        .into_client()
        .map_err(|error| io_error(format!("client construction should succeed: {error}")))?;

    let _ = rt
        .block_on(client.resolve_environment())
        .map_err(|error| io_error(format!("first resolution should succeed: {error}")))?;
    client.clear_environment();
    let _ = rt
        .block_on(client.resolve_environment())
        .map_err(|error| io_error(format!("second resolution should succeed: {error}")))?;

    ensure(
        api.list_environment_calls.load(Ordering::SeqCst) == 2,
        "clearing the cache should force a second fetch",
    )
}

#[rstest]
fn unconfigured_transport_is_rejected_at_construction() {
    let result = FakeApi::new().unconfigured().into_client();
    assert!(
        matches!(
            result,
            Err(WharfError::Transport(
                crate::error::TransportError::NotConfigured
            ))
        ),
        "expected construction to reject an unconfigured transport"
    );
}
