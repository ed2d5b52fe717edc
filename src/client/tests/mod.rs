//! Unit tests for the client: resolution, lookup, verification, creation.

mod support;

mod resolve_tests;

use rstest::fixture;

/// Fixture providing a multi-threaded runtime for wall-clock-free tests.
#[fixture]
fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
}

/// Fixture providing a current-thread runtime with a paused clock, so
/// timing-bound tests run instantly and deterministically.
#[fixture]
fn paused_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
}

/// Map any error into an `io::Error` for `Result`-returning tests.
fn io_error(message: impl Into<String>) -> std::io::Error {
    std::io::Error::other(message.into())
}

/// Assert a condition inside a `Result`-returning test.
fn ensure(condition: bool, message: impl Into<String>) -> std::io::Result<()> {
    if condition {
        return Ok(());
    }
    Err(io_error(message))
}
