//! Shared test support: a stateful in-memory management API.
//!
//! `FakeApi` simulates the remote side closely enough for orchestration
//! tests: listings are served from in-memory collections, creation calls
//! are counted, and materialization (whether a created resource actually
//! appears in subsequent listings) is configurable so verification can be
//! made to succeed or fail deterministically.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::api::{
    ApiFuture, Container, ContainerCreateResponse, Environment, EnvironmentId, ManagementApi,
    Stack, StackCreateRequest,
};
use crate::client::WharfClient;
use crate::error::{Result, TransportError, WharfError};

/// Stateful in-memory stand-in for the management API.
pub(super) struct FakeApi {
    configured: bool,
    fail_environment_listing: bool,
    fail_stack_listing: bool,
    fail_container_listing: bool,
    fail_create_stack: bool,
    materialize: bool,
    environments: Mutex<Vec<Environment>>,
    stacks: Mutex<Vec<Stack>>,
    containers: Mutex<Vec<Container>>,
    next_stack_id: AtomicI64,
    pub(super) list_environment_calls: AtomicUsize,
    pub(super) list_stack_calls: AtomicUsize,
    pub(super) list_container_calls: AtomicUsize,
    pub(super) create_stack_calls: AtomicUsize,
    pub(super) create_container_calls: AtomicUsize,
    pub(super) stop_calls: AtomicUsize,
    pub(super) remove_calls: AtomicUsize,
}

impl FakeApi {
    pub(super) fn new() -> Self {
        Self {
            configured: true,
            fail_environment_listing: false,
            fail_stack_listing: false,
            fail_container_listing: false,
            fail_create_stack: false,
            materialize: true,
            environments: Mutex::new(Vec::new()),
            stacks: Mutex::new(Vec::new()),
            containers: Mutex::new(Vec::new()),
            next_stack_id: AtomicI64::new(100),
            list_environment_calls: AtomicUsize::new(0),
            list_stack_calls: AtomicUsize::new(0),
            list_container_calls: AtomicUsize::new(0),
            create_stack_calls: AtomicUsize::new(0),
            create_container_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn with_environments(self, environments: Vec<Environment>) -> Self {
        *lock(&self.environments) = environments;
        self
    }

    pub(super) fn with_stacks(self, stacks: Vec<Stack>) -> Self {
        *lock(&self.stacks) = stacks;
        self
    }

    pub(super) fn with_containers(self, containers: Vec<Container>) -> Self {
        *lock(&self.containers) = containers;
        self
    }

    pub(super) fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub(super) fn failing_environment_listing(mut self) -> Self {
        self.fail_environment_listing = true;
        self
    }

    pub(super) fn failing_stack_listing(mut self) -> Self {
        self.fail_stack_listing = true;
        self
    }

    pub(super) fn failing_container_listing(mut self) -> Self {
        self.fail_container_listing = true;
        self
    }

    pub(super) fn failing_create_stack(mut self) -> Self {
        self.fail_create_stack = true;
        self
    }

    /// Creation calls succeed but the resource never appears in listings,
    /// so verification is guaranteed to fail.
    pub(super) fn without_materialization(mut self) -> Self {
        self.materialize = false;
        self
    }

    /// Wrap the fake in a client handle, keeping a shared reference for
    /// inspecting counters and state afterwards.
    pub(super) fn into_client(self) -> Result<(WharfClient<Arc<Self>>, Arc<Self>)> {
        let api = Arc::new(self);
        let client = WharfClient::new(Arc::clone(&api))?;
        Ok((client, api))
    }

    pub(super) fn container_names(&self) -> Vec<String> {
        lock(&self.containers)
            .iter()
            .flat_map(|container| container.names.clone())
            .collect()
    }
}

/// A standard environment fixture value.
pub(super) fn environment(id: EnvironmentId, name: &str) -> Environment {
    Environment {
        id,
        name: String::from(name),
    }
}

/// A standard stack fixture value.
pub(super) fn stack(id: i64, name: &str, environment_id: EnvironmentId) -> Stack {
    Stack {
        id,
        name: String::from(name),
        environment_id,
    }
}

/// A standard container fixture value.
pub(super) fn container(id: &str, name: &str, image: &str, state: &str) -> Container {
    Container {
        id: String::from(id),
        names: vec![format!("/{name}")],
        image: String::from(image),
        labels: std::collections::HashMap::new(),
        state: String::from(state),
        status: String::from("Up 5 minutes"),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn unavailable(path: &str) -> WharfError {
    TransportError::RequestFailed {
        method: String::from("GET"),
        path: String::from(path),
        message: String::from("connection refused"),
    }
    .into()
}

impl ManagementApi for Arc<FakeApi> {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn list_environments(&self) -> ApiFuture<'_, Vec<Environment>> {
        self.list_environment_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_environment_listing {
            Err(unavailable("/api/endpoints"))
        } else {
            Ok(lock(&self.environments).clone())
        };
        Box::pin(async move { result })
    }

    fn list_stacks(&self) -> ApiFuture<'_, Vec<Stack>> {
        self.list_stack_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_stack_listing {
            Err(unavailable("/api/stacks"))
        } else {
            Ok(lock(&self.stacks).clone())
        };
        Box::pin(async move { result })
    }

    fn list_containers(&self, _environment_id: EnvironmentId) -> ApiFuture<'_, Vec<Container>> {
        self.list_container_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_container_listing {
            Err(unavailable("/api/endpoints/1/docker/containers/json"))
        } else {
            Ok(lock(&self.containers).clone())
        };
        Box::pin(async move { result })
    }

    fn create_stack(
        &self,
        environment_id: EnvironmentId,
        request: StackCreateRequest,
    ) -> ApiFuture<'_, Stack> {
        self.create_stack_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_create_stack {
            Err(unavailable("/api/stacks/create/standalone/string"))
        } else {
            let created = Stack {
                id: self.next_stack_id.fetch_add(1, Ordering::SeqCst),
                name: String::from(request.name()),
                environment_id,
            };
            if self.materialize {
                lock(&self.stacks).push(created.clone());
            }
            Ok(created)
        };
        Box::pin(async move { result })
    }

    fn create_container(
        &self,
        _environment_id: EnvironmentId,
        name: String,
        _payload: serde_json::Value,
    ) -> ApiFuture<'_, ContainerCreateResponse> {
        let call = self.create_container_calls.fetch_add(1, Ordering::SeqCst);
        let id = format!("ctr-{call}");
        if self.materialize {
            lock(&self.containers).push(Container {
                id: id.clone(),
                names: vec![format!("/{name}")],
                image: String::from("fake-image"),
                labels: std::collections::HashMap::new(),
                state: String::from("created"),
                status: String::from("Created"),
            });
        }
        let result: Result<ContainerCreateResponse> = Ok(ContainerCreateResponse {
            id,
            warnings: Vec::new(),
        });
        Box::pin(async move { result })
    }

    fn stop_container(
        &self,
        _environment_id: EnvironmentId,
        container_id: String,
    ) -> ApiFuture<'_, ()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut containers = lock(&self.containers);
            if let Some(stopped) = containers
                .iter_mut()
                .find(|container| container.id == container_id)
            {
                stopped.state = String::from("exited");
            }
        }
        let result: Result<()> = Ok(());
        Box::pin(async move { result })
    }

    fn remove_container(
        &self,
        _environment_id: EnvironmentId,
        container_id: String,
    ) -> ApiFuture<'_, ()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.containers).retain(|container| container.id != container_id);
        let result: Result<()> = Ok(());
        Box::pin(async move { result })
    }
}
