//! Shared test helpers for in-memory store integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;
use shopfloor::planning::{
    adapters::memory::InMemoryPlanningStore,
    domain::{PersonId, TaskId},
    services::{OperationCategoryService, OperationService, PersonService, TaskService},
};
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Boxed error type for test results.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Planning services sharing one in-memory store.
pub struct Services {
    pub people: PersonService<InMemoryPlanningStore>,
    pub tasks: TaskService<InMemoryPlanningStore>,
    pub operations: OperationService<InMemoryPlanningStore, DefaultClock>,
    pub categories: OperationCategoryService<InMemoryPlanningStore>,
}

/// Provides services over a fresh in-memory store for each test.
#[fixture]
pub fn services() -> Services {
    let store = Arc::new(InMemoryPlanningStore::new());
    Services {
        people: PersonService::new(Arc::clone(&store)),
        tasks: TaskService::new(Arc::clone(&store)),
        operations: OperationService::new(Arc::clone(&store), Arc::new(DefaultClock)),
        categories: OperationCategoryService::new(store),
    }
}

/// Creates people with generated email addresses and returns their ids.
///
/// # Errors
///
/// Returns an error if any creation fails.
pub fn create_people(
    rt: &Runtime,
    services: &Services,
    count: usize,
) -> Result<Vec<PersonId>, BoxError> {
    let mut ids = Vec::with_capacity(count);
    for index in 1..=count {
        let created = rt.block_on(
            services
                .people
                .create(&json!({ "email": format!("worker{index}@example.com") })),
        )?;
        ids.push(created.person.id());
    }
    Ok(ids)
}

/// Creates a task with the given name and returns its id.
///
/// # Errors
///
/// Returns an error if creation fails.
pub fn create_task(rt: &Runtime, services: &Services, name: &str) -> Result<TaskId, BoxError> {
    let created = rt.block_on(services.tasks.create(&json!({ "name": name })))?;
    Ok(created.task.id())
}

/// Converts typed ids to the raw values used in payloads.
pub fn raw<I: Copy + Into<i64>>(ids: &[I]) -> Vec<i64> {
    ids.iter().map(|id| (*id).into()).collect()
}
