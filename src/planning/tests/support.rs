//! Shared fixtures for service-level tests.

use crate::planning::{
    adapters::memory::InMemoryPlanningStore,
    domain::TaskId,
    services::{
        OperationCategoryService, OperationService, PersonService, PlanningServiceError,
        TaskService, ValidationError,
    },
};
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::json;
use std::sync::Arc;

/// Every planning service wired to one in-memory store.
pub(super) struct Planning {
    pub(super) store: Arc<InMemoryPlanningStore>,
    pub(super) people: PersonService<InMemoryPlanningStore>,
    pub(super) tasks: TaskService<InMemoryPlanningStore>,
    pub(super) operations: OperationService<InMemoryPlanningStore, DefaultClock>,
    pub(super) categories: OperationCategoryService<InMemoryPlanningStore>,
}

#[fixture]
pub(super) fn planning() -> Planning {
    let store = Arc::new(InMemoryPlanningStore::new());
    Planning {
        people: PersonService::new(Arc::clone(&store)),
        tasks: TaskService::new(Arc::clone(&store)),
        operations: OperationService::new(Arc::clone(&store), Arc::new(DefaultClock)),
        categories: OperationCategoryService::new(Arc::clone(&store)),
        store,
    }
}

pub(super) fn validation_error<T: std::fmt::Debug>(
    result: Result<T, PlanningServiceError>,
) -> ValidationError {
    match result {
        Err(PlanningServiceError::Validation(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

/// Creates one task per name and returns their identifiers in order.
pub(super) async fn seed_tasks<const N: usize>(
    planning: &Planning,
    names: [&str; N],
) -> [TaskId; N] {
    let mut ids = Vec::with_capacity(N);
    for name in names {
        let created = planning
            .tasks
            .create(&json!({ "name": name }))
            .await
            .expect("task creation should succeed");
        ids.push(created.task.id());
    }
    ids.try_into().expect("one id per seeded task")
}
