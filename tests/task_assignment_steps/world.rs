//! Shared world state for task assignment BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use shopfloor::planning::{
    adapters::memory::InMemoryPlanningStore,
    domain::Person,
    services::{
        OperationDetails, OperationService, PersonDetails, PersonService, PlanningServiceError,
        TaskDetails, TaskService,
    },
};

/// Scenario world for task assignment behaviour tests.
pub struct PlanningWorld {
    pub people: PersonService<InMemoryPlanningStore>,
    pub tasks: TaskService<InMemoryPlanningStore>,
    pub operations: OperationService<InMemoryPlanningStore, DefaultClock>,
    pub people_by_email: BTreeMap<String, Person>,
    pub last_task: Option<TaskDetails>,
    pub last_operation: Option<OperationDetails>,
    pub last_person_result: Option<Result<PersonDetails, PlanningServiceError>>,
}

impl PlanningWorld {
    /// Creates a world backed by an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryPlanningStore::new());
        Self {
            people: PersonService::new(Arc::clone(&store)),
            tasks: TaskService::new(Arc::clone(&store)),
            operations: OperationService::new(store, Arc::new(DefaultClock)),
            people_by_email: BTreeMap::new(),
            last_task: None,
            last_operation: None,
            last_person_result: None,
        }
    }

    /// Returns the person created with `email` earlier in the scenario.
    pub fn person(&self, email: &str) -> Result<&Person, eyre::Report> {
        self.people_by_email
            .get(email)
            .ok_or_else(|| eyre::eyre!("no person with email {email} in scenario world"))
    }

    /// Returns the task created earlier in the scenario.
    pub fn task(&self) -> Result<&TaskDetails, eyre::Report> {
        self.last_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for PlanningWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PlanningWorld {
    PlanningWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
