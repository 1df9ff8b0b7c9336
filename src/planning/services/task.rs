//! Task create/update/delete orchestration.

use super::details::{TaskDetails, not_found, task_details};
use super::error::{PlanningServiceError, PlanningServiceResult, UniqueKey, ValidationError};
use super::payload::{Intent, TaskPayload, decode};
use super::unit_of_work::UnitOfWork;
use crate::planning::{
    domain::{Task, TaskId, TaskName},
    ports::{LinkFilter, PlanningStore},
};
use serde_json::Value;
use std::sync::Arc;

/// Manages tasks, their assigned people and their operations.
///
/// Payload keys: `name`, `description`, `priority`, `status`,
/// `productionOrderNumber`, `deadlineFrom`, `deadlineTo`, `outerId`,
/// `users`/`clearUsers` (also accepted as `employees`/`clearEmployees`) and
/// `operations`/`clearOperations`.
///
/// Tasks own no work-time record, so task updates stamp nothing.
#[derive(Clone)]
pub struct TaskService<S>
where
    S: PlanningStore,
{
    store: Arc<S>,
}

impl<S> TaskService<S>
where
    S: PlanningStore,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a task and links the listed people and operations.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`] when the payload lacks a
    /// name or holds an invalid value (including an unknown priority or
    /// status label), [`PlanningServiceError::Conflict`] when the name is
    /// taken, and [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn create(&self, payload: &Value) -> PlanningServiceResult<TaskDetails> {
        let input = decode::<TaskPayload>(payload)?.validate(Intent::Create)?;
        let name = input
            .patch
            .name
            .clone()
            .ok_or(ValidationError::MissingField("name"))?;
        self.ensure_name_free(&name, None).await?;

        let mut uow = UnitOfWork::begin(&*self.store);
        let id: TaskId = uow.allocate().await?;
        let mut task = Task::new(id, name);
        task.apply(input.patch);
        uow.insert(task);
        if !input.people.is_empty() {
            uow.sync_inverse(Vec::new(), id, &input.people).await?;
        }
        if !input.operations.is_empty() {
            uow.sync_forward(Vec::new(), id, &input.operations).await?;
        }
        uow.commit().await?;

        tracing::info!(task_id = %id, "created task");
        self.load(id).await
    }

    /// Applies a partial update to a task and its associations.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`] for a malformed payload,
    /// [`PlanningServiceError::Conflict`] when the new name belongs to another
    /// task, [`PlanningServiceError::NotFound`] when the task no longer
    /// exists, and [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn update(&self, task: Task, payload: &Value) -> PlanningServiceResult<TaskDetails> {
        let input = decode::<TaskPayload>(payload)?.validate(Intent::Update)?;
        let id = task.id();
        if let Some(name) = &input.patch.name {
            self.ensure_name_free(name, Some(id)).await?;
        }

        let mut updated = task;
        updated.apply(input.patch);
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.update(updated);
        if !input.people.is_empty() {
            let rows = self.store.person_task_links(LinkFilter::Right(id)).await?;
            uow.sync_inverse(rows, id, &input.people).await?;
        }
        if !input.operations.is_empty() {
            let rows = self.store.task_operation_links(LinkFilter::Left(id)).await?;
            uow.sync_forward(rows, id, &input.operations).await?;
        }
        uow.commit().await?;

        tracing::info!(task_id = %id, "updated task");
        self.load(id).await
    }

    /// Deletes a task together with its link rows.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NotFound`] when the task no longer
    /// exists and [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn delete(&self, task: &Task) -> PlanningServiceResult<()> {
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.remove::<Task>(task.id());
        uow.commit().await?;
        tracing::info!(task_id = %task.id(), "deleted task");
        Ok(())
    }

    /// Finds a task with its linked ids.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn find(&self, id: TaskId) -> PlanningServiceResult<Option<TaskDetails>> {
        match self.store.find_task(id).await? {
            Some(task) => task_details(&*self.store, task).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lists every task with its linked ids.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<TaskDetails>> {
        let tasks = self.store.list_tasks().await?;
        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            details.push(task_details(&*self.store, task).await?);
        }
        Ok(details)
    }

    async fn load(&self, id: TaskId) -> PlanningServiceResult<TaskDetails> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }

    async fn ensure_name_free(
        &self,
        name: &TaskName,
        owner: Option<TaskId>,
    ) -> PlanningServiceResult<()> {
        match self.store.find_task_by_name(name).await? {
            Some(existing) if Some(existing.id()) != owner => {
                tracing::debug!(task_name = %name, "task name already taken");
                Err(PlanningServiceError::Conflict(UniqueKey::TaskName(
                    name.clone(),
                )))
            }
            _ => Ok(()),
        }
    }
}
