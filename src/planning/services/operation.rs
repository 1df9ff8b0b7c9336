//! Operation create/update/delete orchestration.

use super::details::{OperationDetails, not_found, operation_details};
use super::error::PlanningServiceResult;
use super::payload::{OperationPayload, decode};
use super::unit_of_work::UnitOfWork;
use super::work_time::WorkTimeService;
use crate::planning::{
    domain::{Operation, OperationId},
    ports::{LinkFilter, PlanningStore},
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// Manages operations, their task and category links, and the work-time
/// record each operation owns.
///
/// Payload keys: `name`, `description`, `outerId`, `deadlineFrom`,
/// `deadlineTo`, `tasks`/`clearTasks` and
/// `operationCategories`/`clearOperationCategories`.
#[derive(Clone)]
pub struct OperationService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    work_times: WorkTimeService<S, C>,
}

impl<S, C> OperationService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    /// Creates a new operation service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let work_times = WorkTimeService::new(Arc::clone(&store), clock);
        Self { store, work_times }
    }

    /// Returns the work-time service sharing this service's store and clock.
    #[must_use]
    pub const fn work_times(&self) -> &WorkTimeService<S, C> {
        &self.work_times
    }

    /// Creates an operation, links it, and opens its work-time record.
    ///
    /// The operation, its links and its work-time record are committed
    /// together.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`](super::PlanningServiceError::Validation)
    /// for a malformed payload and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store fails.
    pub async fn create(&self, payload: &Value) -> PlanningServiceResult<OperationDetails> {
        let input = decode::<OperationPayload>(payload)?.validate()?;

        let mut uow = UnitOfWork::begin(&*self.store);
        let id: OperationId = uow.allocate().await?;
        let mut operation = Operation::new(id);
        operation.apply(input.patch);
        uow.insert(operation);
        if !input.tasks.is_empty() {
            uow.sync_inverse(Vec::new(), id, &input.tasks).await?;
        }
        if !input.categories.is_empty() {
            uow.sync_forward(Vec::new(), id, &input.categories).await?;
        }
        self.work_times.create_for(&mut uow, id).await?;
        uow.commit().await?;

        tracing::info!(operation_id = %id, "created operation");
        self.load(id).await
    }

    /// Applies a partial update, synchronizes links and stamps the owned
    /// work-time record.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`](super::PlanningServiceError::Validation)
    /// for a malformed payload,
    /// [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the operation no longer exists, and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store fails.
    pub async fn update(
        &self,
        operation: Operation,
        payload: &Value,
    ) -> PlanningServiceResult<OperationDetails> {
        let input = decode::<OperationPayload>(payload)?.validate()?;
        let id = operation.id();

        let mut updated = operation;
        updated.apply(input.patch);
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.update(updated);
        if !input.tasks.is_empty() {
            let rows = self.store.task_operation_links(LinkFilter::Right(id)).await?;
            uow.sync_inverse(rows, id, &input.tasks).await?;
        }
        if !input.categories.is_empty() {
            let rows = self
                .store
                .operation_category_links(LinkFilter::Left(id))
                .await?;
            uow.sync_forward(rows, id, &input.categories).await?;
        }
        self.work_times.touch(&mut uow, id).await?;
        uow.commit().await?;

        tracing::info!(operation_id = %id, "updated operation");
        self.load(id).await
    }

    /// Deletes an operation, its link rows and its work-time record.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the operation no longer exists and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store fails.
    pub async fn delete(&self, operation: &Operation) -> PlanningServiceResult<()> {
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.remove::<Operation>(operation.id());
        uow.commit().await?;
        tracing::info!(operation_id = %operation.id(), "deleted operation");
        Ok(())
    }

    /// Finds an operation with its links and work-time record.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn find(&self, id: OperationId) -> PlanningServiceResult<Option<OperationDetails>> {
        match self.store.find_operation(id).await? {
            Some(operation) => operation_details(&*self.store, operation).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lists every operation with its links and work-time record.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<OperationDetails>> {
        let operations = self.store.list_operations().await?;
        let mut details = Vec::with_capacity(operations.len());
        for operation in operations {
            details.push(operation_details(&*self.store, operation).await?);
        }
        Ok(details)
    }

    async fn load(&self, id: OperationId) -> PlanningServiceResult<OperationDetails> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }
}
