//! Work-time lifecycle: opening, stamping, editing and removal.

use super::details::not_found;
use super::error::PlanningServiceResult;
use super::payload::{WorkTimePayload, decode};
use super::unit_of_work::UnitOfWork;
use crate::planning::{
    domain::{OperationId, WorkTime, WorkTimeId},
    ports::PlanningStore,
};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// Opens, stamps and removes the work-time records owned by operations.
#[derive(Clone)]
pub struct WorkTimeService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> WorkTimeService<S, C>
where
    S: PlanningStore,
    C: Clock + Send + Sync,
{
    /// Creates a new work-time service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Stages a new record for an operation with `creation_date` set to now.
    ///
    /// The record is written when the caller commits `uow`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when no identifier can be allocated.
    pub async fn create_for(
        &self,
        uow: &mut UnitOfWork<'_, S>,
        operation_id: OperationId,
    ) -> PlanningServiceResult<WorkTime> {
        let id: WorkTimeId = uow.allocate().await?;
        let work_time = WorkTime::open(id, operation_id, &*self.clock);
        uow.insert(work_time.clone());
        tracing::debug!(work_time_id = %id, operation_id = %operation_id, "opened work time");
        Ok(work_time)
    }

    /// Stages `updated_date = now` on the operation's record, if it has one.
    ///
    /// Returns the stamped record, or `None` when the operation owns no
    /// record.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn touch(
        &self,
        uow: &mut UnitOfWork<'_, S>,
        operation_id: OperationId,
    ) -> PlanningServiceResult<Option<WorkTime>> {
        let Some(mut work_time) = uow
            .store()
            .find_work_time_for_operation(operation_id)
            .await?
        else {
            return Ok(None);
        };
        work_time.touch(&*self.clock);
        uow.update(work_time.clone());
        Ok(Some(work_time))
    }

    /// Edits start, end, deadline and notes, stamping `updated_date`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`](super::PlanningServiceError::Validation)
    /// for a malformed payload and
    /// [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the record no longer exists.
    pub async fn update(
        &self,
        work_time: WorkTime,
        payload: &Value,
    ) -> PlanningServiceResult<WorkTime> {
        let patch = decode::<WorkTimePayload>(payload)?.validate()?;
        let mut updated = work_time;
        updated.apply(patch, &*self.clock);

        let mut uow = UnitOfWork::begin(&*self.store);
        uow.update(updated.clone());
        uow.commit().await?;
        tracing::info!(work_time_id = %updated.id(), "updated work time");
        Ok(updated)
    }

    /// Removes a record in its own unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the record is already gone and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store rejects the removal.
    pub async fn delete(&self, work_time: &WorkTime) -> PlanningServiceResult<()> {
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.remove::<WorkTime>(work_time.id());
        uow.commit().await?;
        tracing::info!(work_time_id = %work_time.id(), "deleted work time");
        Ok(())
    }

    /// Finds a record by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn find(&self, id: WorkTimeId) -> PlanningServiceResult<Option<WorkTime>> {
        Ok(self.store.find_work_time(id).await?)
    }

    /// Finds the record owned by an operation.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn find_for_operation(
        &self,
        operation_id: OperationId,
    ) -> PlanningServiceResult<Option<WorkTime>> {
        Ok(self.store.find_work_time_for_operation(operation_id).await?)
    }

    /// Loads a record, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the record does not exist.
    pub async fn get(&self, id: WorkTimeId) -> PlanningServiceResult<WorkTime> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }

    /// Lists every record ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<WorkTime>> {
        Ok(self.store.list_work_times().await?)
    }
}
