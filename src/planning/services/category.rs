//! Operation category create/update/delete orchestration.

use super::details::{OperationCategoryDetails, not_found, operation_category_details};
use super::error::{PlanningServiceResult, ValidationError};
use super::payload::{Intent, OperationCategoryPayload, decode};
use super::unit_of_work::UnitOfWork;
use crate::planning::{
    domain::{OperationCategory, OperationCategoryId},
    ports::{LinkFilter, PlanningStore},
};
use serde_json::Value;
use std::sync::Arc;

/// Manages operation categories and the operations grouped in them.
///
/// Payload keys: `name`, `description`, `operationNumberFrom` (required on
/// create), `operationNumberTo` and `operations`/`clearOperations`.
#[derive(Clone)]
pub struct OperationCategoryService<S>
where
    S: PlanningStore,
{
    store: Arc<S>,
}

impl<S> OperationCategoryService<S>
where
    S: PlanningStore,
{
    /// Creates a new operation category service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a category and groups the listed operations in it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`](super::PlanningServiceError::Validation)
    /// when `operationNumberFrom` is missing or the payload is malformed, and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store fails.
    pub async fn create(&self, payload: &Value) -> PlanningServiceResult<OperationCategoryDetails> {
        let input = decode::<OperationCategoryPayload>(payload)?.validate(Intent::Create)?;
        let from = input
            .patch
            .operation_number_from
            .ok_or(ValidationError::MissingField("operationNumberFrom"))?;

        let mut uow = UnitOfWork::begin(&*self.store);
        let id: OperationCategoryId = uow.allocate().await?;
        let mut category = OperationCategory::new(id, from);
        category.apply(input.patch);
        uow.insert(category);
        if !input.operations.is_empty() {
            uow.sync_inverse(Vec::new(), id, &input.operations).await?;
        }
        uow.commit().await?;

        tracing::info!(operation_category_id = %id, "created operation category");
        self.load(id).await
    }

    /// Applies a partial update and synchronizes grouped operations.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`](super::PlanningServiceError::Validation)
    /// for a malformed payload (including `operationNumberFrom: null`),
    /// [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the category no longer exists, and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store fails.
    pub async fn update(
        &self,
        category: OperationCategory,
        payload: &Value,
    ) -> PlanningServiceResult<OperationCategoryDetails> {
        let input = decode::<OperationCategoryPayload>(payload)?.validate(Intent::Update)?;
        let id = category.id();

        let mut updated = category;
        updated.apply(input.patch);
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.update(updated);
        if !input.operations.is_empty() {
            let rows = self
                .store
                .operation_category_links(LinkFilter::Right(id))
                .await?;
            uow.sync_inverse(rows, id, &input.operations).await?;
        }
        uow.commit().await?;

        tracing::info!(operation_category_id = %id, "updated operation category");
        self.load(id).await
    }

    /// Deletes a category and its link rows.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NotFound`](super::PlanningServiceError::NotFound)
    /// when the category no longer exists and
    /// [`PlanningServiceError::Persistence`](super::PlanningServiceError::Persistence)
    /// when the store fails.
    pub async fn delete(&self, category: &OperationCategory) -> PlanningServiceResult<()> {
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.remove::<OperationCategory>(category.id());
        uow.commit().await?;
        tracing::info!(operation_category_id = %category.id(), "deleted operation category");
        Ok(())
    }

    /// Finds a category with its operation ids.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn find(
        &self,
        id: OperationCategoryId,
    ) -> PlanningServiceResult<Option<OperationCategoryDetails>> {
        match self.store.find_operation_category(id).await? {
            Some(category) => operation_category_details(&*self.store, category)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    /// Lists every category with its operation ids.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lookup fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<OperationCategoryDetails>> {
        let categories = self.store.list_operation_categories().await?;
        let mut details = Vec::with_capacity(categories.len());
        for category in categories {
            details.push(operation_category_details(&*self.store, category).await?);
        }
        Ok(details)
    }

    async fn load(&self, id: OperationCategoryId) -> PlanningServiceResult<OperationCategoryDetails> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }
}
