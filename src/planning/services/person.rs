//! Person create/update/delete orchestration.

use super::details::{PersonDetails, not_found, person_details};
use super::error::{PlanningServiceError, PlanningServiceResult, UniqueKey, ValidationError};
use super::payload::{Intent, PersonPayload, decode};
use super::unit_of_work::UnitOfWork;
use crate::planning::{
    domain::{EmailAddress, Person, PersonId},
    ports::{LinkFilter, PlanningStore},
};
use serde_json::Value;
use std::sync::Arc;

/// Manages people and their task assignments.
///
/// Payload keys: `firstName`, `lastName`, `email`, `tasks` and `clearTasks`
/// (a list of task ids, or `true` to clear every assignment).
#[derive(Clone)]
pub struct PersonService<S>
where
    S: PlanningStore,
{
    store: Arc<S>,
}

impl<S> PersonService<S>
where
    S: PlanningStore,
{
    /// Creates a new person service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a person and assigns the listed tasks.
    ///
    /// Unknown task ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`] when the payload is not an
    /// object, lacks `email` or holds an invalid value,
    /// [`PlanningServiceError::Conflict`] when the email is already used, and
    /// [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn create(&self, payload: &Value) -> PlanningServiceResult<PersonDetails> {
        let input = decode::<PersonPayload>(payload)?.validate(Intent::Create)?;
        let email = input
            .patch
            .email
            .clone()
            .ok_or(ValidationError::MissingField("email"))?;
        self.ensure_email_free(&email, None).await?;

        let mut uow = UnitOfWork::begin(&*self.store);
        let id: PersonId = uow.allocate().await?;
        let mut person = Person::new(id, email);
        person.apply(input.patch);
        uow.insert(person);
        if !input.tasks.is_empty() {
            uow.sync_forward(Vec::new(), id, &input.tasks).await?;
        }
        uow.commit().await?;

        tracing::info!(person_id = %id, "created person");
        self.load(id).await
    }

    /// Applies a partial update to a person and its task assignments.
    ///
    /// Absent keys leave fields unchanged; `null` clears a name to empty.
    /// Listed clears run before listed additions.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Validation`] for a malformed payload,
    /// [`PlanningServiceError::Conflict`] when the new email belongs to
    /// another person, [`PlanningServiceError::NotFound`] when the person no
    /// longer exists, and [`PlanningServiceError::Persistence`] when the store
    /// fails.
    pub async fn update(
        &self,
        person: Person,
        payload: &Value,
    ) -> PlanningServiceResult<PersonDetails> {
        let input = decode::<PersonPayload>(payload)?.validate(Intent::Update)?;
        let id = person.id();
        if let Some(email) = &input.patch.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let mut updated = person;
        updated.apply(input.patch);
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.update(updated);
        if !input.tasks.is_empty() {
            let rows = self.store.person_task_links(LinkFilter::Left(id)).await?;
            uow.sync_forward(rows, id, &input.tasks).await?;
        }
        uow.commit().await?;

        tracing::info!(person_id = %id, "updated person");
        self.load(id).await
    }

    /// Deletes a person together with their task assignments.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::NotFound`] when the person no longer
    /// exists and [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn delete(&self, person: &Person) -> PlanningServiceResult<()> {
        let mut uow = UnitOfWork::begin(&*self.store);
        uow.remove::<Person>(person.id());
        uow.commit().await?;
        tracing::info!(person_id = %person.id(), "deleted person");
        Ok(())
    }

    /// Finds a person with their tasks.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn find(&self, id: PersonId) -> PlanningServiceResult<Option<PersonDetails>> {
        match self.store.find_person(id).await? {
            Some(person) => person_details(&*self.store, person).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lists every person with their tasks.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningServiceError::Persistence`] when the store fails.
    pub async fn list(&self) -> PlanningServiceResult<Vec<PersonDetails>> {
        let people = self.store.list_people().await?;
        let mut details = Vec::with_capacity(people.len());
        for person in people {
            details.push(person_details(&*self.store, person).await?);
        }
        Ok(details)
    }

    async fn load(&self, id: PersonId) -> PlanningServiceResult<PersonDetails> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }

    async fn ensure_email_free(
        &self,
        email: &EmailAddress,
        owner: Option<PersonId>,
    ) -> PlanningServiceResult<()> {
        match self.store.find_person_by_email(email).await? {
            Some(existing) if Some(existing.id()) != owner => {
                tracing::debug!(email = %email, "email address already taken");
                Err(PlanningServiceError::Conflict(UniqueKey::Email(
                    email.clone(),
                )))
            }
            _ => Ok(()),
        }
    }
}
