//! Store port for planning records, their link rows and atomic change sets.

use crate::planning::domain::{
    EmailAddress, LinkTable, Operation, OperationCategory, OperationCategoryId, OperationId,
    Person, PersonId, RecordId, RecordKind, Task, TaskId, TaskName, WorkTime, WorkTimeId,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planning store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Selects link rows by one side of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFilter<L, R> {
    /// Rows whose left-hand id matches.
    Left(L),
    /// Rows whose right-hand id matches.
    Right(R),
}

impl<L: PartialEq, R: PartialEq> LinkFilter<L, R> {
    /// Returns `true` when the row is selected by the filter.
    #[must_use]
    pub fn matches(&self, left: &L, right: &R) -> bool {
        match self {
            Self::Left(wanted) => wanted == left,
            Self::Right(wanted) => wanted == right,
        }
    }
}

/// Planning persistence contract.
///
/// Reads observe committed state only. Every write goes through
/// [`PlanningStore::commit`], which applies a whole [`ChangeSet`] or nothing.
#[async_trait]
pub trait PlanningStore: Send + Sync {
    /// Allocates a fresh identifier for a record kind.
    ///
    /// Allocated identifiers are never handed out twice, even when the change
    /// set that used them is never committed.
    async fn next_id(&self, kind: RecordKind) -> StoreResult<i64>;

    /// Returns the subset of `ids` that refer to existing records of `kind`.
    async fn existing_ids(&self, kind: RecordKind, ids: &[i64]) -> StoreResult<BTreeSet<i64>>;

    /// Finds a person by identifier.
    async fn find_person(&self, id: PersonId) -> StoreResult<Option<Person>>;

    /// Finds the person holding an email address.
    async fn find_person_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Person>>;

    /// Returns all people ordered by identifier.
    async fn list_people(&self) -> StoreResult<Vec<Person>>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Finds the task carrying a name.
    async fn find_task_by_name(&self, name: &TaskName) -> StoreResult<Option<Task>>;

    /// Returns all tasks ordered by identifier.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Finds an operation by identifier.
    async fn find_operation(&self, id: OperationId) -> StoreResult<Option<Operation>>;

    /// Returns all operations ordered by identifier.
    async fn list_operations(&self) -> StoreResult<Vec<Operation>>;

    /// Finds an operation category by identifier.
    async fn find_operation_category(
        &self,
        id: OperationCategoryId,
    ) -> StoreResult<Option<OperationCategory>>;

    /// Returns all operation categories ordered by identifier.
    async fn list_operation_categories(&self) -> StoreResult<Vec<OperationCategory>>;

    /// Finds a work-time record by identifier.
    async fn find_work_time(&self, id: WorkTimeId) -> StoreResult<Option<WorkTime>>;

    /// Finds the work-time record owned by an operation.
    async fn find_work_time_for_operation(
        &self,
        operation_id: OperationId,
    ) -> StoreResult<Option<WorkTime>>;

    /// Returns all work-time records ordered by identifier.
    async fn list_work_times(&self) -> StoreResult<Vec<WorkTime>>;

    /// Returns person-task link rows selected by the filter.
    async fn person_task_links(
        &self,
        filter: LinkFilter<PersonId, TaskId>,
    ) -> StoreResult<Vec<(PersonId, TaskId)>>;

    /// Returns task-operation link rows selected by the filter.
    async fn task_operation_links(
        &self,
        filter: LinkFilter<TaskId, OperationId>,
    ) -> StoreResult<Vec<(TaskId, OperationId)>>;

    /// Returns operation-category link rows selected by the filter.
    async fn operation_category_links(
        &self,
        filter: LinkFilter<OperationId, OperationCategoryId>,
    ) -> StoreResult<Vec<(OperationId, OperationCategoryId)>>;

    /// Applies a change set atomically.
    ///
    /// Removing a record also removes its link rows; removing an operation
    /// also removes its work-time record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEmail`] or
    /// [`StoreError::DuplicateTaskName`] when a unique key would be violated,
    /// and [`StoreError::NotFound`] when an update or link targets a missing
    /// record. Nothing is applied when an error is returned.
    async fn commit(&self, changes: ChangeSet) -> StoreResult<()>;
}

/// Errors returned by planning store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Another person already uses the email address.
    #[error("email address already exists: {0}")]
    DuplicateEmail(EmailAddress),

    /// Another task already uses the name.
    #[error("task name already exists: {0}")]
    DuplicateTaskName(TaskName),

    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing record.
        kind: RecordKind,
        /// Identifier of the missing record.
        id: i64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a not-found error for a typed identifier.
    #[must_use]
    pub fn not_found(kind: RecordKind, id: impl Into<i64>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Inserted, updated and removed records of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChanges<T: Record> {
    /// Records that do not exist yet.
    pub inserted: Vec<T>,
    /// Existing records to overwrite.
    pub updated: Vec<T>,
    /// Identifiers of records to remove.
    pub removed: Vec<T::Id>,
}

impl<T: Record> Default for RecordChanges<T> {
    fn default() -> Self {
        Self {
            inserted: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<T: Record> RecordChanges<T> {
    /// Returns `true` when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Stages a record, folding repeated writes to the same id.
    fn stage_write(&mut self, record: T, is_new: bool) {
        let id = record.record_id();
        if let Some(slot) = self.inserted.iter_mut().find(|r| r.record_id() == id) {
            *slot = record;
        } else if let Some(slot) = self.updated.iter_mut().find(|r| r.record_id() == id) {
            *slot = record;
        } else if is_new {
            self.inserted.push(record);
        } else {
            self.updated.push(record);
        }
    }

    fn stage_removal(&mut self, id: T::Id) {
        let was_inserted = self.inserted.iter().any(|r| r.record_id() == id);
        self.inserted.retain(|r| r.record_id() != id);
        self.updated.retain(|r| r.record_id() != id);
        if !was_inserted && !self.removed.contains(&id) {
            self.removed.push(id);
        }
    }
}

/// Added and removed rows of one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkChanges<L, R> {
    /// Rows to insert.
    pub added: Vec<(L, R)>,
    /// Rows to delete.
    pub removed: Vec<(L, R)>,
}

impl<L, R> Default for LinkChanges<L, R> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<L, R> LinkChanges<L, R>
where
    L: Ord + Copy,
    R: Ord + Copy,
{
    /// Returns `true` when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Folds the pending changes of a link table into this set.
    pub fn absorb(&mut self, table: &LinkTable<L, R>) {
        for pair in table.removed() {
            if let Some(position) = self.added.iter().position(|p| *p == pair) {
                self.added.remove(position);
            } else if !self.removed.contains(&pair) {
                self.removed.push(pair);
            }
        }
        for pair in table.added() {
            if let Some(position) = self.removed.iter().position(|p| *p == pair) {
                self.removed.remove(position);
            } else if !self.added.contains(&pair) {
                self.added.push(pair);
            }
        }
    }
}

/// Every write of one service call, applied together by
/// [`PlanningStore::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Person writes.
    pub people: RecordChanges<Person>,
    /// Task writes.
    pub tasks: RecordChanges<Task>,
    /// Operation writes.
    pub operations: RecordChanges<Operation>,
    /// Operation category writes.
    pub operation_categories: RecordChanges<OperationCategory>,
    /// Work-time writes.
    pub work_times: RecordChanges<WorkTime>,
    /// Person-task link changes.
    pub person_task_links: LinkChanges<PersonId, TaskId>,
    /// Task-operation link changes.
    pub task_operation_links: LinkChanges<TaskId, OperationId>,
    /// Operation-category link changes.
    pub operation_category_links: LinkChanges<OperationId, OperationCategoryId>,
}

impl ChangeSet {
    /// Returns `true` when nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.tasks.is_empty()
            && self.operations.is_empty()
            && self.operation_categories.is_empty()
            && self.work_times.is_empty()
            && self.person_task_links.is_empty()
            && self.task_operation_links.is_empty()
            && self.operation_category_links.is_empty()
    }

    /// Stages a new record.
    pub fn insert<T: Record>(&mut self, record: T) {
        T::changes_mut(self).stage_write(record, true);
    }

    /// Stages an overwrite of an existing record.
    pub fn update<T: Record>(&mut self, record: T) {
        T::changes_mut(self).stage_write(record, false);
    }

    /// Stages the removal of a record.
    pub fn remove<T: Record>(&mut self, id: T::Id) {
        T::changes_mut(self).stage_removal(id);
    }

    /// Folds the pending changes of a link table into the matching relation.
    pub fn stage_links<L, R>(&mut self, table: &LinkTable<L, R>)
    where
        L: Ord + Copy,
        R: Ord + Copy,
        (L, R): LinkRow<Left = L, Right = R>,
    {
        <(L, R) as LinkRow>::changes_mut(self).absorb(table);
    }
}

/// A row type of one of the planning relations.
pub trait LinkRow {
    /// Left-hand identifier type.
    type Left;
    /// Right-hand identifier type.
    type Right;

    /// Returns the change slot for this relation.
    fn changes_mut(changes: &mut ChangeSet) -> &mut LinkChanges<Self::Left, Self::Right>;
}

impl LinkRow for (PersonId, TaskId) {
    type Left = PersonId;
    type Right = TaskId;

    fn changes_mut(changes: &mut ChangeSet) -> &mut LinkChanges<PersonId, TaskId> {
        &mut changes.person_task_links
    }
}

impl LinkRow for (TaskId, OperationId) {
    type Left = TaskId;
    type Right = OperationId;

    fn changes_mut(changes: &mut ChangeSet) -> &mut LinkChanges<TaskId, OperationId> {
        &mut changes.task_operation_links
    }
}

impl LinkRow for (OperationId, OperationCategoryId) {
    type Left = OperationId;
    type Right = OperationCategoryId;

    fn changes_mut(
        changes: &mut ChangeSet,
    ) -> &mut LinkChanges<OperationId, OperationCategoryId> {
        &mut changes.operation_category_links
    }
}

/// A planning record that can be staged in a [`ChangeSet`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier type of the record.
    type Id: RecordId;

    /// Kind of the record.
    const KIND: RecordKind;

    /// Returns the record identifier.
    fn record_id(&self) -> Self::Id;

    /// Returns the change slot for this record kind.
    fn changes_mut(changes: &mut ChangeSet) -> &mut RecordChanges<Self>;
}

macro_rules! impl_record {
    ($record:ty, $id:ty, $kind:expr, $slot:ident) => {
        impl Record for $record {
            type Id = $id;
            const KIND: RecordKind = $kind;

            fn record_id(&self) -> Self::Id {
                self.id()
            }

            fn changes_mut(changes: &mut ChangeSet) -> &mut RecordChanges<Self> {
                &mut changes.$slot
            }
        }
    };
}

impl_record!(Person, PersonId, RecordKind::Person, people);
impl_record!(Task, TaskId, RecordKind::Task, tasks);
impl_record!(Operation, OperationId, RecordKind::Operation, operations);
impl_record!(
    OperationCategory,
    OperationCategoryId,
    RecordKind::OperationCategory,
    operation_categories
);
impl_record!(WorkTime, WorkTimeId, RecordKind::WorkTime, work_times);
