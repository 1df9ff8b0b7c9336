//! In-memory store with the same commit semantics as the `PostgreSQL`
//! adapter, used by service tests and local tooling.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use thiserror::Error;

use crate::planning::{
    domain::{
        EmailAddress, Operation, OperationCategory, OperationCategoryId, OperationId, Person,
        PersonId, RecordKind, Task, TaskId, TaskName, WorkTime, WorkTimeId,
    },
    ports::{ChangeSet, LinkFilter, PlanningStore, Record, StoreError, StoreResult},
};

/// Thread-safe in-memory planning store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningStore {
    state: Arc<RwLock<InMemoryPlanningState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryPlanningState {
    people: BTreeMap<PersonId, Person>,
    tasks: BTreeMap<TaskId, Task>,
    operations: BTreeMap<OperationId, Operation>,
    operation_categories: BTreeMap<OperationCategoryId, OperationCategory>,
    work_times: BTreeMap<WorkTimeId, WorkTime>,
    person_tasks: BTreeSet<(PersonId, TaskId)>,
    task_operations: BTreeSet<(TaskId, OperationId)>,
    operation_categories_links: BTreeSet<(OperationId, OperationCategoryId)>,
    sequences: BTreeMap<RecordKind, i64>,
}

/// Integrity rule broken by a change set.
#[derive(Debug, Error)]
#[error("constraint violation: {0}")]
struct ConstraintViolation(String);

impl InMemoryPlanningStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InMemoryPlanningState>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn violation(message: impl Into<String>) -> StoreError {
    StoreError::persistence(ConstraintViolation(message.into()))
}

fn select<L, R>(rows: &BTreeSet<(L, R)>, filter: LinkFilter<L, R>) -> Vec<(L, R)>
where
    L: Copy + PartialEq,
    R: Copy + PartialEq,
{
    rows.iter()
        .filter(|(left, right)| filter.matches(left, right))
        .copied()
        .collect()
}

impl InMemoryPlanningState {
    fn contains(&self, kind: RecordKind, id: i64) -> bool {
        match kind {
            RecordKind::Person => PersonId::new(id).is_ok_and(|key| self.people.contains_key(&key)),
            RecordKind::Task => TaskId::new(id).is_ok_and(|key| self.tasks.contains_key(&key)),
            RecordKind::Operation => {
                OperationId::new(id).is_ok_and(|key| self.operations.contains_key(&key))
            }
            RecordKind::OperationCategory => OperationCategoryId::new(id)
                .is_ok_and(|key| self.operation_categories.contains_key(&key)),
            RecordKind::WorkTime => {
                WorkTimeId::new(id).is_ok_and(|key| self.work_times.contains_key(&key))
            }
        }
    }

    fn apply(&mut self, changes: ChangeSet) -> StoreResult<()> {
        let ChangeSet {
            people,
            tasks,
            operations,
            operation_categories,
            work_times,
            person_task_links,
            task_operation_links,
            operation_category_links,
        } = changes;

        for pair in &person_task_links.removed {
            self.person_tasks.remove(pair);
        }
        for pair in &task_operation_links.removed {
            self.task_operations.remove(pair);
        }
        for pair in &operation_category_links.removed {
            self.operation_categories_links.remove(pair);
        }

        for id in work_times.removed {
            self.work_times
                .remove(&id)
                .ok_or_else(|| StoreError::not_found(RecordKind::WorkTime, id))?;
        }
        for id in people.removed {
            self.remove_person(id)?;
        }
        for id in tasks.removed {
            self.remove_task(id)?;
        }
        for id in operations.removed {
            self.remove_operation(id)?;
        }
        for id in operation_categories.removed {
            self.remove_operation_category(id)?;
        }

        for person in people.inserted {
            self.write_person(person, true)?;
        }
        for person in people.updated {
            self.write_person(person, false)?;
        }
        for task in tasks.inserted {
            self.write_task(task, true)?;
        }
        for task in tasks.updated {
            self.write_task(task, false)?;
        }
        for operation in operations.inserted {
            write_record(&mut self.operations, operation.id(), operation, true)?;
        }
        for operation in operations.updated {
            write_record(&mut self.operations, operation.id(), operation, false)?;
        }
        for category in operation_categories.inserted {
            write_record(&mut self.operation_categories, category.id(), category, true)?;
        }
        for category in operation_categories.updated {
            write_record(&mut self.operation_categories, category.id(), category, false)?;
        }
        for work_time in work_times.inserted {
            self.write_work_time(work_time, true)?;
        }
        for work_time in work_times.updated {
            self.write_work_time(work_time, false)?;
        }

        for (person, task) in person_task_links.added {
            self.require(RecordKind::Person, person.value())?;
            self.require(RecordKind::Task, task.value())?;
            self.person_tasks.insert((person, task));
        }
        for (task, operation) in task_operation_links.added {
            self.require(RecordKind::Task, task.value())?;
            self.require(RecordKind::Operation, operation.value())?;
            self.task_operations.insert((task, operation));
        }
        for (operation, category) in operation_category_links.added {
            self.require(RecordKind::Operation, operation.value())?;
            self.require(RecordKind::OperationCategory, category.value())?;
            self.operation_categories_links.insert((operation, category));
        }
        Ok(())
    }

    fn require(&self, kind: RecordKind, id: i64) -> StoreResult<()> {
        if self.contains(kind, id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { kind, id })
        }
    }

    fn write_person(&mut self, person: Person, is_new: bool) -> StoreResult<()> {
        let id = person.id();
        if self
            .people
            .values()
            .any(|other| other.id() != id && other.email() == person.email())
        {
            return Err(StoreError::DuplicateEmail(person.email().clone()));
        }
        write_record(&mut self.people, id, person, is_new)
    }

    fn write_task(&mut self, task: Task, is_new: bool) -> StoreResult<()> {
        let id = task.id();
        if self
            .tasks
            .values()
            .any(|other| other.id() != id && other.name() == task.name())
        {
            return Err(StoreError::DuplicateTaskName(task.name().clone()));
        }
        write_record(&mut self.tasks, id, task, is_new)
    }

    fn write_work_time(&mut self, work_time: WorkTime, is_new: bool) -> StoreResult<()> {
        let id = work_time.id();
        let operation_id = work_time.operation_id();
        self.require(RecordKind::Operation, operation_id.value())?;
        if self
            .work_times
            .values()
            .any(|other| other.id() != id && other.operation_id() == operation_id)
        {
            return Err(violation(format!(
                "operation {operation_id} already owns a work time"
            )));
        }
        write_record(&mut self.work_times, id, work_time, is_new)
    }

    fn remove_person(&mut self, id: PersonId) -> StoreResult<()> {
        self.people
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Person, id))?;
        self.person_tasks.retain(|(person, _)| *person != id);
        Ok(())
    }

    fn remove_task(&mut self, id: TaskId) -> StoreResult<()> {
        self.tasks
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Task, id))?;
        self.person_tasks.retain(|(_, task)| *task != id);
        self.task_operations.retain(|(task, _)| *task != id);
        Ok(())
    }

    fn remove_operation(&mut self, id: OperationId) -> StoreResult<()> {
        self.operations
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Operation, id))?;
        self.task_operations.retain(|(_, operation)| *operation != id);
        self.operation_categories_links
            .retain(|(operation, _)| *operation != id);
        self.work_times
            .retain(|_, work_time| work_time.operation_id() != id);
        Ok(())
    }

    fn remove_operation_category(&mut self, id: OperationCategoryId) -> StoreResult<()> {
        self.operation_categories
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::OperationCategory, id))?;
        self.operation_categories_links
            .retain(|(_, category)| *category != id);
        Ok(())
    }
}

fn write_record<K, T>(
    records: &mut BTreeMap<K, T>,
    id: K,
    record: T,
    is_new: bool,
) -> StoreResult<()>
where
    K: Ord + Copy + Into<i64>,
    T: Record,
{
    let exists = records.contains_key(&id);
    if is_new && exists {
        let raw: i64 = id.into();
        return Err(violation(format!("duplicate {} identifier {raw}", T::KIND)));
    }
    if !is_new && !exists {
        return Err(StoreError::not_found(T::KIND, id));
    }
    records.insert(id, record);
    Ok(())
}

#[async_trait]
impl PlanningStore for InMemoryPlanningStore {
    async fn next_id(&self, kind: RecordKind) -> StoreResult<i64> {
        let mut state = self
            .state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))?;
        let counter = state.sequences.entry(kind).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn existing_ids(&self, kind: RecordKind, ids: &[i64]) -> StoreResult<BTreeSet<i64>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.contains(kind, *id))
            .collect())
    }

    async fn find_person(&self, id: PersonId) -> StoreResult<Option<Person>> {
        Ok(self.read()?.people.get(&id).cloned())
    }

    async fn find_person_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Person>> {
        let state = self.read()?;
        Ok(state
            .people
            .values()
            .find(|person| person.email() == email)
            .cloned())
    }

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        Ok(self.read()?.people.values().cloned().collect())
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn find_task_by_name(&self, name: &TaskName) -> StoreResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.values().find(|task| task.name() == name).cloned())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.read()?.tasks.values().cloned().collect())
    }

    async fn find_operation(&self, id: OperationId) -> StoreResult<Option<Operation>> {
        Ok(self.read()?.operations.get(&id).cloned())
    }

    async fn list_operations(&self) -> StoreResult<Vec<Operation>> {
        Ok(self.read()?.operations.values().cloned().collect())
    }

    async fn find_operation_category(
        &self,
        id: OperationCategoryId,
    ) -> StoreResult<Option<OperationCategory>> {
        Ok(self.read()?.operation_categories.get(&id).cloned())
    }

    async fn list_operation_categories(&self) -> StoreResult<Vec<OperationCategory>> {
        Ok(self
            .read()?
            .operation_categories
            .values()
            .cloned()
            .collect())
    }

    async fn find_work_time(&self, id: WorkTimeId) -> StoreResult<Option<WorkTime>> {
        Ok(self.read()?.work_times.get(&id).cloned())
    }

    async fn find_work_time_for_operation(
        &self,
        operation_id: OperationId,
    ) -> StoreResult<Option<WorkTime>> {
        let state = self.read()?;
        Ok(state
            .work_times
            .values()
            .find(|work_time| work_time.operation_id() == operation_id)
            .cloned())
    }

    async fn list_work_times(&self) -> StoreResult<Vec<WorkTime>> {
        Ok(self.read()?.work_times.values().cloned().collect())
    }

    async fn person_task_links(
        &self,
        filter: LinkFilter<PersonId, TaskId>,
    ) -> StoreResult<Vec<(PersonId, TaskId)>> {
        Ok(select(&self.read()?.person_tasks, filter))
    }

    async fn task_operation_links(
        &self,
        filter: LinkFilter<TaskId, OperationId>,
    ) -> StoreResult<Vec<(TaskId, OperationId)>> {
        Ok(select(&self.read()?.task_operations, filter))
    }

    async fn operation_category_links(
        &self,
        filter: LinkFilter<OperationId, OperationCategoryId>,
    ) -> StoreResult<Vec<(OperationId, OperationCategoryId)>> {
        Ok(select(&self.read()?.operation_categories_links, filter))
    }

    async fn commit(&self, changes: ChangeSet) -> StoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))?;
        let mut next = state.clone();
        next.apply(changes)?;
        *state = next;
        Ok(())
    }
}
