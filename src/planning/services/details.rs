//! Read models returned by planning services.

use super::error::{PlanningServiceError, PlanningServiceResult};
use crate::planning::{
    domain::{
        Operation, OperationCategory, OperationCategoryId, OperationId, Person, PersonId,
        RecordId, Task, TaskId, WorkTime,
    },
    ports::{LinkFilter, PlanningStore},
};

/// A person with the tasks assigned to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDetails {
    /// The person.
    pub person: Person,
    /// Assigned tasks, ordered by identifier.
    pub tasks: Vec<Task>,
}

/// A task with the ids of its people and operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// The task.
    pub task: Task,
    /// Assigned people.
    pub person_ids: Vec<PersonId>,
    /// Operations belonging to the task.
    pub operation_ids: Vec<OperationId>,
}

/// An operation with its tasks, categories and work-time record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDetails {
    /// The operation.
    pub operation: Operation,
    /// Tasks the operation belongs to.
    pub task_ids: Vec<TaskId>,
    /// Categories the operation is grouped in.
    pub category_ids: Vec<OperationCategoryId>,
    /// The owned work-time record.
    pub work_time: Option<WorkTime>,
}

/// An operation category with the ids of its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCategoryDetails {
    /// The category.
    pub category: OperationCategory,
    /// Operations grouped in the category.
    pub operation_ids: Vec<OperationId>,
}

pub(crate) fn not_found<I: RecordId>(id: I) -> PlanningServiceError {
    PlanningServiceError::NotFound {
        kind: I::KIND,
        id: id.into(),
    }
}

pub(crate) async fn person_details<S: PlanningStore + ?Sized>(
    store: &S,
    person: Person,
) -> PlanningServiceResult<PersonDetails> {
    let rows = store
        .person_task_links(LinkFilter::Left(person.id()))
        .await?;
    let mut tasks = Vec::with_capacity(rows.len());
    for (_, task_id) in rows {
        if let Some(task) = store.find_task(task_id).await? {
            tasks.push(task);
        }
    }
    Ok(PersonDetails { person, tasks })
}

pub(crate) async fn task_details<S: PlanningStore + ?Sized>(
    store: &S,
    task: Task,
) -> PlanningServiceResult<TaskDetails> {
    let person_ids = store
        .person_task_links(LinkFilter::Right(task.id()))
        .await?
        .into_iter()
        .map(|(person, _)| person)
        .collect();
    let operation_ids = store
        .task_operation_links(LinkFilter::Left(task.id()))
        .await?
        .into_iter()
        .map(|(_, operation)| operation)
        .collect();
    Ok(TaskDetails {
        task,
        person_ids,
        operation_ids,
    })
}

pub(crate) async fn operation_details<S: PlanningStore + ?Sized>(
    store: &S,
    operation: Operation,
) -> PlanningServiceResult<OperationDetails> {
    let id = operation.id();
    let task_ids = store
        .task_operation_links(LinkFilter::Right(id))
        .await?
        .into_iter()
        .map(|(task, _)| task)
        .collect();
    let category_ids = store
        .operation_category_links(LinkFilter::Left(id))
        .await?
        .into_iter()
        .map(|(_, category)| category)
        .collect();
    let work_time = store.find_work_time_for_operation(id).await?;
    Ok(OperationDetails {
        operation,
        task_ids,
        category_ids,
        work_time,
    })
}

pub(crate) async fn operation_category_details<S: PlanningStore + ?Sized>(
    store: &S,
    category: OperationCategory,
) -> PlanningServiceResult<OperationCategoryDetails> {
    let operation_ids = store
        .operation_category_links(LinkFilter::Right(category.id()))
        .await?
        .into_iter()
        .map(|(operation, _)| operation)
        .collect();
    Ok(OperationCategoryDetails {
        category,
        operation_ids,
    })
}
