//! Diesel row models for planning persistence and their domain conversions.

use super::schema::{
    operation_categories, operation_operation_categories, operations, people, person_tasks,
    task_operations, tasks, work_times,
};
use crate::planning::{
    domain::{
        EmailAddress, Operation, OperationCategory, OperationCategoryId, OperationId,
        PersistedOperationCategoryData, PersistedOperationData, PersistedPersonData,
        PersistedTaskData, PersistedWorkTimeData, Person, PersonId, Priority, Status, Task,
        TaskId, TaskName, WorkTime, WorkTimeId,
    },
    ports::{StoreError, StoreResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row of the `people` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = people)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PersonRow {
    /// Person identifier.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
}

impl From<&Person> for PersonRow {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id().value(),
            first_name: person.first_name().to_owned(),
            last_name: person.last_name().to_owned(),
            email: person.email().as_str().to_owned(),
        }
    }
}

impl TryFrom<PersonRow> for Person {
    type Error = StoreError;

    fn try_from(row: PersonRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedPersonData {
            id: PersonId::new(row.id).map_err(StoreError::persistence)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::new(row.email).map_err(StoreError::persistence)?,
        }))
    }
}

/// Row of the `tasks` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Unique task name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Priority storage code.
    pub priority: Option<String>,
    /// Status storage code.
    pub status: Option<String>,
    /// Production order reference.
    pub production_order_number: Option<String>,
    /// Planned window start.
    pub deadline_from: Option<DateTime<Utc>>,
    /// Planned window end.
    pub deadline_to: Option<DateTime<Utc>>,
    /// Identifier in an external system.
    pub outer_id: Option<i64>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            name: task.name().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority().map(|p| p.as_str().to_owned()),
            status: task.status().map(|s| s.as_str().to_owned()),
            production_order_number: task.production_order_number().map(str::to_owned),
            deadline_from: task.deadline_from(),
            deadline_to: task.deadline_to(),
            outer_id: task.outer_id(),
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> StoreResult<Self> {
        let priority = row
            .priority
            .as_deref()
            .map(Priority::from_label)
            .transpose()
            .map_err(StoreError::persistence)?;
        let status = row
            .status
            .as_deref()
            .map(Status::from_label)
            .transpose()
            .map_err(StoreError::persistence)?;
        Ok(Self::from_persisted(PersistedTaskData {
            id: TaskId::new(row.id).map_err(StoreError::persistence)?,
            name: TaskName::new(row.name).map_err(StoreError::persistence)?,
            description: row.description,
            priority,
            status,
            production_order_number: row.production_order_number,
            deadline_from: row.deadline_from,
            deadline_to: row.deadline_to,
            outer_id: row.outer_id,
        }))
    }
}

/// Row of the `operations` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = operations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct OperationRow {
    /// Operation identifier.
    pub id: i64,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Identifier in an external system.
    pub outer_id: Option<i64>,
    /// Planned window start.
    pub deadline_from: Option<DateTime<Utc>>,
    /// Planned window end.
    pub deadline_to: Option<DateTime<Utc>>,
}

impl From<&Operation> for OperationRow {
    fn from(operation: &Operation) -> Self {
        Self {
            id: operation.id().value(),
            name: operation.name().map(str::to_owned),
            description: operation.description().map(str::to_owned),
            outer_id: operation.outer_id(),
            deadline_from: operation.deadline_from(),
            deadline_to: operation.deadline_to(),
        }
    }
}

impl TryFrom<OperationRow> for Operation {
    type Error = StoreError;

    fn try_from(row: OperationRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedOperationData {
            id: OperationId::new(row.id).map_err(StoreError::persistence)?,
            name: row.name,
            description: row.description,
            outer_id: row.outer_id,
            deadline_from: row.deadline_from,
            deadline_to: row.deadline_to,
        }))
    }
}

/// Row of the `operation_categories` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = operation_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct OperationCategoryRow {
    /// Category identifier.
    pub id: i64,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// First operation number in the range.
    pub operation_number_from: i32,
    /// Last operation number in the range.
    pub operation_number_to: Option<i32>,
}

impl From<&OperationCategory> for OperationCategoryRow {
    fn from(category: &OperationCategory) -> Self {
        Self {
            id: category.id().value(),
            name: category.name().map(str::to_owned),
            description: category.description().map(str::to_owned),
            operation_number_from: category.operation_number_from(),
            operation_number_to: category.operation_number_to(),
        }
    }
}

impl TryFrom<OperationCategoryRow> for OperationCategory {
    type Error = StoreError;

    fn try_from(row: OperationCategoryRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedOperationCategoryData {
            id: OperationCategoryId::new(row.id).map_err(StoreError::persistence)?,
            name: row.name,
            description: row.description,
            operation_number_from: row.operation_number_from,
            operation_number_to: row.operation_number_to,
        }))
    }
}

/// Row of the `work_times` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = work_times)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct WorkTimeRow {
    /// Work-time identifier.
    pub id: i64,
    /// Owning operation.
    pub operation_id: i64,
    /// When work started.
    pub start_time: Option<DateTime<Utc>>,
    /// When work ended.
    pub end_time: Option<DateTime<Utc>>,
    /// When the record was opened.
    pub creation_date: DateTime<Utc>,
    /// When the record was last stamped.
    pub updated_date: Option<DateTime<Utc>>,
    /// Deadline for the work.
    pub deadline: Option<DateTime<Utc>>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl From<&WorkTime> for WorkTimeRow {
    fn from(work_time: &WorkTime) -> Self {
        Self {
            id: work_time.id().value(),
            operation_id: work_time.operation_id().value(),
            start_time: work_time.start_time(),
            end_time: work_time.end_time(),
            creation_date: work_time.creation_date(),
            updated_date: work_time.updated_date(),
            deadline: work_time.deadline(),
            notes: work_time.notes().map(str::to_owned),
        }
    }
}

impl TryFrom<WorkTimeRow> for WorkTime {
    type Error = StoreError;

    fn try_from(row: WorkTimeRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedWorkTimeData {
            id: WorkTimeId::new(row.id).map_err(StoreError::persistence)?,
            operation_id: OperationId::new(row.operation_id).map_err(StoreError::persistence)?,
            start_time: row.start_time,
            end_time: row.end_time,
            creation_date: row.creation_date,
            updated_date: row.updated_date,
            deadline: row.deadline,
            notes: row.notes,
        }))
    }
}

/// Row of the `person_tasks` table.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = person_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PersonTaskRow {
    /// Assigned person.
    pub person_id: i64,
    /// Assigned task.
    pub task_id: i64,
}

/// Row of the `task_operations` table.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_operations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskOperationRow {
    /// Owning task.
    pub task_id: i64,
    /// Member operation.
    pub operation_id: i64,
}

/// Row of the `operation_operation_categories` table.
#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = operation_operation_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OperationCategoryLinkRow {
    /// Grouped operation.
    pub operation_id: i64,
    /// Category.
    pub operation_category_id: i64,
}

/// Result row of `nextval` queries.
#[derive(Debug, QueryableByName)]
pub struct NextIdRow {
    /// Allocated sequence value.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub value: i64,
}
