//! `PostgreSQL` store implementation for planning records.

use super::{
    models::{
        NextIdRow, OperationCategoryLinkRow, OperationCategoryRow, OperationRow, PersonRow,
        PersonTaskRow, TaskOperationRow, TaskRow, WorkTimeRow,
    },
    schema::{
        operation_categories, operation_operation_categories, operations, people, person_tasks,
        task_operations, tasks, work_times,
    },
};
use crate::planning::{
    domain::{
        EmailAddress, Operation, OperationCategory, OperationCategoryId, OperationId, Person,
        PersonId, RecordId, RecordKind, Task, TaskId, TaskName, WorkTime, WorkTimeId,
    },
    ports::{ChangeSet, LinkFilter, PlanningStore, StoreError, StoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

/// `PostgreSQL` connection pool type used by the planning store.
pub type PlanningPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed planning store.
#[derive(Debug, Clone)]
pub struct PostgresPlanningStore {
    pool: PlanningPgPool,
}

impl PostgresPlanningStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PlanningPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl PlanningStore for PostgresPlanningStore {
    async fn next_id(&self, kind: RecordKind) -> StoreResult<i64> {
        self.run_blocking(move |connection| {
            let row = diesel::sql_query("SELECT nextval(pg_get_serial_sequence($1, 'id')) AS value")
                .bind::<diesel::sql_types::Text, _>(table_name(kind))
                .get_result::<NextIdRow>(connection)?;
            Ok(row.value)
        })
        .await
    }

    async fn existing_ids(&self, kind: RecordKind, ids: &[i64]) -> StoreResult<BTreeSet<i64>> {
        let wanted = ids.to_vec();
        self.run_blocking(move |connection| {
            let found: Vec<i64> = match kind {
                RecordKind::Person => people::table
                    .filter(people::id.eq_any(wanted))
                    .select(people::id)
                    .load(connection)?,
                RecordKind::Task => tasks::table
                    .filter(tasks::id.eq_any(wanted))
                    .select(tasks::id)
                    .load(connection)?,
                RecordKind::Operation => operations::table
                    .filter(operations::id.eq_any(wanted))
                    .select(operations::id)
                    .load(connection)?,
                RecordKind::OperationCategory => operation_categories::table
                    .filter(operation_categories::id.eq_any(wanted))
                    .select(operation_categories::id)
                    .load(connection)?,
                RecordKind::WorkTime => work_times::table
                    .filter(work_times::id.eq_any(wanted))
                    .select(work_times::id)
                    .load(connection)?,
            };
            Ok(found.into_iter().collect())
        })
        .await
    }

    async fn find_person(&self, id: PersonId) -> StoreResult<Option<Person>> {
        self.run_blocking(move |connection| {
            people::table
                .find(id.value())
                .select(PersonRow::as_select())
                .first::<PersonRow>(connection)
                .optional()?
                .map(Person::try_from)
                .transpose()
        })
        .await
    }

    async fn find_person_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Person>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            people::table
                .filter(people::email.eq(lookup))
                .select(PersonRow::as_select())
                .first::<PersonRow>(connection)
                .optional()?
                .map(Person::try_from)
                .transpose()
        })
        .await
    }

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        self.run_blocking(|connection| {
            people::table
                .order(people::id.asc())
                .select(PersonRow::as_select())
                .load::<PersonRow>(connection)?
                .into_iter()
                .map(Person::try_from)
                .collect()
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            tasks::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?
                .map(Task::try_from)
                .transpose()
        })
        .await
    }

    async fn find_task_by_name(&self, name: &TaskName) -> StoreResult<Option<Task>> {
        let lookup = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            tasks::table
                .filter(tasks::name.eq(lookup))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?
                .map(Task::try_from)
                .transpose()
        })
        .await
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.run_blocking(|connection| {
            tasks::table
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(Task::try_from)
                .collect()
        })
        .await
    }

    async fn find_operation(&self, id: OperationId) -> StoreResult<Option<Operation>> {
        self.run_blocking(move |connection| {
            operations::table
                .find(id.value())
                .select(OperationRow::as_select())
                .first::<OperationRow>(connection)
                .optional()?
                .map(Operation::try_from)
                .transpose()
        })
        .await
    }

    async fn list_operations(&self) -> StoreResult<Vec<Operation>> {
        self.run_blocking(|connection| {
            operations::table
                .order(operations::id.asc())
                .select(OperationRow::as_select())
                .load::<OperationRow>(connection)?
                .into_iter()
                .map(Operation::try_from)
                .collect()
        })
        .await
    }

    async fn find_operation_category(
        &self,
        id: OperationCategoryId,
    ) -> StoreResult<Option<OperationCategory>> {
        self.run_blocking(move |connection| {
            operation_categories::table
                .find(id.value())
                .select(OperationCategoryRow::as_select())
                .first::<OperationCategoryRow>(connection)
                .optional()?
                .map(OperationCategory::try_from)
                .transpose()
        })
        .await
    }

    async fn list_operation_categories(&self) -> StoreResult<Vec<OperationCategory>> {
        self.run_blocking(|connection| {
            operation_categories::table
                .order(operation_categories::id.asc())
                .select(OperationCategoryRow::as_select())
                .load::<OperationCategoryRow>(connection)?
                .into_iter()
                .map(OperationCategory::try_from)
                .collect()
        })
        .await
    }

    async fn find_work_time(&self, id: WorkTimeId) -> StoreResult<Option<WorkTime>> {
        self.run_blocking(move |connection| {
            work_times::table
                .find(id.value())
                .select(WorkTimeRow::as_select())
                .first::<WorkTimeRow>(connection)
                .optional()?
                .map(WorkTime::try_from)
                .transpose()
        })
        .await
    }

    async fn find_work_time_for_operation(
        &self,
        operation_id: OperationId,
    ) -> StoreResult<Option<WorkTime>> {
        self.run_blocking(move |connection| {
            work_times::table
                .filter(work_times::operation_id.eq(operation_id.value()))
                .select(WorkTimeRow::as_select())
                .first::<WorkTimeRow>(connection)
                .optional()?
                .map(WorkTime::try_from)
                .transpose()
        })
        .await
    }

    async fn list_work_times(&self) -> StoreResult<Vec<WorkTime>> {
        self.run_blocking(|connection| {
            work_times::table
                .order(work_times::id.asc())
                .select(WorkTimeRow::as_select())
                .load::<WorkTimeRow>(connection)?
                .into_iter()
                .map(WorkTime::try_from)
                .collect()
        })
        .await
    }

    async fn person_task_links(
        &self,
        filter: LinkFilter<PersonId, TaskId>,
    ) -> StoreResult<Vec<(PersonId, TaskId)>> {
        self.run_blocking(move |connection| {
            let base = person_tasks::table.into_boxed();
            let query = match filter {
                LinkFilter::Left(person) => base.filter(person_tasks::person_id.eq(person.value())),
                LinkFilter::Right(task) => base.filter(person_tasks::task_id.eq(task.value())),
            };
            query
                .order((person_tasks::person_id.asc(), person_tasks::task_id.asc()))
                .select(PersonTaskRow::as_select())
                .load::<PersonTaskRow>(connection)?
                .into_iter()
                .map(|row| typed_pair(row.person_id, row.task_id))
                .collect()
        })
        .await
    }

    async fn task_operation_links(
        &self,
        filter: LinkFilter<TaskId, OperationId>,
    ) -> StoreResult<Vec<(TaskId, OperationId)>> {
        self.run_blocking(move |connection| {
            let base = task_operations::table.into_boxed();
            let query = match filter {
                LinkFilter::Left(task) => base.filter(task_operations::task_id.eq(task.value())),
                LinkFilter::Right(operation) => {
                    base.filter(task_operations::operation_id.eq(operation.value()))
                }
            };
            query
                .order((task_operations::task_id.asc(), task_operations::operation_id.asc()))
                .select(TaskOperationRow::as_select())
                .load::<TaskOperationRow>(connection)?
                .into_iter()
                .map(|row| typed_pair(row.task_id, row.operation_id))
                .collect()
        })
        .await
    }

    async fn operation_category_links(
        &self,
        filter: LinkFilter<OperationId, OperationCategoryId>,
    ) -> StoreResult<Vec<(OperationId, OperationCategoryId)>> {
        self.run_blocking(move |connection| {
            let base = operation_operation_categories::table.into_boxed();
            let query = match filter {
                LinkFilter::Left(operation) => base
                    .filter(operation_operation_categories::operation_id.eq(operation.value())),
                LinkFilter::Right(category) => base.filter(
                    operation_operation_categories::operation_category_id.eq(category.value()),
                ),
            };
            query
                .order((
                    operation_operation_categories::operation_id.asc(),
                    operation_operation_categories::operation_category_id.asc(),
                ))
                .select(OperationCategoryLinkRow::as_select())
                .load::<OperationCategoryLinkRow>(connection)?
                .into_iter()
                .map(|row| typed_pair(row.operation_id, row.operation_category_id))
                .collect()
        })
        .await
    }

    async fn commit(&self, changes: ChangeSet) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, StoreError, _>(|tx| apply_changes(tx, &changes))
        })
        .await
    }
}

const fn table_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Person => "people",
        RecordKind::Task => "tasks",
        RecordKind::Operation => "operations",
        RecordKind::OperationCategory => "operation_categories",
        RecordKind::WorkTime => "work_times",
    }
}

fn typed_pair<L: RecordId, R: RecordId>(left: i64, right: i64) -> StoreResult<(L, R)> {
    Ok((
        L::try_from(left).map_err(StoreError::persistence)?,
        R::try_from(right).map_err(StoreError::persistence)?,
    ))
}

fn is_constraint(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name().is_some_and(|constraint| constraint == name)
}

fn ensure_affected<I: RecordId>(affected: usize, id: I) -> StoreResult<()> {
    if affected == 0 {
        return Err(StoreError::not_found(I::KIND, id));
    }
    Ok(())
}

/// Maps a foreign-key failure on a link insert to the missing endpoint.
fn link_error<L: RecordId, R: RecordId>(
    err: DieselError,
    left: (L, &str),
    right: (R, &str),
) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
            if is_constraint(info.as_ref(), left.1) =>
        {
            StoreError::not_found(L::KIND, left.0)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
            if is_constraint(info.as_ref(), right.1) =>
        {
            StoreError::not_found(R::KIND, right.0)
        }
        other => StoreError::persistence(other),
    }
}

macro_rules! write_row {
    ($connection:expr, $table:expr, $row:expr, $is_new:expr) => {
        if $is_new {
            diesel::insert_into($table).values($row).execute($connection)
        } else {
            diesel::update($table.find($row.id))
                .set($row)
                .execute($connection)
        }
    };
}

fn apply_changes(connection: &mut PgConnection, changes: &ChangeSet) -> StoreResult<()> {
    remove_links(connection, changes)?;
    remove_records(connection, changes)?;
    write_records(connection, changes)?;
    add_links(connection, changes)
}

fn remove_links(connection: &mut PgConnection, changes: &ChangeSet) -> StoreResult<()> {
    for (person, task) in &changes.person_task_links.removed {
        diesel::delete(
            person_tasks::table
                .filter(person_tasks::person_id.eq(person.value()))
                .filter(person_tasks::task_id.eq(task.value())),
        )
        .execute(connection)?;
    }
    for (task, operation) in &changes.task_operation_links.removed {
        diesel::delete(
            task_operations::table
                .filter(task_operations::task_id.eq(task.value()))
                .filter(task_operations::operation_id.eq(operation.value())),
        )
        .execute(connection)?;
    }
    for (operation, category) in &changes.operation_category_links.removed {
        diesel::delete(
            operation_operation_categories::table
                .filter(operation_operation_categories::operation_id.eq(operation.value()))
                .filter(
                    operation_operation_categories::operation_category_id.eq(category.value()),
                ),
        )
        .execute(connection)?;
    }
    Ok(())
}

/// Link rows and owned work times go with their records through
/// `ON DELETE CASCADE`.
fn remove_records(connection: &mut PgConnection, changes: &ChangeSet) -> StoreResult<()> {
    for &id in &changes.work_times.removed {
        let affected = diesel::delete(work_times::table.find(id.value())).execute(connection)?;
        ensure_affected(affected, id)?;
    }
    for &id in &changes.people.removed {
        let affected = diesel::delete(people::table.find(id.value())).execute(connection)?;
        ensure_affected(affected, id)?;
    }
    for &id in &changes.tasks.removed {
        let affected = diesel::delete(tasks::table.find(id.value())).execute(connection)?;
        ensure_affected(affected, id)?;
    }
    for &id in &changes.operations.removed {
        let affected = diesel::delete(operations::table.find(id.value())).execute(connection)?;
        ensure_affected(affected, id)?;
    }
    for &id in &changes.operation_categories.removed {
        let affected =
            diesel::delete(operation_categories::table.find(id.value())).execute(connection)?;
        ensure_affected(affected, id)?;
    }
    Ok(())
}

fn write_records(connection: &mut PgConnection, changes: &ChangeSet) -> StoreResult<()> {
    let person_writes = flag_new(&changes.people.inserted, &changes.people.updated);
    for (person, is_new) in person_writes {
        let row = PersonRow::from(person);
        let affected = write_row!(connection, people::table, &row, is_new).map_err(|err| {
            match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                    if is_constraint(info.as_ref(), "uq_people_email") =>
                {
                    StoreError::DuplicateEmail(person.email().clone())
                }
                other => StoreError::persistence(other),
            }
        })?;
        ensure_affected(affected, person.id())?;
    }

    for (task, is_new) in flag_new(&changes.tasks.inserted, &changes.tasks.updated) {
        let row = TaskRow::from(task);
        let affected = write_row!(connection, tasks::table, &row, is_new).map_err(|err| {
            match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                    if is_constraint(info.as_ref(), "uq_tasks_name") =>
                {
                    StoreError::DuplicateTaskName(task.name().clone())
                }
                other => StoreError::persistence(other),
            }
        })?;
        ensure_affected(affected, task.id())?;
    }

    for (operation, is_new) in flag_new(&changes.operations.inserted, &changes.operations.updated)
    {
        let row = OperationRow::from(operation);
        let affected = write_row!(connection, operations::table, &row, is_new)?;
        ensure_affected(affected, operation.id())?;
    }

    let category_writes = flag_new(
        &changes.operation_categories.inserted,
        &changes.operation_categories.updated,
    );
    for (category, is_new) in category_writes {
        let row = OperationCategoryRow::from(category);
        let affected = write_row!(connection, operation_categories::table, &row, is_new)?;
        ensure_affected(affected, category.id())?;
    }

    for (work_time, is_new) in flag_new(&changes.work_times.inserted, &changes.work_times.updated)
    {
        let row = WorkTimeRow::from(work_time);
        let affected = write_row!(connection, work_times::table, &row, is_new).map_err(|err| {
            match err {
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                    if is_constraint(info.as_ref(), "fk_work_times_operation") =>
                {
                    StoreError::not_found(RecordKind::Operation, work_time.operation_id())
                }
                other => StoreError::persistence(other),
            }
        })?;
        ensure_affected(affected, work_time.id())?;
    }
    Ok(())
}

fn flag_new<'a, T>(inserted: &'a [T], updated: &'a [T]) -> impl Iterator<Item = (&'a T, bool)> {
    inserted
        .iter()
        .map(|record| (record, true))
        .chain(updated.iter().map(|record| (record, false)))
}

fn add_links(connection: &mut PgConnection, changes: &ChangeSet) -> StoreResult<()> {
    for &(person, task) in &changes.person_task_links.added {
        diesel::insert_into(person_tasks::table)
            .values(&PersonTaskRow {
                person_id: person.value(),
                task_id: task.value(),
            })
            .on_conflict_do_nothing()
            .execute(connection)
            .map_err(|err| {
                link_error(
                    err,
                    (person, "fk_person_tasks_person"),
                    (task, "fk_person_tasks_task"),
                )
            })?;
    }
    for &(task, operation) in &changes.task_operation_links.added {
        diesel::insert_into(task_operations::table)
            .values(&TaskOperationRow {
                task_id: task.value(),
                operation_id: operation.value(),
            })
            .on_conflict_do_nothing()
            .execute(connection)
            .map_err(|err| {
                link_error(
                    err,
                    (task, "fk_task_operations_task"),
                    (operation, "fk_task_operations_operation"),
                )
            })?;
    }
    for &(operation, category) in &changes.operation_category_links.added {
        diesel::insert_into(operation_operation_categories::table)
            .values(&OperationCategoryLinkRow {
                operation_id: operation.value(),
                operation_category_id: category.value(),
            })
            .on_conflict_do_nothing()
            .execute(connection)
            .map_err(|err| {
                link_error(
                    err,
                    (operation, "fk_operation_categories_operation"),
                    (category, "fk_operation_categories_category"),
                )
            })?;
    }
    Ok(())
}
