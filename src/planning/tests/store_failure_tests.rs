//! Service behaviour when the store fails or races, using a mocked store.

use crate::planning::{
    domain::{
        EmailAddress, Operation, OperationCategory, OperationCategoryId, OperationId, Person,
        PersonId, PersistedWorkTimeData, RecordKind, Task, TaskId, TaskName, WorkTime,
        WorkTimeId,
    },
    ports::{ChangeSet, LinkFilter, PlanningStore, StoreError, StoreResult},
    services::{PersonService, PlanningServiceError, TaskService, UniqueKey, WorkTimeService},
};
use async_trait::async_trait;
use chrono::Utc;
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl PlanningStore for Store {
        async fn next_id(&self, kind: RecordKind) -> StoreResult<i64>;
        async fn existing_ids(&self, kind: RecordKind, ids: &[i64]) -> StoreResult<BTreeSet<i64>>;
        async fn find_person(&self, id: PersonId) -> StoreResult<Option<Person>>;
        async fn find_person_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Person>>;
        async fn list_people(&self) -> StoreResult<Vec<Person>>;
        async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>>;
        async fn find_task_by_name(&self, name: &TaskName) -> StoreResult<Option<Task>>;
        async fn list_tasks(&self) -> StoreResult<Vec<Task>>;
        async fn find_operation(&self, id: OperationId) -> StoreResult<Option<Operation>>;
        async fn list_operations(&self) -> StoreResult<Vec<Operation>>;
        async fn find_operation_category(
            &self,
            id: OperationCategoryId,
        ) -> StoreResult<Option<OperationCategory>>;
        async fn list_operation_categories(&self) -> StoreResult<Vec<OperationCategory>>;
        async fn find_work_time(&self, id: WorkTimeId) -> StoreResult<Option<WorkTime>>;
        async fn find_work_time_for_operation(
            &self,
            operation_id: OperationId,
        ) -> StoreResult<Option<WorkTime>>;
        async fn list_work_times(&self) -> StoreResult<Vec<WorkTime>>;
        async fn person_task_links(
            &self,
            filter: LinkFilter<PersonId, TaskId>,
        ) -> StoreResult<Vec<(PersonId, TaskId)>>;
        async fn task_operation_links(
            &self,
            filter: LinkFilter<TaskId, OperationId>,
        ) -> StoreResult<Vec<(TaskId, OperationId)>>;
        async fn operation_category_links(
            &self,
            filter: LinkFilter<OperationId, OperationCategoryId>,
        ) -> StoreResult<Vec<(OperationId, OperationCategoryId)>>;
        async fn commit(&self, changes: ChangeSet) -> StoreResult<()>;
    }
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("valid email")
}

#[rstest]
#[case::not_an_object(json!("anna@example.com"))]
#[case::missing_email(json!({ "firstName": "Anna" }))]
#[case::invalid_email(json!({ "email": "anna" }))]
#[case::malformed_tasks(json!({ "email": "anna@example.com", "tasks": "1,2" }))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_payloads_never_reach_the_store(#[case] payload: serde_json::Value) {
    // Any store call on an expectation-free mock panics.
    let service = PersonService::new(Arc::new(MockStore::new()));

    let result = service.create(&payload).await;

    assert!(matches!(result, Err(PlanningServiceError::Validation(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn commit_failure_surfaces_as_persistence_error() {
    let mut store = MockStore::new();
    store.expect_find_person_by_email().returning(|_| Ok(None));
    store
        .expect_next_id()
        .withf(|kind| *kind == RecordKind::Person)
        .times(1)
        .returning(|_| Ok(1));
    store
        .expect_commit()
        .times(1)
        .returning(|_| Err(StoreError::persistence(std::io::Error::other("disk full"))));
    let service = PersonService::new(Arc::new(store));

    let result = service.create(&json!({ "email": "anna@example.com" })).await;

    let Err(PlanningServiceError::Persistence(source)) = result else {
        panic!("expected a persistence error, got {result:?}");
    };
    assert_eq!(source.to_string(), "disk full");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_detected_at_commit_maps_to_conflict() {
    let mut store = MockStore::new();
    store.expect_find_person_by_email().returning(|_| Ok(None));
    store.expect_next_id().returning(|_| Ok(5));
    store
        .expect_commit()
        .withf(|changes| changes.people.inserted.len() == 1)
        .returning(|_| Err(StoreError::DuplicateEmail(email("anna@example.com"))));
    let service = PersonService::new(Arc::new(store));

    let result = service.create(&json!({ "email": "anna@example.com" })).await;

    assert!(matches!(
        result,
        Err(PlanningServiceError::Conflict(UniqueKey::Email(taken))) if taken == email("anna@example.com")
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_positive_allocation_is_a_persistence_error() {
    let mut store = MockStore::new();
    store.expect_find_task_by_name().returning(|_| Ok(None));
    store.expect_next_id().returning(|_| Ok(0));
    store.expect_commit().never();
    let service = TaskService::new(Arc::new(store));

    let result = service.create(&json!({ "name": "Weld" })).await;

    assert!(matches!(result, Err(PlanningServiceError::Persistence(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_association_ids_are_filtered_before_commit() {
    let mut store = MockStore::new();
    store.expect_find_task_by_name().returning(|_| Ok(None));
    store.expect_next_id().returning(|_| Ok(10));
    store
        .expect_existing_ids()
        .withf(|kind, ids| *kind == RecordKind::Person && ids.iter().copied().eq([1, 2]))
        .returning(|_, _| Ok(BTreeSet::from([2])));
    store
        .expect_commit()
        .withf(|changes| {
            changes.person_task_links.added.len() == 1
                && changes
                    .person_task_links
                    .added
                    .iter()
                    .all(|(person, task)| person.value() == 2 && task.value() == 10)
        })
        .times(1)
        .returning(|_| Ok(()));
    store.expect_find_task().returning(|_| Ok(None));
    let service = TaskService::new(Arc::new(store));

    let result = service
        .create(&json!({ "name": "Weld", "users": [1, 2] }))
        .await;

    // The mock never returns the committed task, so the reload fails.
    assert!(matches!(
        result,
        Err(PlanningServiceError::NotFound {
            kind: RecordKind::Task,
            id: 10
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_work_time_removal_surfaces_as_persistence_error() {
    let work_time = WorkTime::from_persisted(PersistedWorkTimeData {
        id: WorkTimeId::new(7).expect("valid work time id"),
        operation_id: OperationId::new(3).expect("valid operation id"),
        start_time: None,
        end_time: None,
        creation_date: Utc::now(),
        updated_date: None,
        deadline: None,
        notes: None,
    });
    let mut store = MockStore::new();
    store
        .expect_commit()
        .withf(|changes| {
            changes.work_times.removed.len() == 1
                && changes.work_times.inserted.is_empty()
                && changes.operations.removed.is_empty()
        })
        .times(1)
        .returning(|_| Err(StoreError::persistence(std::io::Error::other("row locked"))));
    let service = WorkTimeService::new(Arc::new(store), Arc::new(DefaultClock));

    let result = service.delete(&work_time).await;

    let Err(PlanningServiceError::Persistence(source)) = result else {
        panic!("expected a persistence error, got {result:?}");
    };
    assert_eq!(source.to_string(), "row locked");
}
