//! End-to-end planning flows against the in-memory store.

use crate::in_memory::helpers::{BoxError, Services, create_people, raw, runtime, services};
use rstest::rstest;
use serde_json::json;
use shopfloor::planning::{
    services::{PlanningServiceError, UniqueKey},
    views::{FieldGroup, Normalize},
};
use std::io;
use tokio::runtime::Runtime;

/// Create, reassign and delete a task, checking the rendered read view.
#[rstest]
fn task_lifecycle_with_user_reassignment(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let people = create_people(&rt, &services, 3)?;
    let (first, second, third) = match people.as_slice() {
        [first, second, third] => (*first, *second, *third),
        _ => return Err("expected three people".into()),
    };

    let created = rt.block_on(services.tasks.create(&json!({
        "name": "T1",
        "priority": "high",
        "users": raw(&[first, second]),
    })))?;
    let view = created.normalize(Some(FieldGroup::Read));
    assert_eq!(view["id"], json!(created.task.id().value()));
    assert_eq!(view["priority"], json!("Wysoki"));
    assert_eq!(view["users"], json!(raw(&[first, second])));

    let updated = rt.block_on(services.tasks.update(
        created.task.clone(),
        &json!({ "clearUsers": raw(&[first]), "users": raw(&[third]) }),
    ))?;
    assert_eq!(updated.person_ids, vec![second, third]);

    rt.block_on(services.tasks.delete(&updated.task))?;
    assert!(rt.block_on(services.tasks.find(updated.task.id()))?.is_none());
    let remaining = rt.block_on(services.people.list())?;
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|details| details.tasks.is_empty()));
    Ok(())
}

/// Unique keys stay unique across creates and updates.
#[rstest]
fn unique_keys_are_enforced(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    rt.block_on(services.tasks.create(&json!({ "name": "Weld" })))?;
    let other = rt.block_on(services.tasks.create(&json!({ "name": "Paint" })))?;

    let duplicate = rt.block_on(services.tasks.create(&json!({ "name": "Weld" })));
    let rename = rt.block_on(
        services
            .tasks
            .update(other.task.clone(), &json!({ "name": "Weld" })),
    );

    assert!(matches!(
        duplicate,
        Err(PlanningServiceError::Conflict(UniqueKey::TaskName(_)))
    ));
    assert!(matches!(
        rename,
        Err(PlanningServiceError::Conflict(UniqueKey::TaskName(_)))
    ));
    assert_eq!(rt.block_on(services.tasks.list())?.len(), 2);
    Ok(())
}

/// Operations, categories and tasks wired together from different sides.
#[rstest]
fn operation_graph_is_consistent_from_every_side(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let task = rt.block_on(services.tasks.create(&json!({ "name": "Gearbox" })))?;
    let category = rt.block_on(services.categories.create(&json!({
        "name": "Machining",
        "operationNumberFrom": 100,
        "operationNumberTo": 199,
    })))?;
    let operation = rt.block_on(services.operations.create(&json!({
        "name": "Drill",
        "tasks": [task.task.id().value()],
        "operationCategories": [category.category.id().value()],
    })))?;

    let task_view = rt
        .block_on(services.tasks.find(task.task.id()))?
        .ok_or("task disappeared")?;
    let category_view = rt
        .block_on(services.categories.find(category.category.id()))?
        .ok_or("category disappeared")?;

    assert_eq!(task_view.operation_ids, vec![operation.operation.id()]);
    assert_eq!(category_view.operation_ids, vec![operation.operation.id()]);
    let rendered = operation.normalize(Some(FieldGroup::Read));
    assert_eq!(rendered["tasks"], json!([task.task.id().value()]));
    assert_eq!(
        rendered["operationCategories"],
        json!([category.category.id().value()])
    );
    assert!(rendered["workTime"].is_object());
    Ok(())
}
