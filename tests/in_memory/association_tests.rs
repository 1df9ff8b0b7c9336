//! Association semantics observed through the services.

use crate::in_memory::helpers::{
    BoxError, Services, create_people, create_task, raw, runtime, services,
};
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

/// Linking from the person side is visible from the task side.
#[rstest]
fn person_side_links_are_symmetric(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let task = create_task(&rt, &services, "Inspect")?;
    let person = rt.block_on(
        services
            .people
            .create(&json!({ "email": "anna@example.com", "tasks": [task.value()] })),
    )?;

    let details = rt.block_on(services.tasks.find(task))?.ok_or("task missing")?;

    assert_eq!(details.person_ids, vec![person.person.id()]);
    Ok(())
}

/// Omitting a relation key leaves that relation untouched.
#[rstest]
fn omitted_relation_keys_keep_links(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let people = create_people(&rt, &services, 2)?;
    let created = rt.block_on(
        services
            .tasks
            .create(&json!({ "name": "Inspect", "users": raw(&people) })),
    )?;

    let updated = rt.block_on(
        services
            .tasks
            .update(created.task, &json!({ "description": "Second pass" })),
    )?;

    assert_eq!(updated.person_ids, people);
    assert_eq!(updated.task.description(), Some("Second pass"));
    Ok(())
}

/// Clearing and re-adding the same id keeps the link.
#[rstest]
fn clear_then_add_restores_the_same_id(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let people = create_people(&rt, &services, 2)?;
    let created = rt.block_on(
        services
            .tasks
            .create(&json!({ "name": "Inspect", "users": raw(&people) })),
    )?;

    let kept = *people.first().ok_or("no people created")?;

    let updated = rt.block_on(services.tasks.update(
        created.task,
        &json!({ "clearUsers": raw(&people), "users": [kept.value()] }),
    ))?;

    assert_eq!(updated.person_ids, vec![kept]);
    Ok(())
}

/// Unknown and non-positive ids are skipped rather than rejected.
#[rstest]
fn unknown_ids_are_ignored(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let people = create_people(&rt, &services, 1)?;
    let mut requested = raw(&people);
    requested.extend([0, -3, 404]);

    let created = rt.block_on(
        services
            .tasks
            .create(&json!({ "name": "Inspect", "users": requested })),
    )?;

    assert_eq!(created.person_ids, people);
    Ok(())
}
