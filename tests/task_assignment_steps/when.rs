//! When steps for task assignment BDD scenarios.

use super::world::{PlanningWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::{Value, json};

fn update_task(world: &mut PlanningWorld, payload: &Value) -> Result<(), eyre::Report> {
    let task = world.task()?.task.clone();
    let updated =
        run_async(world.tasks.update(task, payload)).wrap_err("update task in scenario")?;
    world.last_task = Some(updated);
    Ok(())
}

#[when(r#"the task is assigned to "{email}""#)]
fn task_assigned_to(world: &mut PlanningWorld, email: String) -> Result<(), eyre::Report> {
    let person_id = world.person(&email)?.id().value();
    update_task(world, &json!({ "users": [person_id] }))
}

#[when(r#"the task assignments are cleared and "{email}" is assigned"#)]
fn task_assignments_replaced(world: &mut PlanningWorld, email: String) -> Result<(), eyre::Report> {
    let person_id = world.person(&email)?.id().value();
    update_task(world, &json!({ "clearUsers": true, "users": [person_id] }))
}

#[when("the task is assigned to person id {person_id:i64}")]
fn task_assigned_to_id(world: &mut PlanningWorld, person_id: i64) -> Result<(), eyre::Report> {
    update_task(world, &json!({ "users": [person_id] }))
}

#[when(r#"another person is created with email "{email}""#)]
fn another_person_created(world: &mut PlanningWorld, email: String) {
    let result = run_async(
        world
            .people
            .create(&json!({ "email": email, "firstName": "Duplicate" })),
    );
    world.last_person_result = Some(result);
}

#[when(r#"the operation is renamed to "{name}""#)]
fn operation_renamed(world: &mut PlanningWorld, name: String) -> Result<(), eyre::Report> {
    let operation = world
        .last_operation
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation in scenario world"))?
        .operation
        .clone();
    let updated = run_async(world.operations.update(operation, &json!({ "name": name })))
        .wrap_err("rename operation in scenario")?;
    world.last_operation = Some(updated);
    Ok(())
}
