//! Given steps for task assignment BDD scenarios.

use super::world::{PlanningWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a person with email "{email}""#)]
fn person_with_email(world: &mut PlanningWorld, email: String) -> Result<(), eyre::Report> {
    let created = run_async(world.people.create(&json!({ "email": email })))
        .wrap_err("create person for scenario")?;
    world.people_by_email.insert(email, created.person);
    Ok(())
}

#[given(r#"a task named "{name}""#)]
fn task_named(world: &mut PlanningWorld, name: String) -> Result<(), eyre::Report> {
    let created = run_async(world.tasks.create(&json!({ "name": name })))
        .wrap_err("create task for scenario")?;
    world.last_task = Some(created);
    Ok(())
}

#[given(r#"an operation named "{name}""#)]
fn operation_named(world: &mut PlanningWorld, name: String) -> Result<(), eyre::Report> {
    let created = run_async(world.operations.create(&json!({ "name": name })))
        .wrap_err("create operation for scenario")?;
    world.last_operation = Some(created);
    Ok(())
}
