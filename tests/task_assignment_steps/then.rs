//! Then steps for task assignment BDD scenarios.

use super::world::{PlanningWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use shopfloor::planning::services::{PlanningServiceError, UniqueKey};

#[then(r#"the task lists the person "{email}""#)]
fn task_lists_person(world: &PlanningWorld, email: String) -> Result<(), eyre::Report> {
    let expected = world.person(&email)?.id();
    let assigned = &world.task()?.person_ids;
    if assigned != &vec![expected] {
        return Err(eyre::eyre!(
            "expected only person {expected} on the task, found {assigned:?}"
        ));
    }
    Ok(())
}

#[then("the task has no people")]
fn task_has_no_people(world: &PlanningWorld) -> Result<(), eyre::Report> {
    let assigned = &world.task()?.person_ids;
    if !assigned.is_empty() {
        return Err(eyre::eyre!("expected no people, found {assigned:?}"));
    }
    Ok(())
}

#[then(r#"the person "{email}" has no tasks"#)]
fn person_has_no_tasks(world: &PlanningWorld, email: String) -> Result<(), eyre::Report> {
    let id = world.person(&email)?.id();
    let details = run_async(world.people.find(id))
        .wrap_err("reload person in scenario")?
        .ok_or_else(|| eyre::eyre!("person {email} disappeared"))?;
    if !details.tasks.is_empty() {
        return Err(eyre::eyre!(
            "expected no tasks for {email}, found {}",
            details.tasks.len()
        ));
    }
    Ok(())
}

#[then("the creation fails with an email conflict")]
fn creation_fails_with_conflict(world: &PlanningWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_person_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing person creation result"))?;
    if !matches!(
        result,
        Err(PlanningServiceError::Conflict(UniqueKey::Email(_)))
    ) {
        return Err(eyre::eyre!("expected an email conflict, got {result:?}"));
    }
    Ok(())
}

#[then("the operation work time has an updated date")]
fn operation_work_time_stamped(world: &PlanningWorld) -> Result<(), eyre::Report> {
    let operation = world
        .last_operation
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation in scenario world"))?;
    let work_time = operation
        .work_time
        .as_ref()
        .ok_or_else(|| eyre::eyre!("operation has no work time"))?;
    if work_time.updated_date().is_none() {
        return Err(eyre::eyre!("work time {} was not stamped", work_time.id()));
    }
    Ok(())
}
