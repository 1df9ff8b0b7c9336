//! Work-time ownership by operations.

use crate::in_memory::helpers::{BoxError, Services, runtime, services};
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

/// Each operation owns exactly one work-time record from creation.
#[rstest]
fn every_operation_owns_one_work_time(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    for name in ["Drill", "Mill", "Grind"] {
        rt.block_on(services.operations.create(&json!({ "name": name })))?;
    }

    let operations = rt.block_on(services.operations.list())?;
    let work_times = rt.block_on(services.operations.work_times().list())?;

    assert_eq!(work_times.len(), operations.len());
    for details in &operations {
        let work_time = details.work_time.as_ref().ok_or("missing work time")?;
        assert_eq!(work_time.operation_id(), details.operation.id());
        assert_eq!(work_time.updated_date(), None);
    }
    Ok(())
}

/// First update stamps `updated_date` and keeps `creation_date`.
#[rstest]
fn first_update_stamps_updated_date(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let created = rt.block_on(services.operations.create(&json!({ "name": "Drill" })))?;
    let opened = created.work_time.clone().ok_or("missing work time")?;

    let updated = rt.block_on(
        services
            .operations
            .update(created.operation, &json!({ "outerId": 5 })),
    )?;

    let stamped = updated.work_time.ok_or("missing work time")?;
    assert_eq!(stamped.creation_date(), opened.creation_date());
    assert!(stamped.updated_date().is_some());
    Ok(())
}

/// Deleting an operation removes its work-time record.
#[rstest]
fn deleting_operation_removes_work_time(
    runtime: io::Result<Runtime>,
    services: Services,
) -> Result<(), BoxError> {
    let rt = runtime?;
    let created = rt.block_on(services.operations.create(&json!({ "name": "Drill" })))?;
    let work_time = created.work_time.clone().ok_or("missing work time")?;

    rt.block_on(services.operations.delete(&created.operation))?;

    let found = rt.block_on(services.operations.work_times().find(work_time.id()))?;
    assert!(found.is_none());
    assert!(rt.block_on(services.operations.work_times().list())?.is_empty());
    Ok(())
}
