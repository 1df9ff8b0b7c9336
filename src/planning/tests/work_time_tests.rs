//! Work-time record lifecycle tests.

use super::support::{Planning, planning, validation_error};
use crate::planning::{
    domain::{OperationId, PersistedWorkTimeData, WorkTime, WorkTimeId},
    services::{PlanningServiceError, ValidationError},
};
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn persisted(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> WorkTime {
    WorkTime::from_persisted(PersistedWorkTimeData {
        id: WorkTimeId::new(1).expect("valid work time id"),
        operation_id: OperationId::new(3).expect("valid operation id"),
        start_time: start,
        end_time: end,
        creation_date: at(6, 0),
        updated_date: None,
        deadline: None,
        notes: None,
    })
}

#[rstest]
#[case::whole_hours(at(7, 0), at(15, 0), 8)]
#[case::partial_hour_truncates(at(7, 0), at(9, 59), 2)]
#[case::reversed_span(at(15, 0), at(12, 0), 3)]
fn worked_hours_reports_whole_hours(
    #[case] start: DateTime<Utc>,
    #[case] end: DateTime<Utc>,
    #[case] expected: i64,
) {
    assert_eq!(persisted(Some(start), Some(end)).worked_hours(), Some(expected));
}

#[rstest]
fn worked_hours_needs_both_ends() {
    assert_eq!(persisted(Some(at(7, 0)), None).worked_hours(), None);
    assert_eq!(persisted(None, None).worked_hours(), None);
}

#[rstest]
fn touch_sets_updated_date_only() {
    let mut work_time = persisted(Some(at(7, 0)), None);
    let before = Utc::now();
    work_time.touch(&DefaultClock);

    assert!(work_time.updated_date().is_some_and(|stamp| stamp >= before));
    assert_eq!(work_time.creation_date(), at(6, 0));
    assert_eq!(work_time.start_time(), Some(at(7, 0)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_records_times_and_stamps(planning: Planning) {
    let created = planning
        .operations
        .create(&json!({ "name": "Drill" }))
        .await
        .expect("operation creation should succeed");
    let work_time = created.work_time.expect("work time opened");
    let service = planning.operations.work_times();

    let updated = service
        .update(
            work_time,
            &json!({
                "startTime": "2026-05-04T07:00:00Z",
                "endTime": "2026-05-04 12:30:00",
                "notes": "second shift",
            }),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.worked_hours(), Some(5));
    assert_eq!(updated.notes(), Some("second shift"));
    assert!(updated.updated_date().is_some());
    let stored = service.get(updated.id()).await.expect("stored record");
    assert_eq!(stored, updated);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_rejects_bad_dates_without_stamping(planning: Planning) {
    let created = planning
        .operations
        .create(&json!({}))
        .await
        .expect("operation creation should succeed");
    let work_time = created.work_time.expect("work time opened");
    let service = planning.operations.work_times();

    let result = service
        .update(work_time.clone(), &json!({ "startTime": "7am" }))
        .await;

    assert!(matches!(
        validation_error(result),
        ValidationError::InvalidDate { field: "startTime", .. }
    ));
    let stored = service.get(work_time.id()).await.expect("stored record");
    assert_eq!(stored.updated_date(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_detaches_record_from_operation(planning: Planning) {
    let created = planning
        .operations
        .create(&json!({}))
        .await
        .expect("operation creation should succeed");
    let work_time = created.work_time.expect("work time opened");
    let service = planning.operations.work_times();

    service.delete(&work_time).await.expect("delete should succeed");

    let details = planning
        .operations
        .find(created.operation.id())
        .await
        .expect("lookup")
        .expect("operation remains");
    assert_eq!(details.work_time, None);
    assert!(matches!(
        service.get(work_time.id()).await,
        Err(PlanningServiceError::NotFound { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operation_update_without_work_time_succeeds(planning: Planning) {
    let created = planning
        .operations
        .create(&json!({}))
        .await
        .expect("operation creation should succeed");
    let work_time = created.work_time.expect("work time opened");
    planning
        .operations
        .work_times()
        .delete(&work_time)
        .await
        .expect("delete should succeed");

    let updated = planning
        .operations
        .update(created.operation, &json!({ "name": "Renamed" }))
        .await
        .expect("update should succeed");

    assert_eq!(updated.work_time, None);
    assert_eq!(updated.operation.name(), Some("Renamed"));
}
