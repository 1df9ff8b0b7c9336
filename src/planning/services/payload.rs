//! Decoding of JSON payloads into validated patches and association requests.
//!
//! Decoding finishes before any staging starts, so a rejected payload never
//! leaves partial changes behind.

use super::association::AssociationRequest;
use super::error::ValidationError;
use crate::planning::domain::{
    EmailAddress, Field, OperationCategoryId, OperationCategoryPatch, OperationId,
    OperationPatch, PersonId, PersonPatch, Priority, RecordId, Status, TaskId, TaskName,
    TaskPatch, WorkTimePatch,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Whether a payload creates a record or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    Create,
    Update,
}

pub(crate) fn decode<T: DeserializeOwned>(payload: &Value) -> Result<T, ValidationError> {
    if !payload.is_object() {
        return Err(ValidationError::NotAnObject);
    }
    T::deserialize(payload).map_err(|err| ValidationError::Malformed(err.to_string()))
}

/// `clearX` accepts either a list of ids or `true` for "every current link".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ClearPayload {
    All(bool),
    Ids(Vec<i64>),
}

fn association<I: RecordId>(
    add: Option<Vec<i64>>,
    clear: Option<ClearPayload>,
) -> AssociationRequest<I> {
    let mut request = AssociationRequest::new().with_add(typed_ids(add.unwrap_or_default()));
    match clear {
        Some(ClearPayload::All(true)) => request = request.with_clear_all(),
        Some(ClearPayload::Ids(ids)) => request = request.with_clear(typed_ids(ids)),
        Some(ClearPayload::All(false)) | None => {}
    }
    request
}

/// Non-positive ids cannot name a record and are dropped like unknown ones.
fn typed_ids<I: RecordId>(raw: Vec<i64>) -> Vec<I> {
    raw.into_iter()
        .filter_map(|value| match I::try_from(value) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::debug!(error = %err, "skipping association id");
                None
            }
        })
        .collect()
}

fn required<T>(
    field: Field<T>,
    name: &'static str,
    intent: Intent,
) -> Result<Option<T>, ValidationError> {
    match (field, intent) {
        (Field::Value(value), _) => Ok(Some(value)),
        (Field::Unset, Intent::Update) => Ok(None),
        (Field::Unset | Field::Null, Intent::Create) => Err(ValidationError::MissingField(name)),
        (Field::Null, Intent::Update) => Err(ValidationError::NullNotAllowed(name)),
    }
}

/// Integers arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum IntegerPayload {
    Number(i64),
    Text(String),
}

fn integer_field(
    field: Field<IntegerPayload>,
    name: &'static str,
) -> Result<Field<i64>, ValidationError> {
    field.try_map(|raw| match raw {
        IntegerPayload::Number(value) => Ok(value),
        IntegerPayload::Text(text) => {
            text.trim()
                .parse()
                .map_err(|_| ValidationError::InvalidInteger { field: name, value: text })
        }
    })
}

fn date_field(
    field: Field<String>,
    name: &'static str,
) -> Result<Field<DateTime<Utc>>, ValidationError> {
    field.try_map(|raw| parse_datetime(name, raw))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` (midnight
/// UTC).
pub(crate) fn parse_datetime(
    name: &'static str,
    raw: String,
) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(parsed.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(ValidationError::InvalidDate {
        field: name,
        value: raw,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PersonPayload {
    first_name: Field<String>,
    last_name: Field<String>,
    email: Field<String>,
    tasks: Option<Vec<i64>>,
    clear_tasks: Option<ClearPayload>,
}

pub(crate) struct PersonInput {
    pub(crate) patch: PersonPatch,
    pub(crate) tasks: AssociationRequest<TaskId>,
}

impl PersonPayload {
    pub(crate) fn validate(self, intent: Intent) -> Result<PersonInput, ValidationError> {
        let email = required(self.email, "email", intent)?
            .map(EmailAddress::new)
            .transpose()?;
        Ok(PersonInput {
            patch: PersonPatch {
                first_name: self.first_name,
                last_name: self.last_name,
                email,
            },
            tasks: association(self.tasks, self.clear_tasks),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TaskPayload {
    name: Field<String>,
    description: Field<String>,
    priority: Field<String>,
    status: Field<String>,
    production_order_number: Field<String>,
    deadline_from: Field<String>,
    deadline_to: Field<String>,
    outer_id: Field<IntegerPayload>,
    #[serde(alias = "employees")]
    users: Option<Vec<i64>>,
    #[serde(alias = "clearEmployees")]
    clear_users: Option<ClearPayload>,
    operations: Option<Vec<i64>>,
    clear_operations: Option<ClearPayload>,
}

pub(crate) struct TaskInput {
    pub(crate) patch: TaskPatch,
    pub(crate) people: AssociationRequest<PersonId>,
    pub(crate) operations: AssociationRequest<OperationId>,
}

impl TaskPayload {
    pub(crate) fn validate(self, intent: Intent) -> Result<TaskInput, ValidationError> {
        let name = required(self.name, "name", intent)?
            .map(TaskName::new)
            .transpose()?;
        let priority = self
            .priority
            .try_map(|label| Priority::from_label(&label))?;
        let status = self.status.try_map(|label| Status::from_label(&label))?;
        Ok(TaskInput {
            patch: TaskPatch {
                name,
                description: self.description,
                priority,
                status,
                production_order_number: self.production_order_number,
                deadline_from: date_field(self.deadline_from, "deadlineFrom")?,
                deadline_to: date_field(self.deadline_to, "deadlineTo")?,
                outer_id: integer_field(self.outer_id, "outerId")?,
            },
            people: association(self.users, self.clear_users),
            operations: association(self.operations, self.clear_operations),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct OperationPayload {
    name: Field<String>,
    description: Field<String>,
    outer_id: Field<IntegerPayload>,
    deadline_from: Field<String>,
    deadline_to: Field<String>,
    tasks: Option<Vec<i64>>,
    clear_tasks: Option<ClearPayload>,
    operation_categories: Option<Vec<i64>>,
    clear_operation_categories: Option<ClearPayload>,
}

pub(crate) struct OperationInput {
    pub(crate) patch: OperationPatch,
    pub(crate) tasks: AssociationRequest<TaskId>,
    pub(crate) categories: AssociationRequest<OperationCategoryId>,
}

impl OperationPayload {
    pub(crate) fn validate(self) -> Result<OperationInput, ValidationError> {
        Ok(OperationInput {
            patch: OperationPatch {
                name: self.name,
                description: self.description,
                outer_id: integer_field(self.outer_id, "outerId")?,
                deadline_from: date_field(self.deadline_from, "deadlineFrom")?,
                deadline_to: date_field(self.deadline_to, "deadlineTo")?,
            },
            tasks: association(self.tasks, self.clear_tasks),
            categories: association(
                self.operation_categories,
                self.clear_operation_categories,
            ),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct OperationCategoryPayload {
    name: Field<String>,
    description: Field<String>,
    operation_number_from: Field<i32>,
    operation_number_to: Field<i32>,
    operations: Option<Vec<i64>>,
    clear_operations: Option<ClearPayload>,
}

pub(crate) struct OperationCategoryInput {
    pub(crate) patch: OperationCategoryPatch,
    pub(crate) operations: AssociationRequest<OperationId>,
}

impl OperationCategoryPayload {
    pub(crate) fn validate(self, intent: Intent) -> Result<OperationCategoryInput, ValidationError> {
        Ok(OperationCategoryInput {
            patch: OperationCategoryPatch {
                name: self.name,
                description: self.description,
                operation_number_from: required(
                    self.operation_number_from,
                    "operationNumberFrom",
                    intent,
                )?,
                operation_number_to: self.operation_number_to,
            },
            operations: association(self.operations, self.clear_operations),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WorkTimePayload {
    start_time: Field<String>,
    end_time: Field<String>,
    deadline: Field<String>,
    notes: Field<String>,
}

impl WorkTimePayload {
    pub(crate) fn validate(self) -> Result<WorkTimePatch, ValidationError> {
        Ok(WorkTimePatch {
            start_time: date_field(self.start_time, "startTime")?,
            end_time: date_field(self.end_time, "endTime")?,
            deadline: date_field(self.deadline, "deadline")?,
            notes: self.notes,
        })
    }
}
