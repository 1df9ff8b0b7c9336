use super::{FieldGroup, Normalize, ids};
use crate::planning::{
    domain::WorkTime,
    services::{OperationCategoryDetails, OperationDetails},
};
use serde_json::{Value, json};

impl Normalize for OperationDetails {
    fn normalize(&self, group: Option<FieldGroup>) -> Value {
        let operation = &self.operation;
        match group {
            None => json!({
                "id": operation.id().value(),
                "name": operation.name(),
                "description": operation.description(),
            }),
            Some(FieldGroup::Read) => json!({
                "id": operation.id().value(),
                "name": operation.name(),
                "description": operation.description(),
                "outerId": operation.outer_id(),
                "deadlineFrom": operation.deadline_from(),
                "deadlineTo": operation.deadline_to(),
                "tasks": ids(&self.task_ids),
                "operationCategories": ids(&self.category_ids),
                "workTime": self.work_time.as_ref().map(|work_time| work_time.normalize(None)),
            }),
            Some(FieldGroup::Write) => json!({
                "name": operation.name(),
                "description": operation.description(),
                "outerId": operation.outer_id(),
                "deadlineFrom": operation.deadline_from(),
                "deadlineTo": operation.deadline_to(),
                "tasks": ids(&self.task_ids),
                "operationCategories": ids(&self.category_ids),
            }),
        }
    }
}

impl Normalize for OperationCategoryDetails {
    fn normalize(&self, group: Option<FieldGroup>) -> Value {
        let category = &self.category;
        match group {
            None => json!({
                "id": category.id().value(),
                "name": category.name(),
                "operationNumberFrom": category.operation_number_from(),
                "operationNumberTo": category.operation_number_to(),
            }),
            Some(FieldGroup::Read) => json!({
                "id": category.id().value(),
                "name": category.name(),
                "description": category.description(),
                "operationNumberFrom": category.operation_number_from(),
                "operationNumberTo": category.operation_number_to(),
                "operations": ids(&self.operation_ids),
            }),
            Some(FieldGroup::Write) => json!({
                "name": category.name(),
                "description": category.description(),
                "operationNumberFrom": category.operation_number_from(),
                "operationNumberTo": category.operation_number_to(),
                "operations": ids(&self.operation_ids),
            }),
        }
    }
}

impl Normalize for WorkTime {
    fn normalize(&self, group: Option<FieldGroup>) -> Value {
        match group {
            None => json!({
                "id": self.id().value(),
                "startTime": self.start_time(),
                "endTime": self.end_time(),
                "workedHours": self.worked_hours(),
            }),
            Some(FieldGroup::Read) => json!({
                "id": self.id().value(),
                "operation": self.operation_id().value(),
                "startTime": self.start_time(),
                "endTime": self.end_time(),
                "creationDate": self.creation_date(),
                "updatedDate": self.updated_date(),
                "deadline": self.deadline(),
                "notes": self.notes(),
                "workedHours": self.worked_hours(),
            }),
            Some(FieldGroup::Write) => json!({
                "startTime": self.start_time(),
                "endTime": self.end_time(),
                "deadline": self.deadline(),
                "notes": self.notes(),
            }),
        }
    }
}
