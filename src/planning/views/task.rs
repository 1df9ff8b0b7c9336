//! Task views. Priority and status render as display labels when read.

use super::{FieldGroup, Normalize, ids};
use crate::planning::{
    domain::{Priority, Status, Task},
    services::TaskDetails,
};
use serde_json::{Value, json};

impl Normalize for Task {
    /// Every group renders the bare task; links live on [`TaskDetails`].
    fn normalize(&self, _group: Option<FieldGroup>) -> Value {
        json!({
            "name": self.name().as_str(),
            "description": self.description(),
            "priority": self.priority().map(Priority::display_label),
            "status": self.status().map(Status::display_label),
        })
    }
}

impl Normalize for TaskDetails {
    fn normalize(&self, group: Option<FieldGroup>) -> Value {
        let task = &self.task;
        match group {
            None => task.normalize(None),
            Some(FieldGroup::Read) => json!({
                "id": task.id().value(),
                "name": task.name().as_str(),
                "description": task.description(),
                "priority": task.priority().map(Priority::display_label),
                "priorityCode": task.priority().map(Priority::as_str),
                "status": task.status().map(Status::display_label),
                "statusCode": task.status().map(Status::as_str),
                "productionOrderNumber": task.production_order_number(),
                "deadlineFrom": task.deadline_from(),
                "deadlineTo": task.deadline_to(),
                "outerId": task.outer_id(),
                "users": ids(&self.person_ids),
                "operations": ids(&self.operation_ids),
            }),
            Some(FieldGroup::Write) => json!({
                "name": task.name().as_str(),
                "description": task.description(),
                "priority": task.priority().map(Priority::as_str),
                "status": task.status().map(Status::as_str),
                "productionOrderNumber": task.production_order_number(),
                "deadlineFrom": task.deadline_from(),
                "deadlineTo": task.deadline_to(),
                "outerId": task.outer_id(),
                "users": ids(&self.person_ids),
                "operations": ids(&self.operation_ids),
            }),
        }
    }
}
