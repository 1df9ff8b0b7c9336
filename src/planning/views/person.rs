//! Person views; the read group nests bare tasks.

use super::{FieldGroup, Normalize, ids};
use crate::planning::{domain::Task, services::PersonDetails};
use serde_json::{Value, json};

impl Normalize for PersonDetails {
    fn normalize(&self, group: Option<FieldGroup>) -> Value {
        let person = &self.person;
        match group {
            None => json!({
                "id": person.id().value(),
                "firstName": person.first_name(),
                "lastName": person.last_name(),
                "email": person.email().as_str(),
            }),
            Some(FieldGroup::Read) => json!({
                "id": person.id().value(),
                "firstName": person.first_name(),
                "lastName": person.last_name(),
                "email": person.email().as_str(),
                "tasks": self
                    .tasks
                    .iter()
                    .map(|task| task.normalize(None))
                    .collect::<Vec<_>>(),
            }),
            Some(FieldGroup::Write) => {
                let task_ids: Vec<_> = self.tasks.iter().map(Task::id).collect();
                json!({
                    "firstName": person.first_name(),
                    "lastName": person.last_name(),
                    "email": person.email().as_str(),
                    "tasks": ids(&task_ids),
                })
            }
        }
    }
}
