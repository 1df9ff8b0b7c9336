//! Task aggregate.

use super::{Field, Priority, Status, TaskId, TaskName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A production task that people work on and operations belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    description: Option<String>,
    priority: Option<Priority>,
    status: Option<Status>,
    production_order_number: Option<String>,
    deadline_from: Option<DateTime<Utc>>,
    deadline_to: Option<DateTime<Utc>>,
    outer_id: Option<i64>,
}

/// Data required to reconstruct a persisted task.
#[derive(Debug, Clone)]
pub struct PersistedTaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Unique task name.
    pub name: TaskName,
    /// Free-form description.
    pub description: Option<String>,
    /// Stored priority.
    pub priority: Option<Priority>,
    /// Stored status.
    pub status: Option<Status>,
    /// Production order reference.
    pub production_order_number: Option<String>,
    /// Start of the planned window.
    pub deadline_from: Option<DateTime<Utc>>,
    /// End of the planned window.
    pub deadline_to: Option<DateTime<Utc>>,
    /// Identifier in an external system.
    pub outer_id: Option<i64>,
}

/// Validated partial update for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New name; `None` keeps the current one.
    pub name: Option<TaskName>,
    /// New description.
    pub description: Field<String>,
    /// New priority.
    pub priority: Field<Priority>,
    /// New status.
    pub status: Field<Status>,
    /// New production order reference.
    pub production_order_number: Field<String>,
    /// New planned window start.
    pub deadline_from: Field<DateTime<Utc>>,
    /// New planned window end.
    pub deadline_to: Field<DateTime<Utc>>,
    /// New external identifier.
    pub outer_id: Field<i64>,
}

impl Task {
    /// Creates a task with only its name set.
    #[must_use]
    pub const fn new(id: TaskId, name: TaskName) -> Self {
        Self {
            id,
            name,
            description: None,
            priority: None,
            status: None,
            production_order_number: None,
            deadline_from: None,
            deadline_to: None,
            outer_id: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            priority: data.priority,
            status: data.status,
            production_order_number: data.production_order_number,
            deadline_from: data.deadline_from,
            deadline_to: data.deadline_to,
            outer_id: data.outer_id,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the unique task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        self.status
    }

    /// Returns the production order reference.
    #[must_use]
    pub fn production_order_number(&self) -> Option<&str> {
        self.production_order_number.as_deref()
    }

    /// Returns the start of the planned window.
    #[must_use]
    pub const fn deadline_from(&self) -> Option<DateTime<Utc>> {
        self.deadline_from
    }

    /// Returns the end of the planned window.
    #[must_use]
    pub const fn deadline_to(&self) -> Option<DateTime<Utc>> {
        self.deadline_to
    }

    /// Returns the identifier in an external system.
    #[must_use]
    pub const fn outer_id(&self) -> Option<i64> {
        self.outer_id
    }

    /// Applies a validated partial update.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        patch.description.apply_to(&mut self.description);
        patch.priority.apply_to(&mut self.priority);
        patch.status.apply_to(&mut self.status);
        patch
            .production_order_number
            .apply_to(&mut self.production_order_number);
        patch.deadline_from.apply_to(&mut self.deadline_from);
        patch.deadline_to.apply_to(&mut self.deadline_to);
        patch.outer_id.apply_to(&mut self.outer_id);
    }
}
