//! Operation aggregate.

use super::{Field, OperationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single unit of work within one or more tasks.
///
/// Every operation owns exactly one [`WorkTime`](super::WorkTime) record,
/// created together with the operation and removed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    id: OperationId,
    name: Option<String>,
    description: Option<String>,
    outer_id: Option<i64>,
    deadline_from: Option<DateTime<Utc>>,
    deadline_to: Option<DateTime<Utc>>,
}

/// Data required to reconstruct a persisted operation.
#[derive(Debug, Clone)]
pub struct PersistedOperationData {
    /// Operation identifier.
    pub id: OperationId,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Identifier in an external system.
    pub outer_id: Option<i64>,
    /// Start of the planned window.
    pub deadline_from: Option<DateTime<Utc>>,
    /// End of the planned window.
    pub deadline_to: Option<DateTime<Utc>>,
}

/// Validated partial update for an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationPatch {
    /// New display name.
    pub name: Field<String>,
    /// New description.
    pub description: Field<String>,
    /// New external identifier.
    pub outer_id: Field<i64>,
    /// New planned window start.
    pub deadline_from: Field<DateTime<Utc>>,
    /// New planned window end.
    pub deadline_to: Field<DateTime<Utc>>,
}

impl Operation {
    /// Creates an operation with every optional field unset.
    #[must_use]
    pub const fn new(id: OperationId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            outer_id: None,
            deadline_from: None,
            deadline_to: None,
        }
    }

    /// Reconstructs an operation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOperationData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            outer_id: data.outer_id,
            deadline_from: data.deadline_from,
            deadline_to: data.deadline_to,
        }
    }

    /// Returns the operation identifier.
    #[must_use]
    pub const fn id(&self) -> OperationId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the identifier in an external system.
    #[must_use]
    pub const fn outer_id(&self) -> Option<i64> {
        self.outer_id
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

    /// Applies a validated partial update.
    pub fn apply(&mut self, patch: OperationPatch) {
        patch.name.apply_to(&mut self.name);
        patch.description.apply_to(&mut self.description);
        patch.outer_id.apply_to(&mut self.outer_id);
        patch.deadline_from.apply_to(&mut self.deadline_from);
        patch.deadline_to.apply_to(&mut self.deadline_to);
    }
}
