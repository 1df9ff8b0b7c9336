//! Operation category aggregate.

use super::{Field, OperationCategoryId};
use serde::{Deserialize, Serialize};

/// Groups operations by a numbered range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCategory {
    id: OperationCategoryId,
    name: Option<String>,
    description: Option<String>,
    operation_number_from: i32,
    operation_number_to: Option<i32>,
}

/// Data required to reconstruct a persisted operation category.
#[derive(Debug, Clone)]
pub struct PersistedOperationCategoryData {
    /// Category identifier.
    pub id: OperationCategoryId,
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// First operation number in the range.
    pub operation_number_from: i32,
    /// Last operation number in the range.
    pub operation_number_to: Option<i32>,
}

/// Validated partial update for an operation category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationCategoryPatch {
    /// New display name.
    pub name: Field<String>,
    /// New description.
    pub description: Field<String>,
    /// New range start; `None` keeps the current one.
    pub operation_number_from: Option<i32>,
    /// New range end.
    pub operation_number_to: Field<i32>,
}

impl OperationCategory {
    /// Creates a category covering operations from `operation_number_from`.
    #[must_use]
    pub const fn new(id: OperationCategoryId, operation_number_from: i32) -> Self {
        Self {
            id,
            name: None,
            description: None,
            operation_number_from,
            operation_number_to: None,
        }
    }

    /// Reconstructs a category from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedOperationCategoryData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            operation_number_from: data.operation_number_from,
            operation_number_to: data.operation_number_to,
        }
    }

    /// Returns the category identifier.
    #[must_use]
    pub const fn id(&self) -> OperationCategoryId {
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

    /// Returns the first operation number in the range.
    #[must_use]
    pub const fn operation_number_from(&self) -> i32 {
        self.operation_number_from
    }

    /// Returns the last operation number in the range.
    #[must_use]
    pub const fn operation_number_to(&self) -> Option<i32> {
        self.operation_number_to
    }

    /// Applies a validated partial update.
    pub fn apply(&mut self, patch: OperationCategoryPatch) {
        patch.name.apply_to(&mut self.name);
        patch.description.apply_to(&mut self.description);
        if let Some(from) = patch.operation_number_from {
            self.operation_number_from = from;
        }
        patch.operation_number_to.apply_to(&mut self.operation_number_to);
    }
}
