//! Identifier types for planning records.
//!
//! Identifiers are positive integers allocated by the persistence layer.

use super::PlanningDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of records managed by the planning context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// An employee or user.
    Person,
    /// A production task.
    Task,
    /// A single operation within a task.
    Operation,
    /// A grouping of operations by number range.
    OperationCategory,
    /// The work-time record owned by an operation.
    WorkTime,
}

impl RecordKind {
    /// Returns the canonical name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Task => "task",
            Self::Operation => "operation",
            Self::OperationCategory => "operation_category",
            Self::WorkTime => "work_time",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common behaviour of planning record identifiers.
pub trait RecordId:
    Copy
    + Ord
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + Into<i64>
    + TryFrom<i64, Error = PlanningDomainError>
    + 'static
{
    /// Kind of record the identifier refers to.
    const KIND: RecordKind;
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Kind of record this identifier refers to.
            pub const KIND: RecordKind = $kind;

            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`PlanningDomainError::InvalidId`] when the value is
            /// zero or negative.
            pub const fn new(value: i64) -> Result<Self, PlanningDomainError> {
                if value <= 0 {
                    return Err(PlanningDomainError::InvalidId {
                        kind: Self::KIND,
                        value,
                    });
                }
                Ok(Self(value))
            }

            /// Returns the underlying numeric value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl RecordId for $name {
            const KIND: RecordKind = $kind;
        }

        impl TryFrom<i64> for $name {
            type Error = PlanningDomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.value()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`Person`](super::Person).
    PersonId => RecordKind::Person
);
record_id!(
    /// Identifier of a [`Task`](super::Task).
    TaskId => RecordKind::Task
);
record_id!(
    /// Identifier of an [`Operation`](super::Operation).
    OperationId => RecordKind::Operation
);
record_id!(
    /// Identifier of an [`OperationCategory`](super::OperationCategory).
    OperationCategoryId => RecordKind::OperationCategory
);
record_id!(
    /// Identifier of a [`WorkTime`](super::WorkTime) record.
    WorkTimeId => RecordKind::WorkTime
);
