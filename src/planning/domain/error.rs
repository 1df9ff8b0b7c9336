//! Error types for planning domain validation.

use super::{InvalidEnumValue, RecordKind};
use thiserror::Error;

/// Errors returned while constructing planning domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanningDomainError {
    /// The identifier is not a positive integer.
    #[error("invalid {kind} identifier {value}, expected a positive integer")]
    InvalidId {
        /// Kind of record the identifier refers to.
        kind: RecordKind,
        /// Rejected value.
        value: i64,
    },

    /// The email address is not syntactically valid.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// A priority or status label is unknown.
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),
}
