//! Service-level errors for planning operations.

use crate::planning::{
    domain::{EmailAddress, InvalidEnumValue, PlanningDomainError, RecordKind, TaskName},
    ports::StoreError,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Payload problems detected before any state changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload is not a JSON object.
    #[error("payload must be a JSON object")]
    NotAnObject,

    /// The payload does not match the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A required field was set to `null`.
    #[error("field `{0}` must not be null")]
    NullNotAllowed(&'static str),

    /// A date field could not be parsed.
    #[error("field `{field}` holds an invalid date: {value}")]
    InvalidDate {
        /// Payload key of the field.
        field: &'static str,
        /// Rejected input.
        value: String,
    },

    /// An integer field holds text that is not a whole number.
    #[error("field `{field}` holds an invalid integer: {value}")]
    InvalidInteger {
        /// Payload key of the field.
        field: &'static str,
        /// Rejected input.
        value: String,
    },

    /// A priority or status label is unknown.
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),

    /// A value failed domain validation.
    #[error(transparent)]
    Domain(#[from] PlanningDomainError),
}

/// Unique key that is already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueKey {
    /// A person email address.
    Email(EmailAddress),
    /// A task name.
    TaskName(TaskName),
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(email) => write!(f, "email address '{email}' already exists"),
            Self::TaskName(name) => write!(f, "task name '{name}' already exists"),
        }
    }
}

/// Errors returned by planning services.
#[derive(Debug, Clone, Error)]
pub enum PlanningServiceError {
    /// The payload was rejected; nothing was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A unique key is already in use.
    #[error("conflict: {0}")]
    Conflict(UniqueKey),

    /// The targeted record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing record.
        kind: RecordKind,
        /// Identifier of the missing record.
        id: i64,
    },

    /// The store failed or rejected the change set.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<StoreError> for PlanningServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => Self::Conflict(UniqueKey::Email(email)),
            StoreError::DuplicateTaskName(name) => Self::Conflict(UniqueKey::TaskName(name)),
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            StoreError::Persistence(source) => Self::Persistence(source),
        }
    }
}

impl From<PlanningDomainError> for PlanningServiceError {
    fn from(err: PlanningDomainError) -> Self {
        Self::Validation(ValidationError::Domain(err))
    }
}

/// Result type for planning service operations.
pub type PlanningServiceResult<T> = Result<T, PlanningServiceError>;
