//! Field-group views of planning records.
//!
//! A record renders differently depending on the field group requested by
//! the boundary: [`FieldGroup::Read`] for detail responses,
//! [`FieldGroup::Write`] for echoing editable fields, and no group for the
//! bare form used when a record is nested inside another one.

mod operation;
mod person;
mod task;

use serde_json::Value;
use std::fmt;

/// Serialization context requested by the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    /// Fields returned when reading a record.
    Read,
    /// Fields accepted when writing a record.
    Write,
}

impl FieldGroup {
    /// Returns the group suffix (`read` or `write`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }

    /// Parses a context label such as `task:read`, ignoring the entity prefix.
    #[must_use]
    pub fn from_context(context: &str) -> Option<Self> {
        let suffix = context.rsplit(':').next().unwrap_or(context);
        match suffix.trim().to_ascii_lowercase().as_str() {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            _ => None,
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a record as JSON for a field group.
pub trait Normalize {
    /// Renders the record; `None` selects the bare form.
    fn normalize(&self, group: Option<FieldGroup>) -> Value;
}

fn ids<I: Copy + Into<i64>>(ids: &[I]) -> Vec<i64> {
    ids.iter().map(|id| (*id).into()).collect()
}
