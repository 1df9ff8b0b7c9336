//! Work-time record owned by an operation.

use super::{Field, OperationId, WorkTimeId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Timing record for a single operation.
///
/// `creation_date` is stamped once when the record is opened and never
/// changes. `updated_date` stays unset until the first update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTime {
    id: WorkTimeId,
    operation_id: OperationId,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    creation_date: DateTime<Utc>,
    updated_date: Option<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
    notes: Option<String>,
}

/// Data required to reconstruct a persisted work-time record.
#[derive(Debug, Clone)]
pub struct PersistedWorkTimeData {
    /// Work-time identifier.
    pub id: WorkTimeId,
    /// Owning operation.
    pub operation_id: OperationId,
    /// When work started.
    pub start_time: Option<DateTime<Utc>>,
    /// When work ended.
    pub end_time: Option<DateTime<Utc>>,
    /// When the record was opened.
    pub creation_date: DateTime<Utc>,
    /// When the record was last stamped.
    pub updated_date: Option<DateTime<Utc>>,
    /// Deadline for the work.
    pub deadline: Option<DateTime<Utc>>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Validated partial update for a work-time record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkTimePatch {
    /// New start time.
    pub start_time: Field<DateTime<Utc>>,
    /// New end time.
    pub end_time: Field<DateTime<Utc>>,
    /// New deadline.
    pub deadline: Field<DateTime<Utc>>,
    /// New notes.
    pub notes: Field<String>,
}

impl WorkTime {
    /// Opens a record for an operation, stamping the creation date.
    #[must_use]
    pub fn open(id: WorkTimeId, operation_id: OperationId, clock: &impl Clock) -> Self {
        Self {
            id,
            operation_id,
            start_time: None,
            end_time: None,
            creation_date: clock.utc(),
            updated_date: None,
            deadline: None,
            notes: None,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkTimeData) -> Self {
        Self {
            id: data.id,
            operation_id: data.operation_id,
            start_time: data.start_time,
            end_time: data.end_time,
            creation_date: data.creation_date,
            updated_date: data.updated_date,
            deadline: data.deadline,
            notes: data.notes,
        }
    }

    /// Returns the work-time identifier.
    #[must_use]
    pub const fn id(&self) -> WorkTimeId {
        self.id
    }

    /// Returns the owning operation.
    #[must_use]
    pub const fn operation_id(&self) -> OperationId {
        self.operation_id
    }

    /// Returns when work started.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Returns when work ended.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns when the record was opened.
    #[must_use]
    pub const fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    /// Returns when the record was last stamped.
    #[must_use]
    pub const fn updated_date(&self) -> Option<DateTime<Utc>> {
        self.updated_date
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Whole hours between start and end, when both are recorded.
    ///
    /// Negative spans (end before start) report their absolute length.
    #[must_use]
    pub fn worked_hours(&self) -> Option<i64> {
        let (start, end) = (self.start_time?, self.end_time?);
        Some((end - start).num_hours().abs())
    }

    /// Stamps the updated date with the current time.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.updated_date = Some(clock.utc());
    }

    /// Applies a validated partial update and stamps the updated date.
    pub fn apply(&mut self, patch: WorkTimePatch, clock: &impl Clock) {
        patch.start_time.apply_to(&mut self.start_time);
        patch.end_time.apply_to(&mut self.end_time);
        patch.deadline.apply_to(&mut self.deadline);
        patch.notes.apply_to(&mut self.notes);
        self.touch(clock);
    }
}
