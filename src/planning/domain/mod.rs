//! Domain model for shop-floor planning.
//!
//! Entities hold validated values only. Associations between entities live in
//! [`LinkTable`] relation indexes rather than on the entities themselves, so
//! both sides of a many-to-many relation read the same link rows.

mod category;
mod classification;
mod error;
mod field;
mod ids;
mod links;
mod operation;
mod person;
mod scalars;
mod task;
mod work_time;

pub use category::{OperationCategory, OperationCategoryPatch, PersistedOperationCategoryData};
pub use classification::{InvalidEnumValue, Priority, Status};
pub use error::PlanningDomainError;
pub use field::Field;
pub use ids::{OperationCategoryId, OperationId, PersonId, RecordId, RecordKind, TaskId, WorkTimeId};
pub use links::{Inverse, LinkAccess, LinkTable};
pub use operation::{Operation, OperationPatch, PersistedOperationData};
pub use person::{PersistedPersonData, Person, PersonPatch};
pub use scalars::{EmailAddress, TaskName};
pub use task::{PersistedTaskData, Task, TaskPatch};
pub use work_time::{PersistedWorkTimeData, WorkTime, WorkTimePatch};
