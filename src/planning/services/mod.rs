//! Service layer orchestrating planning use cases.
//!
//! Every create, update and delete runs in one [`UnitOfWork`] that is
//! committed once. Payloads are decoded and validated before anything is
//! staged.

mod association;
mod category;
mod details;
mod error;
mod operation;
mod payload;
mod person;
mod task;
mod unit_of_work;
mod work_time;

pub use association::{AssociationRequest, ClearSelection, SyncReport, synchronize};
pub use category::OperationCategoryService;
pub use details::{OperationCategoryDetails, OperationDetails, PersonDetails, TaskDetails};
pub use error::{PlanningServiceError, PlanningServiceResult, UniqueKey, ValidationError};
pub use operation::OperationService;
pub use person::PersonService;
pub use task::TaskService;
pub use unit_of_work::UnitOfWork;
pub use work_time::WorkTimeService;
