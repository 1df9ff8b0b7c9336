//! Port contracts for shop-floor planning.
//!
//! Ports define infrastructure-agnostic interfaces used by planning services.

pub mod store;

pub use store::{
    ChangeSet, LinkChanges, LinkFilter, LinkRow, PlanningStore, Record, RecordChanges, StoreError,
    StoreResult,
};
