//! In-memory planning store.

mod store;

pub use store::InMemoryPlanningStore;
