//! Shop-floor planning records and their associations.
//!
//! People are assigned to tasks, tasks are broken into operations, operations
//! are grouped into categories, and every operation carries one work-time
//! record. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Field-group views in [`views`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod views;

#[cfg(test)]
mod tests;
