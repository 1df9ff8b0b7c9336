//! `PostgreSQL` adapter for planning persistence.

mod models;
mod schema;
mod store;

pub use store::{PlanningPgPool, PostgresPlanningStore};

/// SQL creating the planning tables, applied by `planning_migrate` and the
/// integration tests.
pub const SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_planning_tables/up.sql");
