//! Shopfloor: planning records for a production floor.
//!
//! The crate manages people, tasks, operations, operation categories and the
//! work-time record each operation owns, together with the many-to-many
//! associations between them.
//!
//! # Architecture
//!
//! Shopfloor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`planning`]: Planning records, association synchronization and views
//! - [`config`]: JSON configuration with environment overrides
//! - [`telemetry`]: `tracing` subscriber setup

pub mod config;
pub mod planning;
pub mod telemetry;
