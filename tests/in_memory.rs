//! In-memory store integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `planning_flow_tests`: End-to-end create, update and delete flows
//! - `association_tests`: Link symmetry and clear-then-add semantics
//! - `work_time_tests`: Work-time ownership by operations

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert on outcomes while propagating setup errors"
)]

mod in_memory {
    pub mod helpers;

    mod association_tests;
    mod planning_flow_tests;
    mod work_time_tests;
}
