//! Unit tests for the planning module.

mod store_failure_tests;
mod support;
mod work_time_tests;
