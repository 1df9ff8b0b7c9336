//! Adapter implementations of the planning store port.

pub mod memory;
pub mod postgres;
