//! Deterministic, pure logic shared by every pipeline stage.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod judge;
pub mod model;
pub mod payload;
pub mod planner;
pub mod types;
