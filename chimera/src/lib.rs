//! Planner -> Worker -> Judge agent pipeline.
//!
//! A goal is decomposed into tasks, each task is executed into a result, and
//! each result is graded. The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (domain model, planning,
//!   validation). No I/O, fully testable in isolation.
//! - **[`worker`]**: Handler dispatch and execution timing. Failures are
//!   captured as data, never raised.
//! - **[`io`]**: Side-effecting helpers (config, JSON files, schema contract).
//!
//! [`pipeline`] wires the stages together for the `chimera` binary.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod pipeline;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod worker;
