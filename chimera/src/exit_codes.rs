//! Stable exit codes for `chimera` commands.

/// Command succeeded; every judged result was approved.
pub const OK: i32 = 0;
/// Command failed due to invalid input, config or other errors.
pub const INVALID: i32 = 1;
/// At least one judged result was rejected.
pub const REJECTED: i32 = 2;
