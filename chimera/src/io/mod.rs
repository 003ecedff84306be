//! I/O helpers for the `chimera` commands.

pub mod config;
pub mod contract;
pub mod json;
