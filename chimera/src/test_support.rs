//! Test-only helpers for constructing tasks, results and scratch files.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tempfile::TempDir;

use crate::core::model::{Payload, Task, TaskResult};
use crate::core::types::TaskKind;
use crate::io::json::write_json;

/// Convert a `json!` object literal into a payload. Non-objects become empty.
pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

/// Create a pending task for goal `g1` with the given kind and input.
pub fn task(kind: &str, input: Value) -> Task {
    Task::new("g1", TaskKind::from(kind), format!("{kind} task"), payload(input))
}

/// Create an unjudged result for task `t1` with the given output.
pub fn result_with(output: Value) -> TaskResult {
    TaskResult::new("t1", payload(output), 1.0)
}

/// Scratch directory that lives as long as the value.
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `value` as pretty JSON under `name` and return its path.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> anyhow::Result<PathBuf> {
        let path = self.path(name);
        write_json(&path, value)?;
        Ok(path)
    }

    pub fn write(&self, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.path(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
