//! Shared deterministic types for the pipeline core.
//!
//! These types define stable contracts between the Planner, Worker and Judge.
//! They do not depend on external state or I/O.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Lifecycle state of a task.
///
/// Status only moves forward: `pending -> in_progress -> {completed, failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Events that drive [`TaskStatus`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    Start,
    Complete,
    Fail,
}

/// Whether a task that is not pending may be started again.
///
/// Under `Refuse` the Worker leaves such a task in its current status, so a
/// task found `in_progress` stays `in_progress` after the refused call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
    #[default]
    Allow,
    Refuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot apply {event:?} to a task that is {from}")]
    Illegal { from: TaskStatus, event: TaskEvent },
    #[error("task is already {0}; re-execution refused")]
    RerunRefused(TaskStatus),
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Compute the next status for `event`.
    ///
    /// `Start` from anything but `pending` is governed by `policy`: `Allow`
    /// restarts the task, `Refuse` leaves it where it is.
    pub fn apply(self, event: TaskEvent, policy: RerunPolicy) -> Result<Self, TransitionError> {
        match (self, event) {
            (TaskStatus::Pending, TaskEvent::Start) => Ok(TaskStatus::InProgress),
            (from, TaskEvent::Start) => match policy {
                RerunPolicy::Allow => Ok(TaskStatus::InProgress),
                RerunPolicy::Refuse => Err(TransitionError::RerunRefused(from)),
            },
            (TaskStatus::InProgress, TaskEvent::Complete) => Ok(TaskStatus::Completed),
            (TaskStatus::InProgress, TaskEvent::Fail) => Ok(TaskStatus::Failed),
            (from, event) => Err(TransitionError::Illegal { from, event }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tag selecting which handler executes a task.
///
/// Serialized as a plain string. Unknown tags are preserved in `Other` and
/// routed to the generic handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKind {
    FetchTrends,
    AnalyzeTrends,
    GenerateContent,
    Publish,
    GenericResearch,
    Other(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            TaskKind::FetchTrends => "fetch_trends",
            TaskKind::AnalyzeTrends => "analyze_trends",
            TaskKind::GenerateContent => "generate_content",
            TaskKind::Publish => "publish",
            TaskKind::GenericResearch => "generic_research",
            TaskKind::Other(tag) => tag,
        }
    }
}

impl From<&str> for TaskKind {
    fn from(tag: &str) -> Self {
        match tag {
            "fetch_trends" => TaskKind::FetchTrends,
            "analyze_trends" => TaskKind::AnalyzeTrends,
            "generate_content" => TaskKind::GenerateContent,
            "publish" => TaskKind::Publish,
            "generic_research" => TaskKind::GenericResearch,
            other => TaskKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(TaskKind::from(tag.as_str()))
    }
}

/// The Judge's decision on a result.
///
/// Approval and notes travel together so neither can be set alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub approved: bool,
    pub notes: String,
}

impl Verdict {
    pub fn approve(notes: impl Into<String>) -> Self {
        Self {
            approved: true,
            notes: notes.into(),
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            approved: false,
            notes: reason.into(),
        }
    }
}
