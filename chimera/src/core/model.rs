//! Goal, Task and Result entities shared by every pipeline stage.
//!
//! Each entity is owned by the stage that created it until handed to the next
//! stage. Downstream stages only touch the fields they own: the Worker moves
//! [`Task::status`], the Judge attaches a [`Verdict`] to a [`TaskResult`].
//! Identity, timestamps and payload contents are never rewritten.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::types::{RerunPolicy, TaskEvent, TaskKind, TaskStatus, TransitionError, Verdict};

/// Open key/value payload carried by tasks and results.
pub type Payload = Map<String, Value>;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// High-level objective submitted for decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Payload,
}

impl Goal {
    /// Create a goal with a fresh id. The description must not be blank.
    pub fn new(description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            bail!("goal description must be non-empty");
        }
        Ok(Self {
            id: new_id(),
            description,
            created_at: Utc::now(),
            metadata: Payload::new(),
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Atomic unit of work produced by the Planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub description: String,
    #[serde(default)]
    pub input_data: Payload,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        goal_id: impl Into<String>,
        kind: TaskKind,
        description: impl Into<String>,
        input_data: Payload,
    ) -> Self {
        Self {
            id: new_id(),
            goal_id: goal_id.into(),
            kind,
            description: description.into(),
            input_data,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Apply a lifecycle event in place.
    ///
    /// On error the status is left unchanged.
    pub fn apply(
        &mut self,
        event: TaskEvent,
        policy: RerunPolicy,
    ) -> Result<TaskStatus, TransitionError> {
        self.status = self.status.apply(event, policy)?;
        Ok(self.status)
    }
}

/// Output of executing a task, subject to validation by the Judge.
///
/// Serialized with flat `is_valid` / `validation_notes` fields; both are
/// `null` until judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResultRecord", into = "ResultRecord")]
pub struct TaskResult {
    pub id: String,
    pub task_id: String,
    pub output_data: Payload,
    pub execution_time_ms: f64,
    pub created_at: DateTime<Utc>,
    verdict: Option<Verdict>,
}

impl TaskResult {
    pub fn new(task_id: impl Into<String>, output_data: Payload, execution_time_ms: f64) -> Self {
        Self {
            id: new_id(),
            task_id: task_id.into(),
            output_data,
            execution_time_ms: execution_time_ms.max(0.0),
            created_at: Utc::now(),
            verdict: None,
        }
    }

    /// Result describing a handler failure.
    pub fn failure(task_id: impl Into<String>, message: impl Into<String>, elapsed_ms: f64) -> Self {
        let mut output = Payload::new();
        output.insert("error".to_string(), Value::String(message.into()));
        Self::new(task_id, output, elapsed_ms)
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// `None` until judged.
    pub fn is_valid(&self) -> Option<bool> {
        self.verdict.as_ref().map(|verdict| verdict.approved)
    }

    pub fn validation_notes(&self) -> Option<&str> {
        self.verdict.as_ref().map(|verdict| verdict.notes.as_str())
    }

    /// Return this result with `verdict` attached.
    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.apply_verdict(verdict);
        self
    }

    /// Attach `verdict`, replacing any earlier one.
    pub fn apply_verdict(&mut self, verdict: Verdict) {
        self.verdict = Some(verdict);
    }
}

#[derive(Serialize, Deserialize)]
struct ResultRecord {
    id: String,
    task_id: String,
    output_data: Payload,
    execution_time_ms: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    is_valid: Option<bool>,
    #[serde(default)]
    validation_notes: Option<String>,
}

impl TryFrom<ResultRecord> for TaskResult {
    type Error = String;

    fn try_from(record: ResultRecord) -> Result<Self, Self::Error> {
        if record.execution_time_ms < 0.0 {
            return Err(format!(
                "execution_time_ms must be non-negative, got {}",
                record.execution_time_ms
            ));
        }
        let verdict = match (record.is_valid, record.validation_notes) {
            (None, None) => None,
            (Some(approved), Some(notes)) if !notes.trim().is_empty() => {
                Some(Verdict { approved, notes })
            }
            _ => {
                return Err(
                    "is_valid and validation_notes must be set together with non-blank notes"
                        .to_string(),
                );
            }
        };
        Ok(Self {
            id: record.id,
            task_id: record.task_id,
            output_data: record.output_data,
            execution_time_ms: record.execution_time_ms,
            created_at: record.created_at,
            verdict,
        })
    }
}

impl From<TaskResult> for ResultRecord {
    fn from(result: TaskResult) -> Self {
        let (is_valid, validation_notes) = match result.verdict {
            Some(verdict) => (Some(verdict.approved), Some(verdict.notes)),
            None => (None, None),
        };
        Self {
            id: result.id,
            task_id: result.task_id,
            output_data: result.output_data,
            execution_time_ms: result.execution_time_ms,
            created_at: result.created_at,
            is_valid,
            validation_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn goal_rejects_blank_description() {
        let err = Goal::new("   ").expect_err("blank goal");
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn goals_get_distinct_ids() {
        let a = Goal::new("a").expect("goal");
        let b = Goal::new("b").expect("goal").with_metadata("owner", "ops");
        assert_ne!(a.id, b.id);
        assert_eq!(b.metadata.get("owner"), Some(&json!("ops")));
    }

    #[test]
    fn task_starts_pending_and_serializes_type_tag() {
        let task = Task::new("g1", TaskKind::FetchTrends, "fetch", Payload::new());
        assert_eq!(task.status, TaskStatus::Pending);
        let value = serde_json::to_value(&task).expect("serialize");
        assert_eq!(value["type"], json!("fetch_trends"));
        assert_eq!(value["status"], json!("pending"));
    }

    #[test]
    fn failed_transition_keeps_status() {
        let mut task = Task::new("g1", TaskKind::GenericResearch, "r", Payload::new());
        assert!(task.apply(TaskEvent::Complete, RerunPolicy::Allow).is_err());
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn verdict_fields_serialize_flat() {
        let result = TaskResult::new("t1", Payload::new(), 1.5);
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["is_valid"], Value::Null);
        assert_eq!(value["validation_notes"], Value::Null);

        let judged = result.with_verdict(Verdict::reject("Result output is empty."));
        let value = serde_json::to_value(&judged).expect("serialize");
        assert_eq!(value["is_valid"], json!(false));
        assert_eq!(value["validation_notes"], json!("Result output is empty."));

        let back: TaskResult = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, judged);
    }

    #[test]
    fn half_set_verdict_is_rejected_on_load() {
        let value = json!({
            "id": "r1",
            "task_id": "t1",
            "output_data": {},
            "execution_time_ms": 1.0,
            "created_at": "2026-01-01T00:00:00Z",
            "is_valid": true
        });
        let err = serde_json::from_value::<TaskResult>(value).expect_err("half verdict");
        assert!(err.to_string().contains("set together"));
    }

    #[test]
    fn failure_result_carries_error_key() {
        let result = TaskResult::failure("t1", "boom", 2.0);
        assert_eq!(result.output_data.get("error"), Some(&json!("boom")));
        assert_eq!(result.is_valid(), None);
    }
}
