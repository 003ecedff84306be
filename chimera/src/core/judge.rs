//! Result validation.
//!
//! The Judge only sees a result, never the task that produced it, so the rule
//! set is chosen from the shape of the output payload. Checks run in a fixed
//! order and stop at the first failure; every verdict carries a non-blank
//! reason.

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::core::model::{Payload, TaskResult};
use crate::core::types::Verdict;

/// Caller-supplied validation criteria. Accepted but not consulted by any rule yet.
pub type Criteria = Payload;

const ERROR_KEY: &str = "error";
const TRENDS_KEY: &str = "trends";
const SCORE_KEY: &str = "engagement_score";

/// Rule set selected by the shape of a result payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Empty,
    Error,
    Trends,
    Generic,
}

impl PayloadShape {
    /// Classify `output`. `error` wins over `trends`.
    pub fn of(output: &Payload) -> Self {
        if output.is_empty() {
            PayloadShape::Empty
        } else if output.contains_key(ERROR_KEY) {
            PayloadShape::Error
        } else if output.contains_key(TRENDS_KEY) {
            PayloadShape::Trends
        } else {
            PayloadShape::Generic
        }
    }
}

/// Compute the verdict for `result` without mutating it.
pub fn evaluate(result: &TaskResult) -> Verdict {
    let output = &result.output_data;
    match PayloadShape::of(output) {
        PayloadShape::Empty => Verdict::reject("Result output is empty."),
        PayloadShape::Error => Verdict::reject(format!(
            "Worker reported error: {}.",
            display_value(&output[ERROR_KEY])
        )),
        PayloadShape::Trends => validate_trends(&output[TRENDS_KEY]),
        PayloadShape::Generic => Verdict::approve("Generic task completed successfully."),
    }
}

fn validate_trends(trends: &Value) -> Verdict {
    let Some(trends) = trends.as_array() else {
        return Verdict::reject("Trends must be a list.");
    };
    if trends.is_empty() {
        return Verdict::reject("Trend list is empty.");
    }

    for trend in trends {
        let Some(score) = trend.get(SCORE_KEY) else {
            return Verdict::reject("Missing engagement_score in trend.");
        };
        let Some(value) = score.as_f64() else {
            return Verdict::reject(format!(
                "Engagement score {} is not a number.",
                display_value(score)
            ));
        };
        if !(0.0..=1.0).contains(&value) {
            return Verdict::reject(format!(
                "Engagement score {} out of range [0,1].",
                display_value(score)
            ));
        }
    }

    Verdict::approve(format!("Validated {} trends successfully.", trends.len()))
}

/// Strings are shown raw, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Stateless result validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Judge;

impl Judge {
    pub fn new() -> Self {
        Self
    }

    /// Judge `result` in place and return whether it was approved.
    ///
    /// Re-validating an already judged result recomputes and overwrites the
    /// verdict.
    #[instrument(skip_all, fields(result_id = %result.id, task_id = %result.task_id))]
    pub fn validate(&self, result: &mut TaskResult, criteria: Option<&Criteria>) -> bool {
        if let Some(criteria) = criteria {
            debug!(criteria_keys = criteria.len(), "criteria supplied");
        }
        if result.verdict().is_some() {
            debug!("result already judged; re-validating");
        }

        let verdict = evaluate(result);
        let approved = verdict.approved;
        info!(approved, notes = %verdict.notes, "verdict");
        result.apply_verdict(verdict);
        approved
    }
}
