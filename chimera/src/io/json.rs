//! JSON load/write helpers for goals, tasks and results.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::model::TaskResult;

/// Task id stamped on results loaded from a bare output payload.
pub const ADHOC_TASK_ID: &str = "adhoc";

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

/// Serialize `value` to pretty-printed JSON with trailing newline.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut payload = serde_json::to_string_pretty(value).context("serialize json")?;
    payload.push('\n');
    Ok(payload)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let payload = to_pretty_json(value)?;
    fs::write(path, payload).with_context(|| format!("write {}", path.display()))
}

/// Load a result for judging.
///
/// Accepts either a full serialized result or a bare `output_data` object,
/// which is wrapped in a fresh, unjudged result.
pub fn load_result(path: &Path) -> Result<TaskResult> {
    let value: Value = read_json(path)?;
    match value {
        Value::Object(map) if map.contains_key("output_data") => {
            serde_json::from_value(Value::Object(map))
                .with_context(|| format!("deserialize result {}", path.display()))
        }
        Value::Object(map) => Ok(TaskResult::new(ADHOC_TASK_ID, map, 0.0)),
        _ => bail!("expected a JSON object in {}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Verdict;
    use serde_json::json;

    #[test]
    fn bare_output_is_wrapped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("output.json");
        write_json(&path, &json!({"message": "ok"})).expect("write");

        let result = load_result(&path).expect("load");
        assert_eq!(result.task_id, ADHOC_TASK_ID);
        assert_eq!(result.output_data.get("message"), Some(&json!("ok")));
        assert_eq!(result.is_valid(), None);
    }

    #[test]
    fn full_result_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("result.json");
        let Value::Object(output) = json!({"trends": []}) else {
            unreachable!()
        };
        let result =
            TaskResult::new("t1", output, 3.5).with_verdict(Verdict::reject("Trend list is empty."));
        write_json(&path, &result).expect("write");

        let loaded = load_result(&path).expect("load");
        assert_eq!(loaded, result);
    }

    #[test]
    fn non_object_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("list.json");
        fs::write(&path, "[1, 2]").expect("write");
        let err = load_result(&path).expect_err("not an object");
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn pretty_json_ends_with_newline() {
        let rendered = to_pretty_json(&json!({"a": 1})).expect("render");
        assert!(rendered.ends_with("}\n"));
    }
}
