//! Output contract for the `fetch_trends` handler family.
//!
//! This is a schema check on the raw payload, independent of the Judge: the
//! Judge grades results at runtime, the contract pins the wire shape that
//! trend producers must emit.

use std::path::Path;

use anyhow::{Context, Result, bail};
use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::io::json::read_json;

pub const TREND_OUTPUT_SCHEMA: &str = include_str!("../../schemas/trend_output.schema.json");

fn compile_trend_schema() -> Result<Validator> {
    let schema: Value =
        serde_json::from_str(TREND_OUTPUT_SCHEMA).context("parse trend output schema")?;
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .context("compile trend output schema")
}

/// Check `output` against the trend output schema, reporting every violation.
pub fn check_trend_output(output: &Value) -> Result<()> {
    let compiled = compile_trend_schema()?;
    let messages: Vec<String> = compiled
        .iter_errors(output)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("trend contract violated:\n- {}", messages.join("\n- "));
    }
    Ok(())
}

/// Load a JSON file and check it against the trend output schema.
pub fn check_trend_output_file(path: &Path) -> Result<()> {
    let output: Value = read_json(path)?;
    check_trend_output(&output).with_context(|| format!("check {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Payload, Task};
    use crate::core::types::TaskKind;
    use crate::worker::skills;
    use serde_json::json;

    #[test]
    fn contract_accepts_source_url_trend() {
        let output = json!({
            "trends": [
                {
                    "title": "AI Influencers 2026",
                    "engagement_score": 0.92,
                    "source_url": "https://example.com/trend"
                }
            ]
        });
        check_trend_output(&output).expect("valid");
    }

    #[test]
    fn contract_accepts_url_trend() {
        let output = json!({
            "trends": [{"title": "t", "engagement_score": 0.1, "url": "https://x"}]
        });
        check_trend_output(&output).expect("valid");
    }

    #[test]
    fn fetch_trends_handler_honors_contract() {
        let task = Task::new("g1", TaskKind::FetchTrends, "fetch", Payload::new());
        let output = skills::fetch_trends(&task).expect("fetch");
        check_trend_output(&Value::Object(output)).expect("contract");
    }

    #[test]
    fn contract_reports_every_violation() {
        let output = json!({
            "trends": [
                {"title": "t", "engagement_score": 1.5, "url": "u"},
                {"engagement_score": 0.5, "url": "u"}
            ]
        });
        let err = check_trend_output(&output).expect_err("invalid");
        let message = err.to_string();
        assert!(message.starts_with("trend contract violated"));
        assert!(message.matches("\n- ").count() >= 2);
    }

    #[test]
    fn contract_requires_a_link() {
        let output = json!({"trends": [{"title": "t", "engagement_score": 0.5}]});
        assert!(check_trend_output(&output).is_err());
    }

    #[test]
    fn contract_rejects_empty_list() {
        assert!(check_trend_output(&json!({"trends": []})).is_err());
    }

    #[test]
    fn contract_file_check_names_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("output.json");
        std::fs::write(&path, r#"{"trends": "nope"}"#).expect("write");
        let err = check_trend_output_file(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("output.json"));
    }
}
