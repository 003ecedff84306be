//! CLI tests for the `chimera` binary.
//!
//! Spawns the binary and verifies stdout JSON and exit codes for approved,
//! rejected and invalid inputs.

use std::process::{Command, Output};

use chimera::exit_codes;
use chimera::io::config::{ChimeraConfig, load_config};
use chimera::test_support::Scratch;
use serde_json::{Value, json};

fn chimera(scratch: &Scratch, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chimera"))
        .args(args)
        .arg("--config")
        .arg(scratch.path("chimera.toml"))
        .output()
        .expect("spawn chimera")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

#[test]
fn plan_prints_trend_tasks() {
    let scratch = Scratch::new().expect("scratch");
    let output = chimera(&scratch, &["plan", "Analyze TikTok trends"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let tasks = stdout_json(&output);
    let kinds: Vec<&str> = tasks
        .as_array()
        .expect("task list")
        .iter()
        .map(|task| task["type"].as_str().expect("type"))
        .collect();
    assert_eq!(kinds, vec!["fetch_trends", "analyze_trends"]);
    assert_eq!(tasks[0]["status"], json!("pending"));
}

#[test]
fn plan_uses_config_parameters() {
    let scratch = Scratch::new().expect("scratch");
    scratch
        .write("chimera.toml", "[planner]\nregion = \"BR\"\n")
        .expect("write config");
    let output = chimera(&scratch, &["plan", "trend report"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let tasks = stdout_json(&output);
    assert_eq!(tasks[0]["input_data"]["region"], json!("BR"));
    assert_eq!(tasks[0]["input_data"]["platform"], json!("tiktok"));
}

#[test]
fn run_reports_all_stages_approved() {
    let scratch = Scratch::new().expect("scratch");
    let output = chimera(&scratch, &["run", "--parallel", "Fetch trends"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let report = stdout_json(&output);
    let stages = report["stages"].as_array().expect("stages");
    assert_eq!(stages.len(), 2);
    for stage in stages {
        assert_eq!(stage["task"]["status"], json!("completed"));
        assert_eq!(stage["result"]["is_valid"], json!(true));
    }
}

#[test]
fn blank_goal_is_invalid() {
    let scratch = Scratch::new().expect("scratch");
    let output = chimera(&scratch, &["run", "  "]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("non-empty"));
}

#[test]
fn judge_rejects_out_of_range_score() {
    let scratch = Scratch::new().expect("scratch");
    let path = scratch
        .write_json(
            "output.json",
            &json!({"trends": [{"engagement_score": 1.5, "title": "t", "source_url": "u"}]}),
        )
        .expect("write output");
    let output = chimera(&scratch, &["judge", path.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(exit_codes::REJECTED));
    let judged = stdout_json(&output);
    assert_eq!(judged["is_valid"], json!(false));
    assert!(
        judged["validation_notes"]
            .as_str()
            .expect("notes")
            .contains("out of range")
    );
}

#[test]
fn judge_approves_generic_output() {
    let scratch = Scratch::new().expect("scratch");
    let path = scratch
        .write_json("output.json", &json!({"message": "ok"}))
        .expect("write output");
    let output = chimera(&scratch, &["judge", path.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout_json(&output)["validation_notes"],
        json!("Generic task completed successfully.")
    );
}

#[test]
fn check_contract_flags_missing_title() {
    let scratch = Scratch::new().expect("scratch");
    let path = scratch
        .write_json(
            "output.json",
            &json!({"trends": [{"engagement_score": 0.5, "source_url": "u"}]}),
        )
        .expect("write output");
    let output = chimera(&scratch, &["check-contract", path.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("trend contract violated"));
}

#[test]
fn invalid_config_is_reported() {
    let scratch = Scratch::new().expect("scratch");
    scratch
        .write("chimera.toml", "[planner]\nmin_engagement = -1.0\n")
        .expect("write config");
    let output = chimera(&scratch, &["plan", "anything"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("load config"));
}

#[test]
fn judge_ignores_malformed_config() {
    let scratch = Scratch::new().expect("scratch");
    scratch
        .write("chimera.toml", "[planner]\nmin_engagement = -1.0\n")
        .expect("write config");
    let path = scratch
        .write_json("result.json", &json!({"message": "done"}))
        .expect("write result");
    let output = chimera(&scratch, &["judge", path.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout_json(&output)["is_valid"], json!(true));
}

#[test]
fn init_writes_default_config_once() {
    let scratch = Scratch::new().expect("scratch");
    let output = chimera(&scratch, &["init"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let config_path = scratch.path("chimera.toml");
    assert_eq!(
        load_config(&config_path).expect("load"),
        ChimeraConfig::default()
    );

    scratch
        .write("chimera.toml", "[planner]\nregion = \"BR\"\n")
        .expect("overwrite config");
    let kept = chimera(&scratch, &["init"]);
    assert_eq!(kept.status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&config_path).expect("load").planner.region, "BR");

    let forced = chimera(&scratch, &["init", "--force"]);
    assert_eq!(forced.status.code(), Some(exit_codes::OK));
    assert_eq!(
        load_config(&config_path).expect("load"),
        ChimeraConfig::default()
    );
}
