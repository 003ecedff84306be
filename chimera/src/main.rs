//! `chimera` command-line entry point.
//!
//! Plans goals, runs the full pipeline, judges stored results and checks
//! trend outputs against their contract. JSON goes to stdout, diagnostics to
//! stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use chimera::core::judge::Judge;
use chimera::core::model::Goal;
use chimera::exit_codes;
use chimera::io::config::{ChimeraConfig, DEFAULT_CONFIG_FILE, load_config, write_config};
use chimera::io::contract::check_trend_output_file;
use chimera::io::json::{load_result, to_pretty_json};
use chimera::logging;
use chimera::pipeline::{Pipeline, PipelineOptions};

#[derive(Parser)]
#[command(
    name = "chimera",
    version,
    about = "Planner -> Worker -> Judge agent pipeline"
)]
struct Cli {
    /// Pipeline configuration file (defaults apply when it is missing).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default configuration to the `--config` path.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Decompose a goal into tasks and print them.
    Plan { goal: String },
    /// Plan, execute and judge a goal; print the report.
    Run {
        goal: String,
        /// Execute planned tasks concurrently.
        #[arg(long)]
        parallel: bool,
    },
    /// Judge a stored result (or bare output object) and print it.
    Judge { path: PathBuf },
    /// Check a trend output file against the trend output schema.
    CheckContract { path: PathBuf },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Plan { goal } => cmd_plan(&cli.config, goal),
        Command::Run { goal, parallel } => cmd_run(&cli.config, goal, parallel),
        Command::Judge { path } => cmd_judge(&path),
        Command::CheckContract { path } => cmd_check_contract(&path),
    }
}

fn pipeline(config_path: &Path) -> Result<Pipeline> {
    let config = load_config(config_path).context("load config")?;
    Ok(Pipeline::from_config(&config))
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        println!("init: kept existing {}", config_path.display());
        return Ok(exit_codes::OK);
    }
    write_config(config_path, &ChimeraConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("init: wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_plan(config_path: &Path, goal: String) -> Result<i32> {
    let goal = Goal::new(goal)?;
    let tasks = pipeline(config_path)?.planner().plan(&goal);
    print!("{}", to_pretty_json(&tasks)?);
    Ok(exit_codes::OK)
}

fn cmd_run(config_path: &Path, goal: String, parallel: bool) -> Result<i32> {
    let goal = Goal::new(goal)?;
    let report = pipeline(config_path)?.run(goal, PipelineOptions { parallel });
    print!("{}", to_pretty_json(&report)?);
    Ok(verdict_code(report.all_approved()))
}

fn cmd_judge(path: &Path) -> Result<i32> {
    let mut result = load_result(path)?;
    let approved = Judge::new().validate(&mut result, None);
    print!("{}", to_pretty_json(&result)?);
    Ok(verdict_code(approved))
}

fn cmd_check_contract(path: &Path) -> Result<i32> {
    check_trend_output_file(path)?;
    println!("contract ok: {}", path.display());
    Ok(exit_codes::OK)
}

fn verdict_code(approved: bool) -> i32 {
    if approved {
        exit_codes::OK
    } else {
        exit_codes::REJECTED
    }
}
