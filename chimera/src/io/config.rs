//! Pipeline configuration stored in `chimera.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::planner::PlannerConfig;
use crate::worker::WorkerConfig;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chimera.toml";

/// Pipeline configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the built-in
/// planning parameters and the permissive re-execution policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ChimeraConfig {
    pub planner: PlannerConfig,
    pub worker: WorkerConfig,
}

impl ChimeraConfig {
    pub fn validate(&self) -> Result<()> {
        if self.planner.platform.trim().is_empty() {
            return Err(anyhow!("planner.platform must be non-empty"));
        }
        if self.planner.region.trim().is_empty() {
            return Err(anyhow!("planner.region must be non-empty"));
        }
        if !(0.0..=1.0).contains(&self.planner.min_engagement) {
            return Err(anyhow!(
                "planner.min_engagement must be within [0,1], got {}",
                self.planner.min_engagement
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ChimeraConfig::default()`.
pub fn load_config(path: &Path) -> Result<ChimeraConfig> {
    if !path.exists() {
        let cfg = ChimeraConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ChimeraConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ChimeraConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
