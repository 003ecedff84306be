//! Keyword-based goal decomposition.
//!
//! Goals mentioning trends become a fetch + analyze pair; anything else
//! becomes a single generic research task. Planning never fails and never
//! returns an empty plan.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::model::{Goal, Payload, Task};
use crate::core::payload::{AnalysisParams, PayloadView, TrendQuery};
use crate::core::types::TaskKind;

const TREND_KEYWORD: &str = "trend";

/// Parameters stamped onto trend tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    pub platform: String,
    pub region: String,
    pub min_engagement: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            platform: "tiktok".to_string(),
            region: "US".to_string(),
            min_engagement: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Decompose `goal` into an ordered, non-empty task list.
    pub fn plan(&self, goal: &Goal) -> Vec<Task> {
        let tasks = if goal.description.to_lowercase().contains(TREND_KEYWORD) {
            self.trend_plan(goal)
        } else {
            vec![Task::new(
                goal.id.as_str(),
                TaskKind::GenericResearch,
                format!("Research: {}", goal.description),
                Payload::new(),
            )]
        };
        debug!(goal_id = %goal.id, tasks = tasks.len(), "goal planned");
        tasks
    }

    fn trend_plan(&self, goal: &Goal) -> Vec<Task> {
        let query = TrendQuery {
            platform: self.config.platform.clone(),
            region: self.config.region.clone(),
        };
        let params = AnalysisParams {
            min_engagement: self.config.min_engagement,
        };
        vec![
            Task::new(
                goal.id.as_str(),
                TaskKind::FetchTrends,
                "Fetch latest trends from platforms",
                query.into_payload(),
            ),
            Task::new(
                goal.id.as_str(),
                TaskKind::AnalyzeTrends,
                "Analyze engagement of fetched trends",
                params.into_payload(),
            ),
        ]
    }
}

/// Plan `goal` with the default planner configuration.
pub fn plan(goal: &Goal) -> Vec<Task> {
    Planner::default().plan(goal)
}
