//! Goal -> Planner -> Worker -> Judge orchestration.
//!
//! Stages run strictly downstream. A rejected result is reported in the
//! [`PipelineReport`] and never retried or sent back upstream.

use serde::Serialize;
use tracing::{info, instrument};

use crate::core::judge::Judge;
use crate::core::model::{Goal, Task, TaskResult};
use crate::core::planner::Planner;
use crate::io::config::ChimeraConfig;
use crate::worker::{HandlerRegistry, Worker};

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Execute the planned tasks concurrently instead of one by one.
    pub parallel: bool,
}

/// One planned task together with its judged result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    pub task: Task,
    pub result: TaskResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub goal: Goal,
    pub stages: Vec<StageOutcome>,
}

impl PipelineReport {
    pub fn approved(&self) -> usize {
        self.stages
            .iter()
            .filter(|stage| stage.result.is_valid() == Some(true))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.stages.len() - self.approved()
    }

    pub fn all_approved(&self) -> bool {
        self.rejected() == 0
    }
}

#[derive(Debug, Default)]
pub struct Pipeline {
    planner: Planner,
    worker: Worker,
    judge: Judge,
}

impl Pipeline {
    pub fn new(planner: Planner, worker: Worker, judge: Judge) -> Self {
        Self {
            planner,
            worker,
            judge,
        }
    }

    /// Pipeline with the built-in handlers and the given configuration.
    pub fn from_config(config: &ChimeraConfig) -> Self {
        Self::new(
            Planner::new(config.planner.clone()),
            Worker::new(HandlerRegistry::with_defaults(), config.worker),
            Judge::new(),
        )
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    #[instrument(skip_all, fields(goal_id = %goal.id, parallel = options.parallel))]
    pub fn run(&self, goal: Goal, options: PipelineOptions) -> PipelineReport {
        let mut tasks = self.planner.plan(&goal);
        info!(tasks = tasks.len(), "plan ready");

        let results = if options.parallel {
            self.worker.execute_all(&mut tasks)
        } else {
            tasks
                .iter_mut()
                .map(|task| self.worker.execute(task))
                .collect()
        };

        let stages: Vec<StageOutcome> = tasks
            .into_iter()
            .zip(results)
            .map(|(task, mut result)| {
                self.judge.validate(&mut result, None);
                StageOutcome { task, result }
            })
            .collect();

        let report = PipelineReport { goal, stages };
        info!(
            approved = report.approved(),
            rejected = report.rejected(),
            "pipeline finished"
        );
        report
    }
}
