//! Task execution.
//!
//! The [`Worker`] routes a task to a [`Handler`] by kind, times the call and
//! turns any handler failure (error or panic) into a result carrying an
//! `error` key. It never returns an error to its caller.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::core::model::{Payload, Task, TaskResult};
use crate::core::types::{RerunPolicy, TaskEvent, TaskKind};

pub mod skills;

/// Per-kind execution function. Returns the output payload or fails.
pub trait Handler: Send + Sync {
    fn handle(&self, task: &Task) -> Result<Payload>;
}

impl<F> Handler for F
where
    F: Fn(&Task) -> Result<Payload> + Send + Sync,
{
    fn handle(&self, task: &Task) -> Result<Payload> {
        self(task)
    }
}

/// Dispatch table from task kind to handler, with a catch-all fallback.
pub struct HandlerRegistry {
    handlers: HashMap<TaskKind, Box<dyn Handler>>,
    fallback: Box<dyn Handler>,
}

impl HandlerRegistry {
    /// Registry with only a fallback; every kind routes to it.
    pub fn with_fallback(fallback: impl Handler + 'static) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Registry wired to the built-in mock skills.
    pub fn with_defaults() -> Self {
        let mut registry = Self::with_fallback(skills::generic);
        registry.register(TaskKind::FetchTrends, skills::fetch_trends);
        registry.register(TaskKind::AnalyzeTrends, skills::analyze_trends);
        registry.register(TaskKind::GenerateContent, skills::generate_content);
        registry.register(TaskKind::Publish, skills::publish);
        registry
    }

    /// Register `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: TaskKind, handler: impl Handler + 'static) {
        self.handlers.insert(kind, Box::new(handler));
    }

    pub fn resolve(&self, kind: &TaskKind) -> &dyn Handler {
        self.handlers
            .get(kind)
            .map_or(self.fallback.as_ref(), |handler| handler.as_ref())
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.handlers.keys().map(TaskKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("kinds", &kinds)
            .finish_non_exhaustive()
    }
}

/// Worker settings (`[worker]` in `chimera.toml`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkerConfig {
    /// What to do when asked to execute a task that is not pending.
    pub rerun: RerunPolicy,
}

#[derive(Debug, Default)]
pub struct Worker {
    registry: HandlerRegistry,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(registry: HandlerRegistry, config: WorkerConfig) -> Self {
        Self { registry, config }
    }

    /// Execute `task`, moving it to `completed` or `failed`.
    ///
    /// Under [`RerunPolicy::Refuse`] a task that is not pending is left
    /// untouched and the result reports the refusal as an error. This is the
    /// one path that can leave a task `in_progress`.
    #[instrument(skip_all, fields(task_id = %task.id, kind = %task.kind))]
    pub fn execute(&self, task: &mut Task) -> TaskResult {
        if let Err(err) = task.apply(TaskEvent::Start, self.config.rerun) {
            warn!(status = %task.status, "execution refused");
            return TaskResult::failure(task.id.as_str(), format!("task {}: {err}", task.id), 0.0);
        }
        info!("task started");

        let handler = self.registry.resolve(&task.kind);
        let started = Instant::now();
        let snapshot: &Task = task;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(snapshot)));
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let failure = match outcome {
            Ok(Ok(output)) => {
                finish(task, TaskEvent::Complete);
                info!(status = %task.status, elapsed_ms, "task finished");
                return TaskResult::new(task.id.as_str(), output, elapsed_ms);
            }
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => panic_message(&*payload),
        };

        finish(task, TaskEvent::Fail);
        warn!(status = %task.status, elapsed_ms, error = %failure, "handler failed");
        TaskResult::failure(task.id.as_str(), failure, elapsed_ms)
    }

    /// Execute a batch in parallel, one thread per task.
    ///
    /// Each task is exclusively borrowed by exactly one executor. Results are
    /// returned in task order.
    pub fn execute_all(&self, tasks: &mut [Task]) -> Vec<TaskResult> {
        let ids: Vec<String> = tasks.iter().map(|task| task.id.clone()).collect();
        thread::scope(|scope| {
            let handles: Vec<_> = tasks
                .iter_mut()
                .map(|task| scope.spawn(move || self.execute(task)))
                .collect();
            handles
                .into_iter()
                .zip(ids)
                .map(|(handle, id)| {
                    handle.join().unwrap_or_else(|payload| {
                        TaskResult::failure(id, panic_message(&*payload), 0.0)
                    })
                })
                .collect()
        })
    }
}

fn finish(task: &mut Task, event: TaskEvent) {
    if let Err(err) = task.apply(event, RerunPolicy::Allow) {
        warn!(%err, "unexpected status transition");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("handler panicked: {message}")
    } else {
        "handler panicked".to_string()
    }
}
