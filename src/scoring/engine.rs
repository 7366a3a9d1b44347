//! The scoring engine: turns a task batch into a ranked, explained list.
//!
//! Every request is self-contained. The engine holds only the chosen
//! strategy and the reference date captured when the request started, so
//! a [`ScoringEngine`] can be shared freely across threads.

use crate::core::graph::GraphAnalysis;
use crate::core::task::{normalize_batch, ScoredTask, Task, TaskBatch};
use crate::core::warning::Warning;
use crate::error::Result;
use crate::scoring::components::{round_score, Components};
use crate::scoring::explain::{explain, ExplainContext};
use crate::scoring::strategy::Strategy;
use crate::{tlog_debug, tlog_trace, tlog_warn};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of tasks returned by a suggestion when the caller does not say.
pub const DEFAULT_SUGGEST_LIMIT: usize = 3;

/// Result of an analyze or suggest request.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub strategy: Strategy,
    /// Highest priority first.
    pub tasks: Vec<ScoredTask>,
    pub warnings: Vec<Warning>,
    pub count: usize,
}

impl Analysis {
    fn new(strategy: Strategy, tasks: Vec<ScoredTask>, warnings: Vec<Warning>) -> Self {
        Self {
            strategy,
            count: tasks.len(),
            tasks,
            warnings,
        }
    }

    /// Keep only the first `limit` tasks.
    pub fn truncate(mut self, limit: usize) -> Self {
        self.tasks.truncate(limit);
        self.count = self.tasks.len();
        self
    }
}

/// Pick the strategy for a request.
///
/// An explicit caller choice wins over one named in the batch document,
/// which wins over `fallback`. A name outside the known set is rejected
/// rather than replaced.
pub fn resolve_strategy(
    explicit: Option<&str>,
    document: Option<&str>,
    fallback: Strategy,
) -> Result<Strategy> {
    match explicit.or(document) {
        Some(name) => name.parse(),
        None => Ok(fallback),
    }
}

/// Scores batches under one strategy against one reference date.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    strategy: Strategy,
    today: NaiveDate,
}

impl ScoringEngine {
    pub fn new(strategy: Strategy, today: NaiveDate) -> Self {
        Self { strategy, today }
    }

    /// Create an engine whose reference date is the local date right now.
    pub fn for_today(strategy: Strategy) -> Self {
        Self::new(strategy, chrono::Local::now().date_naive())
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Score every task and sort, highest first.
    ///
    /// Duplicate ids are collapsed (last occurrence wins) before the graph
    /// is built. Ties keep input order.
    pub fn analyze(&self, tasks: Vec<Task>) -> Analysis {
        tlog_debug!(
            "analyze: tasks={} strategy={} today={}",
            tasks.len(),
            self.strategy,
            self.today
        );

        let (tasks, mut warnings) = normalize_batch(tasks);
        let graph = GraphAnalysis::analyze(&tasks);
        let mut scored: Vec<ScoredTask> = tasks
            .into_iter()
            .map(|task| self.score_task(task, &graph))
            .collect();
        warnings.extend(graph.warnings);

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        for warning in &warnings {
            tlog_warn!("{}", warning);
        }
        Analysis::new(self.strategy, scored, warnings)
    }

    /// Run [`analyze`](Self::analyze) and keep the top `limit` tasks.
    pub fn suggest(&self, tasks: Vec<Task>, limit: usize) -> Analysis {
        self.analyze(tasks).truncate(limit)
    }

    /// Validate a parsed batch and analyze it. Any invalid record rejects
    /// the whole batch before scoring starts.
    pub fn analyze_batch(&self, batch: TaskBatch) -> Result<Analysis> {
        Ok(self.analyze(batch.into_tasks()?))
    }

    pub fn suggest_batch(&self, batch: TaskBatch, limit: usize) -> Result<Analysis> {
        Ok(self.suggest(batch.into_tasks()?, limit))
    }

    /// Score one task using the graph built for its batch.
    pub fn score_task(&self, task: Task, graph: &GraphAnalysis) -> ScoredTask {
        let unlocks_count = graph.unlocks_of(&task.id);
        let in_cycle = graph.in_cycle(&task.id);
        let weights = self.strategy.weights();
        let components = Components::for_task(&task, self.today, unlocks_count, in_cycle);
        let score = round_score(components.weighted_sum(&weights));

        tlog_trace!(
            "score {}: urgency={:.3} importance={:.3} effort={:.3} unlock={:.3} -> {}",
            task.id,
            components.urgency,
            components.importance,
            components.effort,
            components.unlock,
            score
        );

        let explanation = explain(
            &task,
            &components,
            &weights,
            score,
            ExplainContext {
                today: self.today,
                unlocks_count,
                in_cycle,
            },
        );

        ScoredTask {
            task,
            score,
            explanation,
            unlocks_count,
            has_cycle: in_cycle,
        }
    }
}
