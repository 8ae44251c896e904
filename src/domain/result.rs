use crate::domain::graph::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

/// One accepted seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based selection round.
    pub round: usize,
    pub node: NodeId,
    pub marginal_gain: f64,
    pub cumulative_spread: f64,
    /// Wall time spent in this round.
    pub elapsed_seconds: f64,
    /// Running oracle-evaluation total after this round.
    pub evaluations_so_far: u64,
}

/// Outcome of one maximizer run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    algorithm: String,
    seeds: Vec<NodeId>,
    history: Vec<IterationRecord>,
    total_seconds: f64,
    total_evaluations: u64,
}

impl RunResult {
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Seeds in selection order.
    pub fn seeds(&self) -> &[NodeId] {
        &self.seeds
    }

    pub fn seed_set(&self) -> BTreeSet<NodeId> {
        self.seeds.iter().copied().collect()
    }

    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    pub fn total_evaluations(&self) -> u64 {
        self.total_evaluations
    }

    /// Cumulative spread after the last round, 0.0 for an empty run.
    pub fn final_spread(&self) -> f64 {
        self.history
            .last()
            .map(|h| h.cumulative_spread)
            .unwrap_or(0.0)
    }

    /// `(k * n) / total_evaluations`.
    ///
    /// Approximation: compares against naive greedy's theoretical cost, not a
    /// measured one. `None` when nothing was evaluated.
    pub fn theoretical_speedup(&self, node_count: usize) -> Option<f64> {
        if self.total_evaluations == 0 {
            return None;
        }
        Some((self.seeds.len() * node_count) as f64 / self.total_evaluations as f64)
    }
}

/// Append-only builder used by the maximizers while a run is in progress.
pub(crate) struct RunRecorder {
    algorithm: &'static str,
    started: Instant,
    round_started: Instant,
    seeds: Vec<NodeId>,
    history: Vec<IterationRecord>,
}

impl RunRecorder {
    pub(crate) fn start(algorithm: &'static str) -> Self {
        let now = Instant::now();
        Self {
            algorithm,
            started: now,
            round_started: now,
            seeds: Vec::new(),
            history: Vec::new(),
        }
    }

    pub(crate) fn accept(
        &mut self,
        node: NodeId,
        marginal_gain: f64,
        cumulative_spread: f64,
        evaluations_so_far: u64,
    ) {
        let record = IterationRecord {
            round: self.history.len() + 1,
            node,
            marginal_gain,
            cumulative_spread,
            elapsed_seconds: self.round_started.elapsed().as_secs_f64(),
            evaluations_so_far,
        };
        tracing::debug!(
            algorithm = self.algorithm,
            round = record.round,
            node,
            marginal_gain,
            cumulative_spread,
            evaluations_so_far,
            "seed accepted"
        );
        self.seeds.push(node);
        self.history.push(record);
        self.round_started = Instant::now();
    }

    pub(crate) fn finish(self, total_evaluations: u64) -> RunResult {
        RunResult {
            algorithm: self.algorithm.to_string(),
            seeds: self.seeds,
            history: self.history,
            total_seconds: self.started.elapsed().as_secs_f64(),
            total_evaluations,
        }
    }
}
