use crate::domain::error::{ImError, ImResult};
use crate::domain::estimator::MonteCarloEstimator;
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::ports::{InfluenceMaximizer, SpreadOracle, validate_run};
use crate::domain::result::{RunRecorder, RunResult};
use std::collections::HashSet;

/// Naive greedy seed selection.
///
/// Every round rescans all unselected nodes in ascending id order, querying
/// `estimate(S ∪ {u}) - estimate(S)` for each, and keeps the first candidate with the
/// strictly largest gain. Θ(k·n) oracle calls; this is the baseline CELF is measured
/// against.
pub struct NaiveGreedyMaximizer<O = MonteCarloEstimator> {
    oracle: O,
}

impl<O: SpreadOracle> NaiveGreedyMaximizer<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn into_oracle(self) -> O {
        self.oracle
    }
}

impl<O: SpreadOracle> InfluenceMaximizer for NaiveGreedyMaximizer<O> {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn select(
        &mut self,
        graph: &InfluenceGraph,
        k: usize,
        num_simulations: usize,
    ) -> ImResult<RunResult> {
        validate_run(graph, k, num_simulations)?;
        self.oracle.reset_evaluations();
        tracing::info!(
            algorithm = self.name(),
            k,
            nodes = graph.node_count(),
            num_simulations,
            "selection started"
        );

        let mut recorder = RunRecorder::start(self.name());
        let mut seeds: Vec<NodeId> = Vec::with_capacity(k);
        let mut selected: HashSet<NodeId> = HashSet::with_capacity(k);

        for _ in 0..k {
            let mut best: Option<(NodeId, f64)> = None;

            for candidate in graph.nodes() {
                if selected.contains(&candidate) {
                    continue;
                }

                seeds.push(candidate);
                let with_candidate = self.oracle.estimate(graph, &seeds, num_simulations);
                seeds.pop();
                let with_candidate = with_candidate?;

                let baseline = if seeds.is_empty() {
                    0.0
                } else {
                    self.oracle.estimate(graph, &seeds, num_simulations)?
                };
                let gain = with_candidate - baseline;

                if best.is_none_or(|(_, best_gain)| gain > best_gain) {
                    best = Some((candidate, gain));
                }
            }

            let Some((node, gain)) = best else {
                return Err(ImError::invalid(format!(
                    "no unselected candidate left after {} of {k} seeds",
                    seeds.len()
                )));
            };
            seeds.push(node);
            selected.insert(node);

            let spread = self.oracle.estimate(graph, &seeds, num_simulations)?;
            recorder.accept(node, gain, spread, self.oracle.evaluations());
        }

        let result = recorder.finish(self.oracle.evaluations());
        tracing::info!(
            algorithm = self.name(),
            spread = result.final_spread(),
            evaluations = result.total_evaluations(),
            seconds = result.total_seconds(),
            "selection finished"
        );
        Ok(result)
    }
}
