use crate::domain::error::{ImError, ImResult};
use crate::domain::estimator::MonteCarloEstimator;
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::ports::{InfluenceMaximizer, SpreadOracle, validate_run};
use crate::domain::result::{RunRecorder, RunResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Cached marginal gain of one node, valid as of `round`.
#[derive(Debug, Clone, Copy)]
struct CelfEntry {
    node: NodeId,
    gain: f64,
    round: usize,
}

// Max-heap order: larger gain first, then smaller node id.
impl Ord for CelfEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .total_cmp(&other.gain)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for CelfEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CelfEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CelfEntry {}

/// Cost-Effective Lazy Forward selection.
///
/// Relies on submodularity: a gain computed against a smaller seed set upper-bounds
/// the gain against any superset, so only entries that reach the top of the heap
/// are re-evaluated. With a deterministic oracle the selection order equals naive
/// greedy's. With the Monte-Carlo oracle the two may differ by sampling noise.
pub struct CelfMaximizer<O = MonteCarloEstimator> {
    oracle: O,
}

impl<O: SpreadOracle> CelfMaximizer<O> {
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

impl<O: SpreadOracle> InfluenceMaximizer for CelfMaximizer<O> {
    fn name(&self) -> &'static str {
        "celf"
    }

    fn select(
        &mut self,
        graph: &InfluenceGraph,
        k: usize,
        num_simulations: usize,
    ) -> ImResult<RunResult> {
        validate_run(graph, k, num_simulations)?;
        self.oracle.reset_evaluations();

        let mut recorder = RunRecorder::start(self.name());
        if k == 0 {
            return Ok(recorder.finish(0));
        }
        tracing::info!(
            algorithm = self.name(),
            k,
            nodes = graph.node_count(),
            num_simulations,
            "selection started"
        );

        // Round 0: singleton spreads.
        let mut queue = BinaryHeap::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let gain = self.oracle.estimate(graph, &[node], num_simulations)?;
            queue.push(CelfEntry {
                node,
                gain,
                round: 0,
            });
        }

        let mut seeds: Vec<NodeId> = Vec::with_capacity(k);
        let mut spread = 0.0;
        let mut round = 0;
        let mut recomputations = 0u64;

        while seeds.len() < k {
            let Some(top) = queue.pop() else {
                return Err(ImError::invalid(format!(
                    "candidate queue exhausted after {} of {k} seeds",
                    seeds.len()
                )));
            };

            if top.round == round {
                seeds.push(top.node);
                spread = self.oracle.estimate(graph, &seeds, num_simulations)?;
                recorder.accept(top.node, top.gain, spread, self.oracle.evaluations());
                round += 1;
                continue;
            }

            seeds.push(top.node);
            let with_candidate = self.oracle.estimate(graph, &seeds, num_simulations);
            seeds.pop();
            let gain = with_candidate? - spread;
            recomputations += 1;
            tracing::trace!(
                node = top.node,
                stale_gain = top.gain,
                gain,
                stale_round = top.round,
                round,
                "stale entry recomputed"
            );
            queue.push(CelfEntry {
                node: top.node,
                gain,
                round,
            });
        }

        let result = recorder.finish(self.oracle.evaluations());
        tracing::info!(
            algorithm = self.name(),
            spread = result.final_spread(),
            evaluations = result.total_evaluations(),
            recomputations,
            seconds = result.total_seconds(),
            speedup = result.theoretical_speedup(graph.node_count()),
            "selection finished"
        );
        Ok(result)
    }
}
