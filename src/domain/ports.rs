use crate::domain::error::{ImError, ImResult};
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::result::RunResult;
use rand::RngCore;

/// Spread oracle port: expected number of activated nodes for a seed set.
///
/// `evaluations` counts logical `estimate` calls (marginal-gain queries), never
/// individual simulations.
pub trait SpreadOracle {
    fn estimate(
        &mut self,
        graph: &InfluenceGraph,
        seeds: &[NodeId],
        num_simulations: usize,
    ) -> ImResult<f64>;

    fn evaluations(&self) -> u64;

    fn reset_evaluations(&mut self);
}

/// Seed-selection strategy. Both greedy variants implement it so callers can swap them.
pub trait InfluenceMaximizer {
    /// Short algorithm name used in reports.
    fn name(&self) -> &'static str;

    /// Select `k` seeds on a sealed graph. Fails before any simulation on bad input.
    fn select(
        &mut self,
        graph: &InfluenceGraph,
        k: usize,
        num_simulations: usize,
    ) -> ImResult<RunResult>;
}

/// Graph generator port (implemented by adapters). Produces unsealed graphs.
pub trait GraphGenerator {
    fn name(&self) -> String;

    fn generate(&self, rng: &mut dyn RngCore) -> ImResult<InfluenceGraph>;
}

/// Shared argument checks for maximizer runs.
pub(crate) fn validate_run(
    graph: &InfluenceGraph,
    k: usize,
    num_simulations: usize,
) -> ImResult<()> {
    if num_simulations == 0 {
        return Err(ImError::invalid("num_simulations must be positive"));
    }
    graph.require_sealed()?;
    if k > graph.node_count() {
        return Err(ImError::invalid(format!(
            "k = {k} exceeds node count {}",
            graph.node_count()
        )));
    }
    Ok(())
}
