use super::{check_edge_budget, check_probability, checked_node_count};
use crate::domain::error::ImResult;
use crate::domain::graph::InfluenceGraph;
use crate::domain::ports::GraphGenerator;
use rand::{Rng, RngCore};

/// Directed G(n, p): every ordered pair `i != j` becomes an edge with probability `p`.
///
/// Nodes only enter the graph through edges, so isolated ids are absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErdosRenyi {
    pub n: usize,
    pub p: f64,
}

impl ErdosRenyi {
    pub fn new(n: usize, p: f64) -> Self {
        Self { n, p }
    }
}

impl GraphGenerator for ErdosRenyi {
    fn name(&self) -> String {
        format!("ER_{}", self.n)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> ImResult<InfluenceGraph> {
        check_probability("erdos-renyi: p", self.p)?;
        let n = checked_node_count(self.n)?;
        check_edge_budget(
            "erdos-renyi",
            self.n.checked_mul(self.n.saturating_sub(1)),
        )?;

        let mut graph = InfluenceGraph::new();
        for i in 0..n {
            for j in 0..n {
                if i != j && rng.random::<f64>() < self.p {
                    graph.add_edge(i, j);
                }
            }
        }

        tracing::debug!(
            generator = %self.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph generated"
        );
        Ok(graph)
    }
}
