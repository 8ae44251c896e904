use super::{check_edge_budget, checked_node_count};
use crate::domain::error::{ImError, ImResult};
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::ports::GraphGenerator;
use rand::{Rng, RngCore};

/// Preferential-attachment network.
///
/// Starts from a bidirected clique on `0..m`; every later node attaches to `m`
/// distinct existing nodes drawn from a degree-weighted target list. Each link is
/// inserted in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarabasiAlbert {
    pub n: usize,
    pub m: usize,
}

impl BarabasiAlbert {
    pub fn new(n: usize, m: usize) -> Self {
        Self { n, m }
    }

    fn validate(&self) -> ImResult<NodeId> {
        if self.m == 0 {
            return Err(ImError::invalid("barabasi-albert: m must be at least 1"));
        }
        if self.n <= self.m {
            return Err(ImError::invalid(format!(
                "barabasi-albert: n = {} must exceed m = {}",
                self.n, self.m
            )));
        }
        let n = checked_node_count(self.n)?;
        // clique m(m-1), then 2m per attached node
        let edges = (self.m - 1)
            .checked_mul(self.m)
            .zip((self.n - self.m).checked_mul(2 * self.m))
            .and_then(|(clique, attached)| clique.checked_add(attached));
        check_edge_budget("barabasi-albert", edges)?;
        Ok(n)
    }
}

impl GraphGenerator for BarabasiAlbert {
    fn name(&self) -> String {
        format!("BA_{}", self.n)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> ImResult<InfluenceGraph> {
        let n = self.validate()?;
        let m = self.m as NodeId;
        let mut graph = InfluenceGraph::new();

        for i in 0..m {
            for j in (i + 1)..m {
                graph.add_edge(i, j);
                graph.add_edge(j, i);
            }
        }

        // One entry per link endpoint, so sampling is proportional to degree.
        let mut targets: Vec<NodeId> = (0..m).collect();
        let mut picked: Vec<NodeId> = Vec::with_capacity(self.m);

        for i in m..n {
            picked.clear();
            while picked.len() < self.m {
                let t = targets[rng.random_range(0..targets.len())];
                if !picked.contains(&t) {
                    picked.push(t);
                }
            }
            for &t in &picked {
                graph.add_edge(i, t);
                graph.add_edge(t, i);
                targets.push(t);
                targets.push(i);
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
