use super::{check_edge_budget, check_probability, checked_node_count};
use crate::domain::error::{ImError, ImResult};
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::ports::GraphGenerator;
use rand::{Rng, RngCore};
use std::collections::BTreeSet;

/// Small-world network: ring lattice with random rewiring.
///
/// Every node links to its `k/2` clockwise neighbours. Each lattice link then keeps
/// its source and, with probability `p`, moves its far end to a uniformly chosen
/// node that is neither the source nor already adjacent to it. Links are inserted
/// in both directions.
const REWIRE_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WattsStrogatz {
    pub n: usize,
    pub k: usize,
    pub p: f64,
}

impl WattsStrogatz {
    pub fn new(n: usize, k: usize, p: f64) -> Self {
        Self { n, k, p }
    }

    fn validate(&self) -> ImResult<NodeId> {
        if self.k < 2 || self.k % 2 != 0 {
            return Err(ImError::invalid(format!(
                "watts-strogatz: k = {} must be even and at least 2",
                self.k
            )));
        }
        if self.k >= self.n {
            return Err(ImError::invalid(format!(
                "watts-strogatz: k = {} must be below n = {}",
                self.k, self.n
            )));
        }
        check_probability("watts-strogatz: p", self.p)?;
        let n = checked_node_count(self.n)?;
        check_edge_budget("watts-strogatz", self.n.checked_mul(self.k))?;
        Ok(n)
    }

    /// Uniform node that is neither `u` nor adjacent to it, if one exists.
    fn rewire_target(
        u: NodeId,
        n: NodeId,
        adjacent: &[BTreeSet<NodeId>],
        rng: &mut dyn RngCore,
    ) -> Option<NodeId> {
        let free = |w: NodeId| w != u && !adjacent[u as usize].contains(&w);
        for _ in 0..REWIRE_ATTEMPTS {
            let w = rng.random_range(0..n);
            if free(w) {
                return Some(w);
            }
        }
        // Dense neighbourhood: fall back to an exact scan.
        let candidates: Vec<NodeId> = (0..n).filter(|&w| free(w)).collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }
}

impl GraphGenerator for WattsStrogatz {
    fn name(&self) -> String {
        format!("WS_{}", self.n)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> ImResult<InfluenceGraph> {
        let n = self.validate()?;
        let half = (self.k / 2) as NodeId;

        let mut links: Vec<(NodeId, NodeId)> = Vec::with_capacity(self.n * self.k / 2);
        let mut adjacent: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); self.n];
        for i in 0..n {
            for j in 1..=half {
                let t = (i + j) % n;
                links.push((i, t));
                adjacent[i as usize].insert(t);
                adjacent[t as usize].insert(i);
            }
        }

        let mut rewired = 0usize;
        for link in links.iter_mut() {
            if rng.random::<f64>() >= self.p {
                continue;
            }
            let (u, old) = *link;
            let Some(new) = Self::rewire_target(u, n, &adjacent, rng) else {
                continue;
            };
            adjacent[u as usize].remove(&old);
            adjacent[old as usize].remove(&u);
            adjacent[u as usize].insert(new);
            adjacent[new as usize].insert(u);
            *link = (u, new);
            rewired += 1;
        }

        let mut graph = InfluenceGraph::new();
        for &(u, v) in &links {
            graph.add_edge(u, v);
            graph.add_edge(v, u);
        }

        tracing::debug!(
            generator = %self.name(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            rewired,
            "graph generated"
        );
        Ok(graph)
    }
}
