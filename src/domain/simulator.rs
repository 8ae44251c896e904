use crate::domain::error::{ImError, ImResult};
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::model::DiffusionModel;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rand::Rng;
use std::collections::BTreeSet;

/// One stochastic realization of a diffusion process.
///
/// Implementations return every activated node index, seeds first, each exactly once.
/// All randomness comes from `rng`; nothing is shared between calls.
pub trait Cascade {
    fn activate<R: Rng + ?Sized>(
        &self,
        graph: &InfluenceGraph,
        seeds: &[NodeIndex],
        rng: &mut R,
    ) -> Vec<NodeIndex>;
}

/// Round-based Independent Cascade.
///
/// A node gets exactly one attempt per out-edge, in the round right after it was
/// activated.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndependentCascade;

/// Round-based Linear Threshold with one latent threshold per node and run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearThreshold;

fn seed_frontier(seeds: &[NodeIndex], active: &mut [bool]) -> Vec<NodeIndex> {
    let mut frontier = Vec::with_capacity(seeds.len());
    for &s in seeds {
        if !active[s.index()] {
            active[s.index()] = true;
            frontier.push(s);
        }
    }
    frontier
}

impl Cascade for IndependentCascade {
    fn activate<R: Rng + ?Sized>(
        &self,
        graph: &InfluenceGraph,
        seeds: &[NodeIndex],
        rng: &mut R,
    ) -> Vec<NodeIndex> {
        let g = &graph.graph;
        let mut active = vec![false; g.node_count()];
        let mut frontier = seed_frontier(seeds, &mut active);
        let mut activated = frontier.clone();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &u in &frontier {
                for edge in g.edges(u) {
                    let v = edge.target();
                    if active[v.index()] {
                        continue;
                    }
                    if rng.random::<f64>() < *edge.weight() {
                        active[v.index()] = true;
                        next.push(v);
                    }
                }
            }
            activated.extend_from_slice(&next);
            frontier = next;
        }

        activated
    }
}

impl Cascade for LinearThreshold {
    fn activate<R: Rng + ?Sized>(
        &self,
        graph: &InfluenceGraph,
        seeds: &[NodeIndex],
        rng: &mut R,
    ) -> Vec<NodeIndex> {
        let g = &graph.graph;
        let n = g.node_count();
        let thresholds: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();

        // influence[v] = summed weight from active predecessors of v
        let mut influence = vec![0.0_f64; n];
        let mut active = vec![false; n];
        let mut frontier = seed_frontier(seeds, &mut active);
        let mut activated = frontier.clone();

        while !frontier.is_empty() {
            for &u in &frontier {
                for edge in g.edges(u) {
                    let v = edge.target();
                    if !active[v.index()] {
                        influence[v.index()] += *edge.weight();
                    }
                }
            }

            let mut next = Vec::new();
            for &u in &frontier {
                for v in g.neighbors(u) {
                    let i = v.index();
                    if !active[i] && influence[i] >= thresholds[i] {
                        active[i] = true;
                        next.push(v);
                    }
                }
            }
            activated.extend_from_slice(&next);
            frontier = next;
        }

        activated
    }
}

/// Single-run cascade simulator over the model a graph was sealed with.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffusionSimulator;

impl DiffusionSimulator {
    pub fn new() -> Self {
        Self
    }

    /// One realization of the cascade from `seeds`; returns seeds ∪ all later activations.
    pub fn run_once<R: Rng + ?Sized>(
        &self,
        graph: &InfluenceGraph,
        seeds: &[NodeId],
        rng: &mut R,
    ) -> ImResult<BTreeSet<NodeId>> {
        let model = graph.require_sealed()?;
        let seeds = resolve_seeds(graph, seeds)?;
        Ok(self
            .activate(graph, model, &seeds, rng)
            .into_iter()
            .map(|idx| graph.id_of(idx))
            .collect())
    }

    /// Index-level realization. Callers have already validated the graph and seeds.
    pub(crate) fn activate<R: Rng + ?Sized>(
        &self,
        graph: &InfluenceGraph,
        model: DiffusionModel,
        seeds: &[NodeIndex],
        rng: &mut R,
    ) -> Vec<NodeIndex> {
        match model {
            DiffusionModel::IndependentCascade => IndependentCascade.activate(graph, seeds, rng),
            DiffusionModel::LinearThreshold => LinearThreshold.activate(graph, seeds, rng),
        }
    }
}

/// Map external ids to node indices, rejecting ids the graph does not contain.
pub(crate) fn resolve_seeds(graph: &InfluenceGraph, seeds: &[NodeId]) -> ImResult<Vec<NodeIndex>> {
    seeds
        .iter()
        .map(|&id| {
            graph
                .index_of(id)
                .ok_or_else(|| ImError::invalid(format!("seed node {id} is not in the graph")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sealed(edges: &[(NodeId, NodeId)], model: DiffusionModel) -> InfluenceGraph {
        let mut g = InfluenceGraph::new();
        for &(u, v) in edges {
            g.add_edge(u, v);
        }
        g.seal_weights(model, 42).unwrap();
        g
    }

    #[test]
    fn test_certain_edge_always_fires() {
        let g = sealed(&[(0, 1)], DiffusionModel::IndependentCascade);
        assert_eq!(g.weight(0, 1), 1.0);
        let sim = DiffusionSimulator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let active = sim.run_once(&g, &[0], &mut rng).unwrap();
            assert_eq!(active, BTreeSet::from([0, 1]));
        }
    }

    #[test]
    fn test_ic_chain_of_certain_edges_reaches_end() {
        let g = sealed(&[(0, 1), (1, 2), (2, 3)], DiffusionModel::IndependentCascade);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let active = DiffusionSimulator.run_once(&g, &[0], &mut rng).unwrap();
        assert_eq!(active.len(), 4);
    }

    #[test]
    fn test_ic_terminates_on_cycles() {
        let g = sealed(&[(0, 1), (1, 2), (2, 0)], DiffusionModel::IndependentCascade);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let active = DiffusionSimulator.run_once(&g, &[1], &mut rng).unwrap();
        assert_eq!(active, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_seeds_always_active_and_deduplicated() {
        let g = sealed(&[(0, 1), (2, 1)], DiffusionModel::IndependentCascade);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let active = DiffusionSimulator.run_once(&g, &[2, 2, 0], &mut rng).unwrap();
        assert!(active.contains(&0));
        assert!(active.contains(&2));
    }

    #[test]
    fn test_same_rng_seed_reproduces_activation() {
        let g = sealed(
            &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 5), (2, 5)],
            DiffusionModel::IndependentCascade,
        );
        for model_graph in [g.clone(), {
            let mut lt = g.clone();
            lt.seal_weights(DiffusionModel::LinearThreshold, 3).unwrap();
            lt
        }] {
            for seed in 0..20 {
                let a = DiffusionSimulator
                    .run_once(&model_graph, &[0], &mut ChaCha8Rng::seed_from_u64(seed))
                    .unwrap();
                let b = DiffusionSimulator
                    .run_once(&model_graph, &[0], &mut ChaCha8Rng::seed_from_u64(seed))
                    .unwrap();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_lt_single_predecessor_activation_rate() {
        // Only in-weight of node 1 is 1/1.1, so P(activate) = P(threshold <= 1/1.1).
        let g = sealed(&[(0, 1)], DiffusionModel::LinearThreshold);
        let expected = g.weight(0, 1);
        assert!((expected - 1.0 / 1.1).abs() < 1e-12);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let trials = 4000;
        let hits = (0..trials)
            .filter(|_| {
                DiffusionSimulator
                    .run_once(&g, &[0], &mut rng)
                    .unwrap()
                    .contains(&1)
            })
            .count();
        let rate = hits as f64 / trials as f64;
        assert!((rate - expected).abs() < 0.03, "rate {rate}");
    }

    #[test]
    fn test_lt_never_activates_without_active_predecessor() {
        let g = sealed(&[(0, 1), (2, 3)], DiffusionModel::LinearThreshold);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..100 {
            let active = DiffusionSimulator.run_once(&g, &[0], &mut rng).unwrap();
            assert!(!active.contains(&3));
            assert!(!active.contains(&2));
        }
    }

    #[test]
    fn test_unknown_seed_rejected() {
        let g = sealed(&[(0, 1)], DiffusionModel::IndependentCascade);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = DiffusionSimulator.run_once(&g, &[7], &mut rng).unwrap_err();
        assert!(matches!(err, ImError::InvalidArgument(_)));
    }

    #[test]
    fn test_unsealed_graph_rejected() {
        let mut g = InfluenceGraph::new();
        g.add_edge(0, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = DiffusionSimulator.run_once(&g, &[0], &mut rng).unwrap_err();
        assert_eq!(err, ImError::UnsealedGraph);
    }
}
