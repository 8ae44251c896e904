use crate::domain::error::{ImError, ImResult};
use crate::domain::model::DiffusionModel;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};

/// External node identifier.
pub type NodeId = u32;

/// Historical LT normalization: predecessor weights on a node sum to 1/1.1.
pub const DEFAULT_LT_NORMALIZATION: f64 = 1.1;

/// Parameters of the weight-sealing step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightParams {
    /// Divisor applied on top of the draw sum for LT in-weights. Must be positive.
    pub lt_normalization: f64,
}

impl Default for WeightParams {
    fn default() -> Self {
        Self {
            lt_normalization: DEFAULT_LT_NORMALIZATION,
        }
    }
}

/// Influence Graph - directed multigraph with per-edge activation probabilities.
///
/// Built incrementally with [`InfluenceGraph::add_edge`], then sealed exactly once
/// with [`InfluenceGraph::seal_weights`]. Parallel edges are kept: they count
/// towards in-degree (IC) and towards the predecessor list (LT).
#[derive(Debug, Clone, Default)]
pub struct InfluenceGraph {
    /// Node weight is the external id, edge weight the propagation probability.
    /// Only mutated through `add_edge` and sealing, so it never drifts from `id_to_node`.
    pub(crate) graph: DiGraph<NodeId, f64>,

    /// Ordered mapping from external id to node index.
    id_to_node: BTreeMap<NodeId, NodeIndex>,

    /// Model the weights were sealed for; `None` until sealed.
    model: Option<DiffusionModel>,
}

impl InfluenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&idx) = self.id_to_node.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.id_to_node.insert(id, idx);
        idx
    }

    /// Append `u -> v` to both adjacency views. No self-loop or duplicate rejection.
    ///
    /// Adding an edge to a sealed graph invalidates the seal: weights are stale
    /// until [`InfluenceGraph::seal_weights`] is called again.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        let source = self.get_or_create_node(u);
        let target = self.get_or_create_node(v);
        self.graph.add_edge(source, target, 0.0);
        if let Some(model) = self.model.take() {
            tracing::debug!(%model, u, v, "edge added after sealing; weights invalidated");
        }
    }

    /// Seal propagation weights for `model` with the default [`WeightParams`].
    pub fn seal_weights(&mut self, model: DiffusionModel, seed: u64) -> ImResult<()> {
        self.seal_weights_with(model, seed, &WeightParams::default())
    }

    /// Seal propagation weights for `model`.
    ///
    /// - IC: `weight(u, v) = 1 / indegree(v)`.
    /// - LT: one uniform draw per incoming edge of `v`, each divided by
    ///   `sum_of_draws * lt_normalization`.
    ///
    /// Precondition: call once, after every edge has been added. A second call
    /// overwrites the previous weights.
    pub fn seal_weights_with(
        &mut self,
        model: DiffusionModel,
        seed: u64,
        params: &WeightParams,
    ) -> ImResult<()> {
        if !(params.lt_normalization.is_finite() && params.lt_normalization > 0.0) {
            return Err(ImError::invalid(format!(
                "lt_normalization must be a positive finite number, got {}",
                params.lt_normalization
            )));
        }
        if let Some(previous) = self.model {
            tracing::warn!(%previous, %model, "re-sealing graph; previous weights are overwritten");
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let targets: Vec<NodeIndex> = self.id_to_node.values().copied().collect();

        for v in targets {
            let incoming = self.incoming_edges(v);
            if incoming.is_empty() {
                continue;
            }

            match model {
                DiffusionModel::IndependentCascade => {
                    let w = 1.0 / incoming.len() as f64;
                    for (edge, _) in incoming {
                        self.graph[edge] = w;
                    }
                }
                DiffusionModel::LinearThreshold => {
                    let draws: Vec<f64> = incoming.iter().map(|_| rng.random::<f64>()).collect();
                    let sum: f64 = draws.iter().sum();

                    // Weights are keyed by (u, v): for parallel edges the last draw wins.
                    let mut pair_weight: HashMap<NodeIndex, f64> = HashMap::new();
                    for ((_, source), draw) in incoming.iter().zip(&draws) {
                        let w = if sum > 0.0 {
                            draw / (sum * params.lt_normalization)
                        } else {
                            0.0
                        };
                        pair_weight.insert(*source, w);
                    }
                    for (edge, source) in incoming {
                        self.graph[edge] = pair_weight[&source];
                    }
                }
            }
        }

        self.model = Some(model);
        Ok(())
    }

    /// Incoming edges of `v` in insertion order.
    fn incoming_edges(&self, v: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(v, Direction::Incoming)
            .map(|e| (e.id(), e.source()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges
    }

    pub fn model(&self) -> Option<DiffusionModel> {
        self.model
    }

    pub fn is_sealed(&self) -> bool {
        self.model.is_some()
    }

    /// The sealed model, or [`ImError::UnsealedGraph`].
    pub fn require_sealed(&self) -> ImResult<DiffusionModel> {
        self.model.ok_or(ImError::UnsealedGraph)
    }

    pub fn node_count(&self) -> usize {
        self.id_to_node.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Read-only view of the underlying petgraph.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, f64> {
        &self.graph
    }

    /// Node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.id_to_node.keys().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_to_node.contains_key(&id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_to_node.get(&id).copied()
    }

    pub fn id_of(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx]
    }

    /// Successors of `id` in insertion order, duplicates preserved.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Predecessors of `id` in insertion order, duplicates preserved.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.adjacent(id, Direction::Incoming)
    }

    fn adjacent(&self, id: NodeId, dir: Direction) -> Vec<NodeId> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = if dir == Direction::Outgoing {
                    e.target()
                } else {
                    e.source()
                };
                (e.id(), self.graph[other])
            })
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.index_of(id)
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Propagation weight of `u -> v`; 0.0 when there is no such edge.
    pub fn weight(&self, u: NodeId, v: NodeId) -> f64 {
        let (Some(a), Some(b)) = (self.index_of(u), self.index_of(v)) else {
            return 0.0;
        };
        self.graph
            .find_edge(a, b)
            .map(|e| self.graph[e])
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> InfluenceGraph {
        let mut g = InfluenceGraph::new();
        g.add_edge(0, 1);
        g.add_edge(0, 2);
        g.add_edge(1, 3);
        g.add_edge(2, 3);
        g
    }

    #[test]
    fn test_add_edge_mirrors_both_views() {
        let g = diamond();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.successors(0), vec![1, 2]);
        assert_eq!(g.predecessors(3), vec![1, 2]);
        assert!(g.predecessors(0).is_empty());
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_node_count_follows_id_map() {
        let mut g = diamond();
        g.graph.add_node(99);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.as_petgraph().node_count(), 5);
        assert!(!g.contains(99));
    }

    #[test]
    fn test_multi_edges_are_preserved() {
        let mut g = InfluenceGraph::new();
        g.add_edge(0, 1);
        g.add_edge(0, 1);
        g.add_edge(2, 1);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.successors(0), vec![1, 1]);
        assert_eq!(g.in_degree(1), 3);

        g.seal_weights(DiffusionModel::IndependentCascade, 1).unwrap();
        assert!((g.weight(0, 1) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ic_weights_are_inverse_indegree() {
        let mut g = diamond();
        g.seal_weights(DiffusionModel::IndependentCascade, 7).unwrap();
        assert_eq!(g.weight(0, 1), 1.0);
        assert_eq!(g.weight(0, 2), 1.0);
        assert_eq!(g.weight(1, 3), 0.5);
        assert_eq!(g.weight(2, 3), 0.5);
    }

    #[test]
    fn test_absent_pair_weighs_zero() {
        let mut g = diamond();
        g.seal_weights(DiffusionModel::IndependentCascade, 7).unwrap();
        assert_eq!(g.weight(3, 0), 0.0);
        assert_eq!(g.weight(0, 3), 0.0);
        assert_eq!(g.weight(42, 0), 0.0);
    }

    #[test]
    fn test_lt_in_weights_sum_to_inverse_normalization() {
        let mut g = InfluenceGraph::new();
        for u in 1..=5 {
            g.add_edge(u, 0);
        }
        g.seal_weights(DiffusionModel::LinearThreshold, 42).unwrap();
        let total: f64 = (1..=5).map(|u| g.weight(u, 0)).sum();
        assert!((total - 1.0 / DEFAULT_LT_NORMALIZATION).abs() < 1e-12);
        for u in 1..=5 {
            let w = g.weight(u, 0);
            assert!(w > 0.0 && w < 1.0);
        }
    }

    #[test]
    fn test_lt_weights_reproducible_for_seed() {
        let mut a = diamond();
        let mut b = diamond();
        a.seal_weights(DiffusionModel::LinearThreshold, 99).unwrap();
        b.seal_weights(DiffusionModel::LinearThreshold, 99).unwrap();
        for (u, v) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            assert_eq!(a.weight(u, v), b.weight(u, v));
        }
    }

    #[test]
    fn test_custom_normalization() {
        let mut g = diamond();
        let params = WeightParams {
            lt_normalization: 2.0,
        };
        g.seal_weights_with(DiffusionModel::LinearThreshold, 3, &params)
            .unwrap();
        let total = g.weight(1, 3) + g.weight(2, 3);
        assert!((total - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_normalization_rejected_without_sealing() {
        let mut g = diamond();
        let params = WeightParams {
            lt_normalization: 0.0,
        };
        let err = g
            .seal_weights_with(DiffusionModel::LinearThreshold, 3, &params)
            .unwrap_err();
        assert!(matches!(err, ImError::InvalidArgument(_)));
        assert!(!g.is_sealed());
        assert_eq!(g.weight(1, 3), 0.0);
    }

    #[test]
    fn test_unsealed_until_sealed_and_invalidated_by_new_edges() {
        let mut g = diamond();
        assert_eq!(g.require_sealed(), Err(ImError::UnsealedGraph));
        g.seal_weights(DiffusionModel::IndependentCascade, 0).unwrap();
        assert_eq!(
            g.require_sealed(),
            Ok(DiffusionModel::IndependentCascade)
        );
        g.add_edge(3, 4);
        assert!(!g.is_sealed());
    }
}
