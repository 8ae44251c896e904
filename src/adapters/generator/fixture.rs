use crate::domain::error::ImResult;
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::ports::GraphGenerator;
use rand::RngCore;

/// Edges of the fixed 10-node demo graph, one directed edge per pair.
pub const FIXTURE_EDGES: [(NodeId, NodeId); 12] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 3),
    (3, 4),
    (3, 5),
    (4, 6),
    (5, 6),
    (1, 7),
    (2, 7),
    (7, 8),
    (8, 9),
];

/// The fixed 10-node graph. Ignores the random source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureGraph;

impl GraphGenerator for FixtureGraph {
    fn name(&self) -> String {
        "small".to_string()
    }

    fn generate(&self, _rng: &mut dyn RngCore) -> ImResult<InfluenceGraph> {
        let mut graph = InfluenceGraph::new();
        for (u, v) in FIXTURE_EDGES {
            graph.add_edge(u, v);
        }
        Ok(graph)
    }
}
