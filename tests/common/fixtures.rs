//! Graph fixtures for integration tests.
#![allow(dead_code)]

use influence_max::adapters::generator::{BarabasiAlbert, FIXTURE_EDGES};
use influence_max::domain::graph::InfluenceGraph;
use influence_max::domain::model::DiffusionModel;
use influence_max::domain::ports::GraphGenerator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The fixed 10-node graph, sealed with seed 42.
pub fn small_graph(model: DiffusionModel) -> InfluenceGraph {
    let mut g = InfluenceGraph::new();
    for (u, v) in FIXTURE_EDGES {
        g.add_edge(u, v);
    }
    g.seal_weights(model, 42).unwrap();
    g
}

/// In-degree <= 1 everywhere, so every IC weight is 1.0 and spreads are exact.
///   0 -> 1, 0 -> 2, 0 -> 3      4 -> 5
pub fn certain_forest() -> InfluenceGraph {
    let mut g = InfluenceGraph::new();
    for (u, v) in [(0, 1), (0, 2), (0, 3), (4, 5)] {
        g.add_edge(u, v);
    }
    g.seal_weights(DiffusionModel::IndependentCascade, 1).unwrap();
    g
}

pub fn two_node_graph() -> InfluenceGraph {
    let mut g = InfluenceGraph::new();
    g.add_edge(0, 1);
    g.seal_weights(DiffusionModel::IndependentCascade, 0).unwrap();
    g
}

pub fn ba_graph(n: usize, m: usize, seed: u64, model: DiffusionModel) -> InfluenceGraph {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut g = BarabasiAlbert::new(n, m).generate(&mut rng).unwrap();
    g.seal_weights(model, seed).unwrap();
    g
}
