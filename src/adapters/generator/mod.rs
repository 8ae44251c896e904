//! Synthetic network generators
//!
//! Every generator implements [`GraphGenerator`] and produces an unsealed
//! [`InfluenceGraph`]. Output depends only on the parameters and the random source.

mod barabasi_albert;
mod erdos_renyi;
mod fixture;
mod watts_strogatz;

pub use barabasi_albert::BarabasiAlbert;
pub use erdos_renyi::ErdosRenyi;
pub use fixture::{FIXTURE_EDGES, FixtureGraph};
pub use watts_strogatz::WattsStrogatz;

use crate::domain::error::{ImError, ImResult};
use crate::domain::graph::NodeId;

#[cfg(test)]
use crate::domain::graph::InfluenceGraph;

/// Most nodes a generator will build.
pub const MAX_NODES: usize = 1_000_000;

/// Most directed edges a generator will build. For G(n, p) this bounds the
/// `n·(n−1)` ordered pairs drawn, since every pair costs one draw.
pub const MAX_EDGES: usize = 20_000_000;

/// Checks `n` against [`MAX_NODES`] and returns it as a `NodeId`.
fn checked_node_count(n: usize) -> ImResult<NodeId> {
    if n > MAX_NODES {
        return Err(ImError::invalid(format!(
            "n = {n} exceeds the limit of {MAX_NODES} nodes"
        )));
    }
    NodeId::try_from(n).map_err(|_| ImError::invalid(format!("n = {n} exceeds the node id range")))
}

/// Rejects an edge total that overflowed (`None`) or exceeds [`MAX_EDGES`].
fn check_edge_budget(generator: &str, edges: Option<usize>) -> ImResult<()> {
    match edges {
        Some(e) if e <= MAX_EDGES => Ok(()),
        Some(e) => Err(ImError::invalid(format!(
            "{generator}: {e} edges exceeds the limit of {MAX_EDGES}"
        ))),
        None => Err(ImError::invalid(format!(
            "{generator}: edge count overflows, limit is {MAX_EDGES}"
        ))),
    }
}

fn check_probability(name: &str, p: f64) -> ImResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ImError::invalid(format!("{name} = {p} must lie in [0, 1]")));
    }
    Ok(())
}

/// Adjacency snapshot used to compare generated graphs in tests.
#[cfg(test)]
fn adjacency(graph: &InfluenceGraph) -> Vec<(NodeId, Vec<NodeId>)> {
    graph.nodes().map(|u| (u, graph.successors(u))).collect()
}
