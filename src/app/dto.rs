use crate::domain::graph::NodeId;
use crate::domain::model::DiffusionModel;
use crate::domain::result::{IterationRecord, RunResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    Greedy,
    #[default]
    Celf,
}

impl AlgorithmKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Greedy => "greedy",
            AlgorithmKind::Celf => "celf",
        }
    }
}

/// Which network to build before sealing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphSpec {
    BarabasiAlbert {
        n: usize,
        m: usize,
    },
    WattsStrogatz {
        n: usize,
        k: usize,
        p: f64,
    },
    ErdosRenyi {
        n: usize,
        p: f64,
    },
    /// The fixed 10-node demo graph.
    #[default]
    Small,
    /// Explicit directed edge list.
    Edges {
        edges: Vec<(NodeId, NodeId)>,
    },
}

fn default_simulations() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub graph: GraphSpec,
    #[serde(default)]
    pub model: DiffusionModel,
    #[serde(default)]
    pub algorithm: AlgorithmKind,
    pub k: usize,
    #[serde(default = "default_simulations")]
    pub num_simulations: usize,
    /// Overrides the engine seed for this request.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub graph: GraphSpec,
    #[serde(default)]
    pub model: DiffusionModel,
    pub k: usize,
    #[serde(default = "default_simulations")]
    pub num_simulations: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub model: DiffusionModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub algorithm: String,
    pub seeds: Vec<NodeId>,
    pub final_spread: f64,
    pub total_evaluations: u64,
    pub total_seconds: f64,
    /// `(k * n) / total_evaluations`; an approximation, not a measured ratio.
    pub theoretical_speedup: Option<f64>,
    pub history: Vec<IterationRecord>,
}

impl RunSummary {
    pub fn from_result(result: &RunResult, node_count: usize) -> Self {
        Self {
            algorithm: result.algorithm().to_string(),
            seeds: result.seeds().to_vec(),
            final_spread: result.final_spread(),
            total_evaluations: result.total_evaluations(),
            total_seconds: result.total_seconds(),
            theoretical_speedup: result.theoretical_speedup(node_count),
            history: result.history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectResponse {
    pub graph: GraphSummary,
    pub run: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareResponse {
    pub graph: GraphSummary,
    pub greedy: RunSummary,
    pub celf: RunSummary,
    /// `|greedy spread - celf spread|`.
    pub spread_difference: f64,
    /// Measured `greedy evaluations / celf evaluations`.
    pub evaluation_ratio: Option<f64>,
    pub same_seed_set: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub seed: u64,
    pub parallel: bool,
}
