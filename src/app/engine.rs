use crate::adapters::generator::{BarabasiAlbert, ErdosRenyi, FixtureGraph, WattsStrogatz};
use crate::app::dto::*;
use crate::domain::celf::CelfMaximizer;
use crate::domain::estimator::MonteCarloEstimator;
use crate::domain::graph::InfluenceGraph;
use crate::domain::greedy::NaiveGreedyMaximizer;
use crate::domain::model::DiffusionModel;
use crate::domain::ports::{GraphGenerator, InfluenceMaximizer};
use crate::domain::result::RunResult;
use anyhow::{Context as _, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base seed for graph generation, weight sealing and simulation.
    pub seed: u64,
    /// Run the trials of each estimate on the rayon pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            parallel: false,
        }
    }
}

/// A generated (or explicit) graph with its weights sealed.
#[derive(Debug, Clone)]
pub struct SealedGraph {
    pub name: String,
    pub graph: InfluenceGraph,
}

impl SealedGraph {
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            name: self.name.clone(),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            model: self.graph.model().unwrap_or_default(),
        }
    }
}

/// Application facade shared by the CLI and the HTTP server.
#[derive(Debug, Clone, Default)]
pub struct InfluenceEngine {
    config: EngineConfig,
}

impl InfluenceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            seed: self.config.seed,
            parallel: self.config.parallel,
        }
    }

    /// Build the graph described by `spec` and seal it for `model`.
    ///
    /// The same `seed` drives generation and sealing, so a request is reproducible.
    pub fn build_graph(
        &self,
        spec: &GraphSpec,
        model: DiffusionModel,
        seed: u64,
    ) -> Result<SealedGraph> {
        let (name, mut graph) = match spec {
            GraphSpec::Edges { edges } => {
                let mut graph = InfluenceGraph::new();
                for &(u, v) in edges {
                    graph.add_edge(u, v);
                }
                ("edges".to_string(), graph)
            }
            other => {
                let generator = generator_for(other)?;
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let graph = generator
                    .generate(&mut rng)
                    .with_context(|| format!("Failed to generate graph {}", generator.name()))?;
                (generator.name(), graph)
            }
        };

        graph
            .seal_weights(model, seed)
            .context("Failed to seal propagation weights")?;

        tracing::info!(
            graph = %name,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            %model,
            "graph ready"
        );
        Ok(SealedGraph { name, graph })
    }

    fn estimator(&self, seed: u64) -> MonteCarloEstimator {
        MonteCarloEstimator::new(seed).with_parallel(self.config.parallel)
    }

    /// Run one algorithm on an already sealed graph.
    pub fn run(
        &self,
        graph: &InfluenceGraph,
        algorithm: AlgorithmKind,
        k: usize,
        num_simulations: usize,
        seed: u64,
    ) -> Result<RunResult> {
        let estimator = self.estimator(seed);
        let result = match algorithm {
            AlgorithmKind::Greedy => {
                NaiveGreedyMaximizer::new(estimator).select(graph, k, num_simulations)
            }
            AlgorithmKind::Celf => CelfMaximizer::new(estimator).select(graph, k, num_simulations),
        };
        result.with_context(|| format!("{} selection failed", algorithm.as_str()))
    }

    pub fn select(&self, req: SelectRequest) -> Result<SelectResponse> {
        let seed = req.seed.unwrap_or(self.config.seed);
        let sealed = self.build_graph(&req.graph, req.model, seed)?;
        let result = self.run(
            &sealed.graph,
            req.algorithm,
            req.k,
            req.num_simulations,
            seed,
        )?;

        Ok(SelectResponse {
            graph: sealed.summary(),
            run: RunSummary::from_result(&result, sealed.graph.node_count()),
        })
    }

    /// Run both maximizers on the same sealed graph.
    pub fn compare(&self, req: CompareRequest) -> Result<CompareResponse> {
        let seed = req.seed.unwrap_or(self.config.seed);
        let sealed = self.build_graph(&req.graph, req.model, seed)?;
        let n = sealed.graph.node_count();

        let greedy = self.run(
            &sealed.graph,
            AlgorithmKind::Greedy,
            req.k,
            req.num_simulations,
            seed,
        )?;
        let celf = self.run(
            &sealed.graph,
            AlgorithmKind::Celf,
            req.k,
            req.num_simulations,
            seed,
        )?;

        let evaluation_ratio = (celf.total_evaluations() > 0)
            .then(|| greedy.total_evaluations() as f64 / celf.total_evaluations() as f64);
        let spread_difference = (greedy.final_spread() - celf.final_spread()).abs();

        tracing::info!(
            spread_difference,
            greedy_evaluations = greedy.total_evaluations(),
            celf_evaluations = celf.total_evaluations(),
            ?evaluation_ratio,
            "comparison finished"
        );

        Ok(CompareResponse {
            graph: sealed.summary(),
            same_seed_set: greedy.seed_set() == celf.seed_set(),
            greedy: RunSummary::from_result(&greedy, n),
            celf: RunSummary::from_result(&celf, n),
            spread_difference,
            evaluation_ratio,
        })
    }
}

fn generator_for(spec: &GraphSpec) -> Result<Box<dyn GraphGenerator>> {
    let generator: Box<dyn GraphGenerator> = match *spec {
        GraphSpec::BarabasiAlbert { n, m } => Box::new(BarabasiAlbert::new(n, m)),
        GraphSpec::WattsStrogatz { n, k, p } => Box::new(WattsStrogatz::new(n, k, p)),
        GraphSpec::ErdosRenyi { n, p } => Box::new(ErdosRenyi::new(n, p)),
        GraphSpec::Small => Box::new(FixtureGraph),
        GraphSpec::Edges { .. } => anyhow::bail!("edge lists are not generated"),
    };
    Ok(generator)
}
