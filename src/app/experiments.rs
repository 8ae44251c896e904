//! Batch experiment suite
//!
//! Four experiments over synthetic networks, each written to one CSV file in the
//! output directory:
//!
//! 1. `exp1_scaling.csv`: CELF runtime and evaluations as BA graphs grow.
//! 2. `exp2_comparison.csv`: naive greedy against CELF for several `k`.
//! 3. `exp3_spread_<MODEL>.csv`: CELF spread curve under IC and LT.
//! 4. `exp4_network_types.csv`: CELF spread on BA, WS and ER networks.
//!
//! All graphs come from a single ChaCha stream seeded by the runner, so a suite
//! run is reproducible end to end.

use crate::adapters::generator::{BarabasiAlbert, ErdosRenyi, WattsStrogatz};
use crate::adapters::report::{CsvRecord, write_records};
use crate::domain::celf::CelfMaximizer;
use crate::domain::estimator::MonteCarloEstimator;
use crate::domain::graph::InfluenceGraph;
use crate::domain::greedy::NaiveGreedyMaximizer;
use crate::domain::model::DiffusionModel;
use crate::domain::ports::{GraphGenerator, InfluenceMaximizer};
use crate::domain::result::RunResult;
use anyhow::{Context as _, Result};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

/// Sizes and budgets of every experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentPlan {
    pub scaling_sizes: Vec<usize>,
    pub scaling_m: usize,
    pub scaling_k: usize,
    pub scaling_simulations: usize,

    pub comparison_n: usize,
    pub comparison_m: usize,
    pub comparison_ks: Vec<usize>,
    pub comparison_simulations: usize,

    pub spread_n: usize,
    pub spread_m: usize,
    pub spread_k: usize,
    pub spread_simulations: usize,

    pub network_n: usize,
    pub network_ba_m: usize,
    pub network_ws_k: usize,
    pub network_ws_p: f64,
    pub network_er_p: f64,
    pub network_k: usize,
    pub network_simulations: usize,
}

impl Default for ExperimentPlan {
    fn default() -> Self {
        Self {
            scaling_sizes: vec![50, 100, 200, 500],
            scaling_m: 3,
            scaling_k: 10,
            scaling_simulations: 500,

            comparison_n: 200,
            comparison_m: 3,
            comparison_ks: vec![5, 10, 15, 20],
            comparison_simulations: 300,

            spread_n: 200,
            spread_m: 3,
            spread_k: 30,
            spread_simulations: 500,

            network_n: 100,
            network_ba_m: 3,
            network_ws_k: 6,
            network_ws_p: 0.3,
            network_er_p: 0.05,
            network_k: 15,
            network_simulations: 500,
        }
    }
}

impl ExperimentPlan {
    /// Small plan for smoke runs; finishes in well under a second.
    pub fn quick() -> Self {
        Self {
            scaling_sizes: vec![20, 40],
            scaling_m: 2,
            scaling_k: 3,
            scaling_simulations: 50,

            comparison_n: 30,
            comparison_m: 2,
            comparison_ks: vec![2, 4],
            comparison_simulations: 30,

            spread_n: 30,
            spread_m: 2,
            spread_k: 5,
            spread_simulations: 50,

            network_n: 30,
            network_ba_m: 2,
            network_ws_k: 4,
            network_ws_p: 0.3,
            network_er_p: 0.15,
            network_k: 4,
            network_simulations: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingRow {
    pub graph: String,
    pub n: usize,
    /// Directed edge count.
    pub m: usize,
    pub k: usize,
    pub algorithm: &'static str,
    pub runtime: f64,
    pub spread: f64,
    pub evaluations: u64,
}

impl CsvRecord for ScalingRow {
    fn header() -> &'static [&'static str] {
        &[
            "graph",
            "n",
            "m",
            "k",
            "algorithm",
            "runtime",
            "spread",
            "evaluations",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.graph.clone(),
            self.n.to_string(),
            self.m.to_string(),
            self.k.to_string(),
            self.algorithm.to_string(),
            format!("{:.2}", self.runtime),
            format!("{:.2}", self.spread),
            self.evaluations.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub k: usize,
    pub algorithm: &'static str,
    pub runtime: f64,
    pub evaluations: u64,
    pub spread: f64,
}

impl CsvRecord for ComparisonRow {
    fn header() -> &'static [&'static str] {
        &["k", "algorithm", "runtime", "evaluations", "spread"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.k.to_string(),
            self.algorithm.to_string(),
            format!("{:.2}", self.runtime),
            self.evaluations.to_string(),
            format!("{:.2}", self.spread),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadRow {
    pub k: usize,
    pub spread: f64,
    pub marginal_gain: f64,
}

impl CsvRecord for SpreadRow {
    fn header() -> &'static [&'static str] {
        &["k", "spread", "marginal_gain"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.k.to_string(),
            format!("{:.2}", self.spread),
            format!("{:.2}", self.marginal_gain),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRow {
    pub network: String,
    pub n: usize,
    pub m: usize,
    /// `2 * m / n`, the undirected-degree convention of the report.
    pub avg_degree: f64,
    pub spread: f64,
    pub spread_percent: f64,
}

impl CsvRecord for NetworkRow {
    fn header() -> &'static [&'static str] {
        &["network", "n", "m", "avg_degree", "spread", "spread_percent"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.network.clone(),
            self.n.to_string(),
            self.m.to_string(),
            format!("{:.2}", self.avg_degree),
            format!("{:.2}", self.spread),
            format!("{:.2}", self.spread_percent),
        ]
    }
}

/// Rows of a full suite run plus the files written.
#[derive(Debug, Clone, Default)]
pub struct ExperimentReport {
    pub scaling: Vec<ScalingRow>,
    pub comparison: Vec<ComparisonRow>,
    pub spread: Vec<(DiffusionModel, Vec<SpreadRow>)>,
    pub networks: Vec<NetworkRow>,
    pub files: Vec<PathBuf>,
}

pub struct ExperimentRunner {
    out_dir: PathBuf,
    plan: ExperimentPlan,
    parallel: bool,
    rng: ChaCha8Rng,
}

impl ExperimentRunner {
    /// Create the runner and its output directory.
    pub fn new(out_dir: impl Into<PathBuf>, plan: ExperimentPlan, seed: u64) -> Result<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir).with_context(|| {
            format!("Failed to create output directory: {}", out_dir.display())
        })?;
        Ok(Self {
            out_dir,
            plan,
            parallel: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn plan(&self) -> &ExperimentPlan {
        &self.plan
    }

    fn sealed(
        &mut self,
        generator: &dyn GraphGenerator,
        model: DiffusionModel,
    ) -> Result<InfluenceGraph> {
        let mut graph = generator
            .generate(&mut self.rng)
            .with_context(|| format!("Failed to generate {}", generator.name()))?;
        let seal_seed = self.rng.next_u64();
        graph
            .seal_weights(model, seal_seed)
            .with_context(|| format!("Failed to seal {}", generator.name()))?;
        Ok(graph)
    }

    fn estimator(&mut self) -> MonteCarloEstimator {
        MonteCarloEstimator::new(self.rng.next_u64()).with_parallel(self.parallel)
    }

    fn celf(&mut self, graph: &InfluenceGraph, k: usize, sims: usize) -> Result<RunResult> {
        let k = k.min(graph.node_count());
        CelfMaximizer::new(self.estimator())
            .select(graph, k, sims)
            .context("CELF run failed")
    }

    fn write<R: CsvRecord>(&self, file: &str, rows: &[R]) -> Result<PathBuf> {
        let path = self.out_dir.join(file);
        write_records(&path, rows)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "experiment saved");
        Ok(path)
    }

    pub fn exp1_scaling(&mut self) -> Result<(Vec<ScalingRow>, PathBuf)> {
        tracing::info!("experiment 1: scaling");
        let (m, k, sims) = (
            self.plan.scaling_m,
            self.plan.scaling_k,
            self.plan.scaling_simulations,
        );
        let mut rows = Vec::new();
        for n in self.plan.scaling_sizes.clone() {
            let generator = BarabasiAlbert::new(n, m);
            let graph = self.sealed(&generator, DiffusionModel::IndependentCascade)?;
            let result = self.celf(&graph, k, sims)?;
            rows.push(ScalingRow {
                graph: generator.name(),
                n,
                m: graph.edge_count(),
                k: result.seeds().len(),
                algorithm: "CELF",
                runtime: result.total_seconds(),
                spread: result.final_spread(),
                evaluations: result.total_evaluations(),
            });
        }
        let path = self.write("exp1_scaling.csv", &rows)?;
        Ok((rows, path))
    }

    /// Both algorithms run on the same graph for each `k`.
    pub fn exp2_comparison(&mut self) -> Result<(Vec<ComparisonRow>, PathBuf)> {
        tracing::info!("experiment 2: greedy vs celf");
        let generator = BarabasiAlbert::new(self.plan.comparison_n, self.plan.comparison_m);
        let sims = self.plan.comparison_simulations;
        let mut rows = Vec::new();
        for k in self.plan.comparison_ks.clone() {
            let graph = self.sealed(&generator, DiffusionModel::IndependentCascade)?;
            let k = k.min(graph.node_count());

            let greedy = NaiveGreedyMaximizer::new(self.estimator())
                .select(&graph, k, sims)
                .context("greedy run failed")?;
            let celf = self.celf(&graph, k, sims)?;

            for (label, result) in [("Greedy", &greedy), ("CELF", &celf)] {
                rows.push(ComparisonRow {
                    k,
                    algorithm: label,
                    runtime: result.total_seconds(),
                    evaluations: result.total_evaluations(),
                    spread: result.final_spread(),
                });
            }
        }
        let path = self.write("exp2_comparison.csv", &rows)?;
        Ok((rows, path))
    }

    pub fn exp3_spread(&mut self) -> Result<Vec<(DiffusionModel, Vec<SpreadRow>, PathBuf)>> {
        tracing::info!("experiment 3: spread curves");
        let generator = BarabasiAlbert::new(self.plan.spread_n, self.plan.spread_m);
        let (k, sims) = (self.plan.spread_k, self.plan.spread_simulations);
        let mut out = Vec::new();
        for model in DiffusionModel::ALL {
            let graph = self.sealed(&generator, model)?;
            let result = self.celf(&graph, k, sims)?;
            let rows: Vec<SpreadRow> = result
                .history()
                .iter()
                .map(|h| SpreadRow {
                    k: h.round,
                    spread: h.cumulative_spread,
                    marginal_gain: h.marginal_gain,
                })
                .collect();
            let path = self.write(&format!("exp3_spread_{}.csv", model.tag()), &rows)?;
            out.push((model, rows, path));
        }
        Ok(out)
    }

    pub fn exp4_networks(&mut self) -> Result<(Vec<NetworkRow>, PathBuf)> {
        tracing::info!("experiment 4: network types");
        let plan = self.plan.clone();
        let n = plan.network_n;
        let generators: [Box<dyn GraphGenerator>; 3] = [
            Box::new(BarabasiAlbert::new(n, plan.network_ba_m)),
            Box::new(WattsStrogatz::new(n, plan.network_ws_k, plan.network_ws_p)),
            Box::new(ErdosRenyi::new(n, plan.network_er_p)),
        ];

        let mut graphs = Vec::with_capacity(generators.len());
        for generator in &generators {
            let graph = self.sealed(generator.as_ref(), DiffusionModel::IndependentCascade)?;
            graphs.push((generator.name(), graph));
        }

        let mut rows = Vec::new();
        for (network, graph) in graphs {
            let result = self.celf(&graph, plan.network_k, plan.network_simulations)?;
            let spread = result.final_spread();
            let edges = graph.edge_count();
            rows.push(NetworkRow {
                network,
                n,
                m: edges,
                avg_degree: 2.0 * edges as f64 / n as f64,
                spread,
                spread_percent: 100.0 * spread / n as f64,
            });
        }
        let path = self.write("exp4_network_types.csv", &rows)?;
        Ok((rows, path))
    }

    pub fn run_all(&mut self) -> Result<ExperimentReport> {
        tracing::info!(out_dir = %self.out_dir.display(), "running all experiments");
        let mut report = ExperimentReport::default();

        let (rows, path) = self.exp1_scaling()?;
        report.scaling = rows;
        report.files.push(path);

        let (rows, path) = self.exp2_comparison()?;
        report.comparison = rows;
        report.files.push(path);

        for (model, rows, path) in self.exp3_spread()? {
            report.spread.push((model, rows));
            report.files.push(path);
        }

        let (rows, path) = self.exp4_networks()?;
        report.networks = rows;
        report.files.push(path);

        tracing::info!(files = report.files.len(), "all experiments complete");
        Ok(report)
    }
}
