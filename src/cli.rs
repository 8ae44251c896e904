use crate::app::dto::{
    AlgorithmKind, CompareRequest, CompareResponse, GraphSpec, RunSummary, SelectRequest,
    SelectResponse,
};
use crate::app::engine::InfluenceEngine;
use crate::app::experiments::{ExperimentPlan, ExperimentReport, ExperimentRunner};
use anyhow::{Context as _, Result};
use clap::ValueEnum;
use std::path::Path;

/// Network family selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphKind {
    /// Barabási–Albert preferential attachment.
    Ba,
    /// Watts–Strogatz small world.
    Ws,
    /// Erdős–Rényi G(n, p).
    Er,
    /// Fixed 10-node demo graph.
    Small,
}

/// Map CLI graph flags to a [`GraphSpec`], filling family-specific defaults.
///
/// `degree` is `m` for BA and the lattice degree `k` for WS; `prob` is the
/// rewiring probability for WS and the edge probability for ER.
pub fn graph_spec(
    kind: GraphKind,
    nodes: usize,
    degree: Option<usize>,
    prob: Option<f64>,
) -> GraphSpec {
    match kind {
        GraphKind::Ba => GraphSpec::BarabasiAlbert {
            n: nodes,
            m: degree.unwrap_or(3),
        },
        GraphKind::Ws => GraphSpec::WattsStrogatz {
            n: nodes,
            k: degree.unwrap_or(6),
            p: prob.unwrap_or(0.3),
        },
        GraphKind::Er => GraphSpec::ErdosRenyi {
            n: nodes,
            p: prob.unwrap_or(0.05),
        },
        GraphKind::Small => GraphSpec::Small,
    }
}

fn print_run(run: &RunSummary) {
    println!("{} Result:", run.algorithm.to_uppercase());
    println!("  Seeds: {:?}", run.seeds);
    println!("  Final spread: {:.2}", run.final_spread);
    println!("  Evaluations: {}", run.total_evaluations);
    println!("  Runtime: {:.3}s", run.total_seconds);
    if let Some(speedup) = run.theoretical_speedup {
        println!("  Theoretical speedup: {:.2}x", speedup);
    }
    println!(
        "\n  {:>5}  {:>6}  {:>10}  {:>10}  {:>11}",
        "round", "node", "gain", "spread", "evaluations"
    );
    for h in &run.history {
        println!(
            "  {:>5}  {:>6}  {:>10.2}  {:>10.2}  {:>11}",
            h.round, h.node, h.marginal_gain, h.cumulative_spread, h.evaluations_so_far
        );
    }
}

pub fn display_selection(resp: &SelectResponse) {
    let g = &resp.graph;
    println!(
        "Graph {}: {} nodes, {} edges, model {}",
        g.name, g.node_count, g.edge_count, g.model
    );
    println!("{}", "=".repeat(60));
    print_run(&resp.run);
}

pub fn display_comparison(resp: &CompareResponse) {
    let g = &resp.graph;
    println!(
        "Graph {}: {} nodes, {} edges, model {}",
        g.name, g.node_count, g.edge_count, g.model
    );
    println!("{}", "=".repeat(60));
    print_run(&resp.greedy);
    println!();
    print_run(&resp.celf);
    println!("\n{}", "=".repeat(60));
    println!("Spread difference: {:.2}", resp.spread_difference);
    if let Some(ratio) = resp.evaluation_ratio {
        println!("Evaluation ratio (greedy / celf): {:.2}", ratio);
    }
    println!(
        "Same seed set: {}",
        if resp.same_seed_set { "yes" } else { "no" }
    );
}

pub fn display_experiments(report: &ExperimentReport) {
    println!("\n{}", "=".repeat(60));
    println!("Scaling (CELF):");
    for row in &report.scaling {
        println!(
            "  {:<8} n={:<5} edges={:<6} spread={:>7.2} evals={:<6} {:.2}s",
            row.graph, row.n, row.m, row.spread, row.evaluations, row.runtime
        );
    }
    println!("Greedy vs CELF:");
    for row in &report.comparison {
        println!(
            "  k={:<3} {:<6} spread={:>7.2} evals={:<6} {:.2}s",
            row.k, row.algorithm, row.spread, row.evaluations, row.runtime
        );
    }
    for (model, rows) in &report.spread {
        if let Some(last) = rows.last() {
            println!("Spread curve {}: k={} spread={:.2}", model, last.k, last.spread);
        }
    }
    println!("Network types:");
    for row in &report.networks {
        println!(
            "  {:<8} edges={:<6} spread={:>7.2} ({:.1}%)",
            row.network, row.m, row.spread, row.spread_percent
        );
    }
    println!("{}", "=".repeat(60));
    println!("Saved {} files:", report.files.len());
    for file in &report.files {
        println!("  {}", file.display());
    }
}

pub fn select_and_display(engine: &InfluenceEngine, req: SelectRequest, json: bool) -> Result<()> {
    let algorithm: AlgorithmKind = req.algorithm;
    let resp = engine
        .select(req)
        .with_context(|| format!("Failed to run {}", algorithm.as_str()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        display_selection(&resp);
    }
    Ok(())
}

pub fn compare_and_display(engine: &InfluenceEngine, req: CompareRequest, json: bool) -> Result<()> {
    let resp = engine.compare(req).context("Failed to compare algorithms")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        display_comparison(&resp);
    }
    Ok(())
}

pub fn run_experiments(engine: &InfluenceEngine, out_dir: &Path, quick: bool) -> Result<()> {
    let plan = if quick {
        ExperimentPlan::quick()
    } else {
        ExperimentPlan::default()
    };
    let config = engine.config();
    let mut runner =
        ExperimentRunner::new(out_dir, plan, config.seed)?.with_parallel(config.parallel);
    let report = runner.run_all().context("Experiment suite failed")?;
    display_experiments(&report);
    Ok(())
}
