//! Experiment suite smoke run into a temporary directory.

use influence_max::adapters::report::write_history;
use influence_max::app::experiments::{ExperimentPlan, ExperimentRunner};
use influence_max::domain::celf::CelfMaximizer;
use influence_max::domain::estimator::MonteCarloEstimator;
use influence_max::domain::model::DiffusionModel;
use influence_max::domain::ports::InfluenceMaximizer;

mod common;

fn header(path: &std::path::Path) -> String {
    let content = std::fs::read_to_string(path).unwrap();
    content.lines().next().unwrap_or_default().to_string()
}

#[test]
fn test_quick_suite_writes_every_table() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("results");
    let mut runner = ExperimentRunner::new(&out, ExperimentPlan::quick(), 42)?;
    let report = runner.run_all()?;

    let names: Vec<String> = report
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "exp1_scaling.csv",
            "exp2_comparison.csv",
            "exp3_spread_IC.csv",
            "exp3_spread_LT.csv",
            "exp4_network_types.csv",
        ]
    );

    assert_eq!(
        header(&out.join("exp1_scaling.csv")),
        "graph,n,m,k,algorithm,runtime,spread,evaluations"
    );
    assert_eq!(
        header(&out.join("exp2_comparison.csv")),
        "k,algorithm,runtime,evaluations,spread"
    );
    assert_eq!(header(&out.join("exp3_spread_LT.csv")), "k,spread,marginal_gain");
    assert_eq!(
        header(&out.join("exp4_network_types.csv")),
        "network,n,m,avg_degree,spread,spread_percent"
    );

    let plan = ExperimentPlan::quick();
    assert_eq!(report.scaling.len(), plan.scaling_sizes.len());
    assert_eq!(report.comparison.len(), 2 * plan.comparison_ks.len());
    assert_eq!(report.spread.len(), 2);
    assert_eq!(report.spread[0].0, DiffusionModel::IndependentCascade);
    assert_eq!(report.spread[0].1.len(), plan.spread_k);
    let networks: Vec<&str> = report.networks.iter().map(|r| r.network.as_str()).collect();
    assert_eq!(networks, vec!["BA_30", "WS_30", "ER_30"]);

    for pair in report.comparison.chunks(2) {
        assert_eq!(pair[0].algorithm, "Greedy");
        assert_eq!(pair[1].algorithm, "CELF");
        assert!(pair[1].evaluations < pair[0].evaluations);
    }
    Ok(())
}

#[test]
fn test_history_csv_export() -> anyhow::Result<()> {
    let g = common::fixtures::small_graph(DiffusionModel::IndependentCascade);
    let result = CelfMaximizer::new(MonteCarloEstimator::new(42)).select(&g, 3, 200)?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("history.csv");
    write_history(&path, &result)?;

    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "round,node,marginal_gain,cumulative_spread,elapsed_seconds,evaluations"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("1,0,"));
    Ok(())
}

#[test]
fn test_unwritable_output_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not_a_dir");
    std::fs::write(&file, "x").unwrap();
    assert!(ExperimentRunner::new(&file, ExperimentPlan::quick(), 1).is_err());
}
