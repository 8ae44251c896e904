//! Sanity check: library and test common module are accessible.

mod common;

use influence_max::domain::graph::InfluenceGraph;
use influence_max::domain::ports::SpreadOracle;

#[test]
fn test_library_accessible() {
    let graph = InfluenceGraph::new();
    assert_eq!(graph.node_count(), 0);
    assert!(!graph.is_sealed());
}

#[test]
fn test_coverage_oracle_counts_calls() {
    use common::mock::CoverageOracle;

    let g = common::fixtures::certain_forest();
    let mut oracle = CoverageOracle::new(vec![vec![0, 1], vec![1, 2], vec![], vec![3], vec![], vec![]]);
    assert_eq!(oracle.estimate(&g, &[0, 1], 1).unwrap(), 3.0);
    assert_eq!(oracle.estimate(&g, &[], 1).unwrap(), 0.0);
    assert_eq!(oracle.evaluations(), 2);
    oracle.reset_evaluations();
    assert_eq!(oracle.evaluations(), 0);
}

#[test]
fn test_recording_oracle_keeps_queries() {
    use common::mock::RecordingOracle;
    use influence_max::domain::estimator::MonteCarloEstimator;

    let g = common::fixtures::two_node_graph();
    let mut oracle = RecordingOracle::new(MonteCarloEstimator::new(1));
    oracle.estimate(&g, &[0], 5).unwrap();
    oracle.estimate(&g, &[0, 1], 5).unwrap();
    assert_eq!(oracle.queries, vec![vec![0], vec![0, 1]]);
    assert_eq!(oracle.evaluations(), 2);
}
