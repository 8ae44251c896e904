//! Mock oracles for integration tests.
#![allow(dead_code)]

use influence_max::domain::error::{ImError, ImResult};
use influence_max::domain::graph::{InfluenceGraph, NodeId};
use influence_max::domain::ports::SpreadOracle;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

/// Deterministic, monotone, submodular oracle: spread(S) = |union of item sets|.
pub struct CoverageOracle {
    covers: Vec<Vec<u32>>,
    evaluations: u64,
}

impl CoverageOracle {
    pub fn new(covers: Vec<Vec<u32>>) -> Self {
        Self {
            covers,
            evaluations: 0,
        }
    }

    /// `nodes` random item sets over a universe of `items`.
    pub fn random(nodes: usize, items: u32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let covers = (0..nodes)
            .map(|_| {
                let size = rng.random_range(1..=6);
                (0..size).map(|_| rng.random_range(0..items)).collect()
            })
            .collect();
        Self::new(covers)
    }
}

impl SpreadOracle for CoverageOracle {
    fn estimate(
        &mut self,
        graph: &InfluenceGraph,
        seeds: &[NodeId],
        num_simulations: usize,
    ) -> ImResult<f64> {
        if num_simulations == 0 {
            return Err(ImError::invalid("num_simulations must be positive"));
        }
        graph.require_sealed()?;
        self.evaluations += 1;
        let items: BTreeSet<u32> = seeds
            .iter()
            .flat_map(|&s| self.covers[s as usize].iter().copied())
            .collect();
        Ok(items.len() as f64)
    }

    fn evaluations(&self) -> u64 {
        self.evaluations
    }

    fn reset_evaluations(&mut self) {
        self.evaluations = 0;
    }
}

/// Wraps an oracle and records every queried seed set.
pub struct RecordingOracle<O> {
    pub inner: O,
    pub queries: Vec<Vec<NodeId>>,
}

impl<O> RecordingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            queries: Vec::new(),
        }
    }
}

impl<O: SpreadOracle> SpreadOracle for RecordingOracle<O> {
    fn estimate(
        &mut self,
        graph: &InfluenceGraph,
        seeds: &[NodeId],
        num_simulations: usize,
    ) -> ImResult<f64> {
        let spread = self.inner.estimate(graph, seeds, num_simulations)?;
        self.queries.push(seeds.to_vec());
        Ok(spread)
    }

    fn evaluations(&self) -> u64 {
        self.inner.evaluations()
    }

    fn reset_evaluations(&mut self) {
        self.inner.reset_evaluations();
    }
}
