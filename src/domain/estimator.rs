use crate::domain::error::{ImError, ImResult};
use crate::domain::graph::{InfluenceGraph, NodeId};
use crate::domain::ports::SpreadOracle;
use crate::domain::simulator::{DiffusionSimulator, resolve_seeds};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Monte-Carlo spread oracle.
///
/// Each trial draws from its own ChaCha stream derived from `(seed, call index, trial)`,
/// so a parallel run returns exactly what a sequential run with the same seed returns,
/// and consecutive calls are independent samples.
#[derive(Debug, Clone)]
pub struct MonteCarloEstimator {
    seed: u64,
    parallel: bool,
    simulator: DiffusionSimulator,
    /// Monotone call index; never reset so streams are not reused.
    calls: u64,
    evaluations: u64,
    simulations: u64,
}

impl MonteCarloEstimator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            parallel: false,
            simulator: DiffusionSimulator::new(),
            calls: 0,
            evaluations: 0,
            simulations: 0,
        }
    }

    /// Run the trials of one `estimate` call on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Total cascade simulations executed by this estimator.
    pub fn simulations_run(&self) -> u64 {
        self.simulations
    }
}

fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

fn trial_rng(seed: u64, call: u64, trial: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(mix64(seed ^ mix64(call)));
    rng.set_stream(trial);
    rng
}

impl SpreadOracle for MonteCarloEstimator {
    /// Sample mean of `|run_once(graph, seeds)|` over `num_simulations` trials.
    ///
    /// An empty seed set yields exactly 0.0 without simulating. The evaluation
    /// counter moves by one per call that passes validation.
    fn estimate(
        &mut self,
        graph: &InfluenceGraph,
        seeds: &[NodeId],
        num_simulations: usize,
    ) -> ImResult<f64> {
        if num_simulations == 0 {
            return Err(ImError::invalid("num_simulations must be positive"));
        }
        let model = graph.require_sealed()?;
        let seeds = resolve_seeds(graph, seeds)?;

        self.evaluations += 1;
        let call = self.calls;
        self.calls += 1;

        if seeds.is_empty() {
            return Ok(0.0);
        }

        let seed = self.seed;
        let simulator = self.simulator;
        let trials = num_simulations as u64;
        let run = |trial: u64| {
            let mut rng = trial_rng(seed, call, trial);
            simulator.activate(graph, model, &seeds, &mut rng).len()
        };

        let total: usize = if self.parallel {
            (0..trials).into_par_iter().map(run).sum()
        } else {
            (0..trials).map(run).sum()
        };

        self.simulations += trials;
        Ok(total as f64 / num_simulations as f64)
    }

    fn evaluations(&self) -> u64 {
        self.evaluations
    }

    fn reset_evaluations(&mut self) {
        self.evaluations = 0;
    }
}
