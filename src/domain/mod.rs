pub mod celf;
pub mod error;
pub mod estimator;
pub mod graph;
pub mod greedy;
pub mod model;
pub mod ports;
pub mod result;
pub mod simulator;
