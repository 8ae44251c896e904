//! Infrastructure implementations of the domain ports.

pub mod generator;
pub mod report;
