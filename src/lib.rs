//! influence-max library: Monte-Carlo influence estimation and greedy / CELF seed selection.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod server;
