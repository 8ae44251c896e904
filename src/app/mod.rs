pub mod dto;
pub mod engine;
pub mod experiments;
