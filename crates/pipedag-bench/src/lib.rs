//! Pipeline graph generator and benchmark utilities for pipedag.
//!
//! This crate provides deterministic generation of staged pipeline requests
//! for benchmarking and property-based testing of `pipedag-core`.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, generate_pipeline};
