//! Pipeline graph generator.
//!
//! Produces [`PipelineRequest`] instances shaped like real data pipelines:
//! nodes arranged in stages, edges flowing from earlier stages to later
//! ones, with a sprinkling of undeclared endpoints and duplicate edges.

pub mod topology;

use pipedag_core::PipelineRequest;
use rand::SeedableRng;
use rand::rngs::StdRng;

use topology::build_pipeline;

/// Configuration for the pipeline generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of stages; edges only point from a stage to a later one.
    pub num_stages: usize,
    /// Nodes per stage.
    pub stage_width: usize,
    /// Average outgoing edges per node (excluding the last stage).
    pub fan_out: f64,
    /// Fraction of edges that skip one or more stages (0.0-1.0).
    pub skip_density: f64,
    /// Fraction of nodes left out of the declared `nodes` list (0.0-1.0).
    pub implicit_fraction: f64,
    /// Fraction of edges emitted twice (0.0-1.0).
    pub duplicate_fraction: f64,
    /// Whether to add back-edges so the graph is guaranteed to be cyclic.
    pub inject_cycles: bool,
    /// Use integer identifiers instead of `stage-node` strings.
    pub numeric_ids: bool,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~50 nodes, ~80 edges
    Small,
    /// ~500 nodes, ~1200 edges
    Medium,
    /// ~5000 nodes, ~12000 edges
    Large,
    /// ~50000 nodes, ~125000 edges
    XLarge,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        let (num_stages, stage_width, fan_out) = match self {
            SizeTier::Small => (5, 10, 2.0),
            SizeTier::Medium => (10, 50, 2.5),
            SizeTier::Large => (20, 250, 2.5),
            SizeTier::XLarge => (40, 1250, 2.5),
        };
        GeneratorConfig {
            seed,
            num_stages,
            stage_width,
            fan_out,
            skip_density: 0.1,
            implicit_fraction: 0.05,
            duplicate_fraction: 0.02,
            inject_cycles: false,
            numeric_ids: false,
        }
    }

    /// Label used in benchmark ids.
    pub fn label(self) -> &'static str {
        match self {
            SizeTier::Small => "S",
            SizeTier::Medium => "M",
            SizeTier::Large => "L",
            SizeTier::XLarge => "XL",
        }
    }

    /// Parses a label produced by [`SizeTier::label`], case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "S" | "SMALL" => Some(SizeTier::Small),
            "M" | "MEDIUM" => Some(SizeTier::Medium),
            "L" | "LARGE" => Some(SizeTier::Large),
            "XL" | "XLARGE" => Some(SizeTier::XLarge),
            _ => None,
        }
    }
}

/// Generates a pipeline request from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_pipeline(config: &GeneratorConfig) -> PipelineRequest {
    let mut rng = StdRng::seed_from_u64(config.seed);
    build_pipeline(config, &mut rng)
}
