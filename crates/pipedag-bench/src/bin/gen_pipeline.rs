//! Writes a generated pipeline request as JSON to stdout.
//!
//! Handy for feeding the `pipedag` CLI by hand:
//! `gen_pipeline large --seed 7 --cyclic | pipedag validate -`.

use std::error::Error;
use std::io::{BufWriter, Write};

use clap::{Parser, ValueEnum};
use pipedag_bench::{SizeTier, generate_pipeline};

/// Size tier names accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Tier {
    #[value(alias = "s")]
    Small,
    #[value(alias = "m")]
    Medium,
    #[value(alias = "l")]
    Large,
    #[value(alias = "xl")]
    Xlarge,
}

impl From<Tier> for SizeTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Small => SizeTier::Small,
            Tier::Medium => SizeTier::Medium,
            Tier::Large => SizeTier::Large,
            Tier::Xlarge => SizeTier::XLarge,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gen_pipeline", about = "Generate a staged pipeline request as JSON")]
struct Args {
    /// Size tier of the generated graph.
    #[arg(value_enum, default_value_t = Tier::Medium)]
    tier: Tier,

    /// Seed for the random number generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Add back-edges so the graph is guaranteed to contain a cycle.
    #[arg(long)]
    cyclic: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let tier = SizeTier::from(args.tier);

    let mut config = tier.config(args.seed);
    config.inject_cycles = args.cyclic;
    let request = generate_pipeline(&config);
    eprintln!(
        "Generated {} tier (seed {}): {} nodes, {} edges",
        tier.label(),
        args.seed,
        request.nodes.len(),
        request.edges.len()
    );

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    serde_json::to_writer(&mut writer, &request)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
