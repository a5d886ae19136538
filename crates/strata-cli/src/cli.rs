use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: execution tunnelling over a vertical lattice guide",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tunnel one (x, y) service request through the layer chain
    Run {
        /// First service argument
        #[arg(default_value_t = 2)]
        x: i64,

        /// Second service argument
        #[arg(default_value_t = 3)]
        y: i64,

        /// Layer to start tunnelling from (0-3)
        #[arg(long, default_value_t = 3)]
        start_layer: usize,

        /// Seed for the biased decision oracle (wall clock when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Force every verdict to a fixed lattice direction
        /// (error, neutral, up, down, independent, lub, glb, set)
        #[arg(long)]
        decide: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
