//! Strata CLI: the `strata` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            x,
            y,
            start_layer,
            seed,
            decide,
            json,
        } => commands::run::run(x, y, start_layer, seed, decide, json),
    }
}
