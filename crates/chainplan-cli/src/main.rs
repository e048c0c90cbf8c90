//! Chainplan CLI: the `chainplan` command.

mod cli;
mod commands;
mod report;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            data,
            item,
            rate,
            config,
            aggregate_demand,
            json,
        } => commands::solve::run(commands::solve::Args {
            data,
            item,
            rate,
            config,
            aggregate_demand,
            json,
        }),

        Commands::Recipes { data, item } => commands::recipes::run(data, item),
    }
}
