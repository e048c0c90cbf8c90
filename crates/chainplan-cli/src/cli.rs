use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "chainplan",
    about = "Chainplan: resolve production chains from a game-data catalog",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the production chain for an item at a target rate
    Solve {
        /// Catalog document (.json, .ron or .toml)
        #[arg(long)]
        data: PathBuf,

        /// Target item: class name, slug or display name
        #[arg(long)]
        item: String,

        /// Target output in units per minute
        #[arg(long)]
        rate: f64,

        /// Solver configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Size shared steps for the total demand of all their consumers
        #[arg(long)]
        aggregate_demand: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the recipes eligible to produce an item, in selection order
    Recipes {
        /// Catalog document (.json, .ron or .toml)
        #[arg(long)]
        data: PathBuf,

        /// Item: class name, slug or display name
        #[arg(long)]
        item: String,
    },
}
