use crate::report::{SolveReport, render_text};
use crate::support::{find_item_or_exit, load_catalog_or_exit, load_config_or_exit};
use chainplan_core::config::DemandPolicy;
use chainplan_core::plan::ProductionTarget;
use chainplan_core::resolver::solve_with;
use std::path::PathBuf;

pub struct Args {
    pub data: PathBuf,
    pub item: String,
    pub rate: f64,
    pub config: Option<PathBuf>,
    pub aggregate_demand: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let catalog = load_catalog_or_exit(&args.data);
    let mut config = load_config_or_exit(args.config.as_deref());
    if args.aggregate_demand {
        config.demand = DemandPolicy::Aggregate;
    }
    let item = find_item_or_exit(&catalog, &args.item);

    let result = solve_with(ProductionTarget::new(item, args.rate), &catalog, &config);
    let report = SolveReport::new(&result, &catalog);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        for line in render_text(&report, args.rate) {
            println!("{line}");
        }
    }

    if !report.success {
        std::process::exit(1);
    }
}
