use chainplan_core::catalog::Catalog;
use chainplan_core::config::SolverConfig;
use chainplan_core::id::ItemId;
use std::path::Path;

pub fn load_catalog_or_exit(path: &Path) -> Catalog {
    chainplan_data::load_catalog(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    })
}

pub fn load_config_or_exit(path: Option<&Path>) -> SolverConfig {
    let Some(path) = path else {
        return SolverConfig::default();
    };
    chainplan_data::load_solver_config(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load {}: {e}", path.display());
        std::process::exit(1);
    })
}

pub fn find_item_or_exit(catalog: &Catalog, query: &str) -> ItemId {
    catalog.find_item(query).unwrap_or_else(|| {
        eprintln!("error: item `{query}` not found; use a class name, slug or name");
        std::process::exit(1);
    })
}

/// Machine counts and rates are fractional; two decimals is enough to read.
pub fn fmt_rate(value: f64) -> String {
    format!("{value:.2}")
}
