pub mod loader;
pub mod schema;

pub use loader::{
    DataLoadError, Format, load_catalog, load_catalog_str, load_solver_config,
};
