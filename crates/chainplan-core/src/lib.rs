//! Chainplan Core -- production-chain resolution over a static game catalog.
//!
//! Given a target item and a desired output rate, the resolver works out
//! which recipes to run, in which buildings, how many machines each step
//! needs, and how much of every intermediate flows between steps.
//!
//! # Resolution
//!
//! [`resolver::solve`] walks the recipe graph depth-first from the target:
//!
//! 1. Items on the current path are cyclic and left unresolved.
//! 2. Raw materials (items with a resource entry) end the walk.
//! 3. Items already resolved in this call link to the existing step.
//! 4. Otherwise the first eligible recipe and its first building are picked,
//!    the step is sized, and each ingredient is resolved in turn.
//!
//! ```rust,ignore
//! let catalog = chainplan_data::load_catalog(Path::new("data.json"))?;
//! let plate = catalog.item_id("Desc_IronPlate_C").unwrap();
//! let plan = solve(ProductionTarget::new(plate, 20.0), &catalog)?;
//! println!("{} machines", plan.root().building_count);
//! ```
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable items, recipes, buildings and resources.
//! - [`plan::ProductionPlan`] -- Arena of [`plan::RecipeNode`] steps forming a DAG.
//! - [`plan::Producer`] -- Per-input outcome: a shared step or an
//!   [`plan::Unresolved`] reason.
//! - [`config::SolverConfig`] -- Demand policy and speed handling.
//! - [`requirements`] -- Raw-material and machine totals.
//! - [`flow`] -- Flattening into diagram nodes and edges.

pub mod catalog;
pub mod config;
pub mod flow;
pub mod id;
pub mod plan;
pub mod rate;
pub mod requirements;
pub mod resolver;
pub mod select;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use catalog::{Catalog, CatalogBuilder};
pub use config::{DemandPolicy, SolverConfig};
pub use plan::{ProductionPlan, ProductionTarget};
pub use resolver::{SolveError, solve, solve_with};
