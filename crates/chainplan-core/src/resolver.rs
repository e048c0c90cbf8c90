//! The production-chain resolver.
//!
//! [`solve`] walks the recipe graph depth-first from the target item. Each
//! call owns a fresh session: an arena of steps, a memo from item to the step
//! already built for it, and the set of items on the current root-to-leaf
//! path. The memo makes every item resolve to at most one step per call; the
//! path set truncates cyclic recipe chains.
//!
//! Failures below the root never abort the walk. The affected input is kept
//! with an [`Unresolved`] reason and treated as externally supplied. Only a
//! root that cannot be produced fails the solve.

use crate::catalog::Catalog;
use crate::config::{DemandPolicy, SolverConfig};
use crate::id::*;
use crate::plan::*;
use crate::rate::{self, RateError};
use crate::select::{find_building, find_recipe, is_raw_material};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a solve produced no plan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("unknown item: {0:?}")]
    UnknownItem(ItemId),
    #[error("invalid target amount {amount} for {item}")]
    InvalidAmount { item: String, amount: f64 },
    #[error("{item} is a raw material and has no production chain")]
    RawMaterialAsRoot { item: String },
    #[error("could not find a production chain for {item}: {reason}")]
    NoProductionChain { item: String, reason: Unresolved },
    #[error("solver error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

type Resolution = Result<NodeId, Unresolved>;

/// Call-scoped resolution state. Never shared between solves.
struct Session<'a> {
    catalog: &'a Catalog,
    config: &'a SolverConfig,
    nodes: SlotMap<NodeId, RecipeNode>,
    memo: HashMap<ItemId, NodeId>,
    path: HashSet<ItemId>,
}

impl<'a> Session<'a> {
    fn new(catalog: &'a Catalog, config: &'a SolverConfig) -> Self {
        Self {
            catalog,
            config,
            nodes: SlotMap::with_key(),
            memo: HashMap::new(),
            path: HashSet::new(),
        }
    }

    /// Resolve the step producing `rate` units/min of `item`.
    ///
    /// The outer `Result` carries internal faults that abort the whole solve;
    /// the inner one is the per-input outcome.
    fn resolve(&mut self, item: ItemId, rate: f64) -> Result<Resolution, SolveError> {
        let catalog = self.catalog;

        if self.path.contains(&item) {
            tracing::warn!(item = %catalog.item_name(item), "circular dependency detected");
            return Ok(Err(Unresolved::Cycle));
        }

        if is_raw_material(item, catalog) {
            return Ok(Err(Unresolved::RawMaterial));
        }

        // A memoized step is reused as is; its rates stay those of the
        // first consumer until demand aggregation runs.
        if let Some(&existing) = self.memo.get(&item) {
            tracing::debug!(item = %catalog.item_name(item), "reusing production step");
            return Ok(Ok(existing));
        }

        let Some((recipe_id, recipe)) = find_recipe(item, catalog) else {
            tracing::warn!(item = %catalog.item_name(item), "no recipe found");
            return Ok(Err(Unresolved::NoRecipe));
        };

        let Some((building_id, building)) = find_building(recipe, catalog) else {
            let building = recipe.produced_in.first().cloned().unwrap_or_default();
            tracing::warn!(recipe = %recipe.name, %building, "no building found");
            return Ok(Err(Unresolved::NoBuilding { building }));
        };

        let calc = match rate::calculate(recipe, item, rate, building, self.config) {
            Ok(calc) => calc,
            Err(RateError::ProductMissing { .. }) => {
                tracing::warn!(
                    recipe = %recipe.name,
                    item = %catalog.item_name(item),
                    "recipe does not produce item"
                );
                return Ok(Err(Unresolved::ProductMismatch));
            }
            Err(err @ RateError::Degenerate { .. }) => {
                return Err(SolveError::Internal(err.to_string()));
            }
        };

        // Registered before recursing so later branches share this step.
        let id = self.nodes.insert(RecipeNode {
            item,
            recipe: recipe_id,
            building: building_id,
            rate_per_minute: rate,
            building_count: calc.building_count,
            cycles_per_minute: calc.cycles_per_minute,
            inputs: Vec::with_capacity(calc.ingredient_rates.len()),
        });
        self.memo.insert(item, id);

        self.path.insert(item);
        for (ingredient, ingredient_rate) in calc.ingredient_rates {
            let producer = match self.resolve(ingredient, ingredient_rate)? {
                Ok(node) => Producer::Resolved(node),
                Err(reason) => Producer::Unresolved(reason),
            };
            self.nodes[id].inputs.push(RequiredInput {
                item: ingredient,
                rate_per_minute: ingredient_rate,
                producer,
            });
        }
        self.path.remove(&item);

        Ok(Ok(id))
    }
}

// ---------------------------------------------------------------------------
// Demand aggregation
// ---------------------------------------------------------------------------

/// Recompute every step from the total demand of all inputs consuming it.
///
/// Visits steps consumers-first so each step's total is final before its
/// own inputs are rescaled.
fn aggregate_demand(
    nodes: &mut SlotMap<NodeId, RecipeNode>,
    root: NodeId,
    target_rate: f64,
    catalog: &Catalog,
    config: &SolverConfig,
) -> Result<(), SolveError> {
    let order = topological_order(nodes);
    let mut demand: SecondaryMap<NodeId, f64> = SecondaryMap::new();
    for id in nodes.keys() {
        demand.insert(id, 0.0);
    }
    demand[root] = target_rate;

    for id in order {
        let node = &mut nodes[id];
        let recipe = catalog
            .recipe(node.recipe)
            .ok_or_else(|| SolveError::Internal(format!("missing recipe {:?}", node.recipe)))?;
        let building = catalog.building(node.building).ok_or_else(|| {
            SolveError::Internal(format!("missing building {:?}", node.building))
        })?;

        let calc = rate::calculate(recipe, node.item, demand[id], building, config)
            .map_err(|err| SolveError::Internal(err.to_string()))?;

        node.rate_per_minute = demand[id];
        node.building_count = calc.building_count;
        node.cycles_per_minute = calc.cycles_per_minute;
        for (input, (_, rate)) in node.inputs.iter_mut().zip(calc.ingredient_rates) {
            input.rate_per_minute = rate;
            if let Some(producer) = input.producer.node() {
                demand[producer] += rate;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Resolve a production chain with the default [`SolverConfig`].
pub fn solve(target: ProductionTarget, catalog: &Catalog) -> Result<ProductionPlan, SolveError> {
    solve_with(target, catalog, &SolverConfig::default())
}

/// Resolve a production chain for `target`.
///
/// Fails when the target cannot be produced: unknown item, invalid amount,
/// a raw material, or no usable recipe/building for the root. Inputs deeper
/// in the chain that cannot be produced are reported on their edge instead.
pub fn solve_with(
    target: ProductionTarget,
    catalog: &Catalog,
    config: &SolverConfig,
) -> Result<ProductionPlan, SolveError> {
    let item = catalog
        .item(target.item)
        .ok_or(SolveError::UnknownItem(target.item))?;

    if !target.amount.is_finite() || target.amount < 0.0 {
        return Err(SolveError::InvalidAmount {
            item: item.name.clone(),
            amount: target.amount,
        });
    }

    if is_raw_material(target.item, catalog) {
        return Err(SolveError::RawMaterialAsRoot {
            item: item.name.clone(),
        });
    }

    let mut session = Session::new(catalog, config);
    let root = match session.resolve(target.item, target.amount)? {
        Ok(root) => root,
        Err(reason) => {
            return Err(SolveError::NoProductionChain {
                item: item.name.clone(),
                reason,
            });
        }
    };

    let Session { mut nodes, memo, .. } = session;
    if config.demand == DemandPolicy::Aggregate {
        aggregate_demand(&mut nodes, root, target.amount, catalog, config)?;
    }

    tracing::debug!(
        item = %item.name,
        amount = target.amount,
        steps = nodes.len(),
        "resolved production chain"
    );

    Ok(ProductionPlan::new(target, root, nodes, memo))
}

/// Solve several targets concurrently against one catalog.
///
/// Each solve owns its session, so no locking is involved.
#[cfg(feature = "parallel")]
pub fn solve_many(
    targets: &[ProductionTarget],
    catalog: &Catalog,
    config: &SolverConfig,
) -> Vec<Result<ProductionPlan, SolveError>> {
    use rayon::prelude::*;
    targets
        .par_iter()
        .map(|target| solve_with(*target, catalog, config))
        .collect()
}
