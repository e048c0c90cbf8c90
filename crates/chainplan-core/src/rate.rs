//! Rate arithmetic: per-minute demand to machine counts and ingredient rates.
//!
//! Worked example: 20 Iron Plate/min from a recipe yielding 2 plates per
//! 6-second cycle needs 10 cycles/min. One machine runs 60 / 6 = 10 cycles/min,
//! so 1 machine is needed, and its 3 ingots per cycle become 30 ingots/min.

use crate::catalog::{Building, Recipe};
use crate::config::SolverConfig;
use crate::id::ItemId;

/// Result of sizing one production step.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCalculation {
    pub cycles_per_minute: f64,
    /// Fractional; machines are assumed to be underclockable.
    pub building_count: f64,
    /// Per-minute demand for each ingredient, in recipe order.
    pub ingredient_rates: Vec<(ItemId, f64)>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("recipe {recipe} does not produce {item:?}")]
    ProductMissing { recipe: String, item: ItemId },
    #[error("degenerate data in recipe {recipe}: {detail}")]
    Degenerate { recipe: String, detail: String },
}

/// Cycles one machine completes per minute.
pub fn cycles_per_machine_per_minute(recipe: &Recipe) -> f64 {
    60.0 / recipe.time
}

/// Size a production step making `rate` units/min of `item`.
pub fn calculate(
    recipe: &Recipe,
    item: ItemId,
    rate: f64,
    building: &Building,
    config: &SolverConfig,
) -> Result<RateCalculation, RateError> {
    let product_yield = recipe
        .product_amount(item)
        .ok_or_else(|| RateError::ProductMissing {
            recipe: recipe.name.clone(),
            item,
        })?;
    let cycles_per_minute = rate / product_yield;
    calculate_cycles(recipe, cycles_per_minute, building, config)
}

/// Size a production step that must run `cycles_per_minute` cycles.
pub fn calculate_cycles(
    recipe: &Recipe,
    cycles_per_minute: f64,
    building: &Building,
    config: &SolverConfig,
) -> Result<RateCalculation, RateError> {
    let degenerate = |detail: String| RateError::Degenerate {
        recipe: recipe.name.clone(),
        detail,
    };

    if recipe.time.is_nan() || recipe.time <= 0.0 {
        return Err(degenerate(format!("cycle time {} is not positive", recipe.time)));
    }
    if !cycles_per_minute.is_finite() {
        return Err(degenerate(format!(
            "cycles per minute is {cycles_per_minute}"
        )));
    }

    let mut building_count = cycles_per_minute / cycles_per_machine_per_minute(recipe);
    if config.apply_manufacturing_speed {
        let speed = building.metadata.manufacturing_speed;
        if speed.is_nan() || speed <= 0.0 {
            return Err(degenerate(format!(
                "building {} has manufacturing speed {speed}",
                building.name
            )));
        }
        building_count /= speed;
    }

    let ingredient_rates = recipe
        .ingredients
        .iter()
        .map(|ingredient| (ingredient.item, cycles_per_minute * ingredient.amount))
        .collect();

    tracing::trace!(
        recipe = %recipe.name,
        cycles_per_minute,
        building_count,
        "sized production step"
    );

    Ok(RateCalculation {
        cycles_per_minute,
        building_count,
        ingredient_rates,
    })
}
