//! Raw-material classification and recipe/building selection.
//!
//! Selection is deterministic by catalog order: the first eligible
//! non-alternate recipe wins, falling back to the first eligible alternate.
//! No scoring of yield, power or byproducts takes place.

use crate::catalog::{Building, Catalog, Recipe};
use crate::id::{BuildingId, ItemId, RecipeId};

/// True if `item` is extracted by some resource and therefore never produced.
pub fn is_raw_material(item: ItemId, catalog: &Catalog) -> bool {
    catalog.is_raw_material(item)
}

/// True if a recipe can run unattended in a machine.
fn is_automatable(recipe: &Recipe) -> bool {
    !recipe.for_building && !recipe.in_workshop && !recipe.produced_in.is_empty()
}

/// All automatable recipes producing `item`, in catalog order.
pub fn recipe_candidates(
    item: ItemId,
    catalog: &Catalog,
) -> impl Iterator<Item = (RecipeId, &Recipe)> {
    catalog
        .recipes()
        .filter(move |(_, recipe)| recipe.produces(item) && is_automatable(recipe))
}

/// Pick the recipe used to produce `item`.
pub fn find_recipe(item: ItemId, catalog: &Catalog) -> Option<(RecipeId, &Recipe)> {
    let mut fallback = None;
    for (id, recipe) in recipe_candidates(item, catalog) {
        if !recipe.alternate {
            return Some((id, recipe));
        }
        if fallback.is_none() {
            fallback = Some((id, recipe));
        }
    }
    fallback
}

/// The building for the first class name in `recipe.produced_in`.
///
/// Returns `None` when that first building is missing from the catalog, even
/// if a later entry would resolve.
pub fn find_building<'a>(
    recipe: &Recipe,
    catalog: &'a Catalog,
) -> Option<(BuildingId, &'a Building)> {
    let class_name = recipe.produced_in.first()?;
    let id = catalog.building_id(class_name)?;
    catalog.building(id).map(|building| (id, building))
}
