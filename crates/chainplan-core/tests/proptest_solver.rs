//! Property-based tests for the production-chain resolver.
//!
//! Generates random catalogs (including self-referential ones) and checks
//! that resolution terminates, shares steps, and scales linearly.

use chainplan_core::catalog::*;
use chainplan_core::id::*;
use chainplan_core::plan::{Producer, ProductionTarget, Unresolved};
use chainplan_core::resolver::solve;
use chainplan_core::test_utils::*;
use proptest::prelude::*;
use std::collections::HashSet;

// ===========================================================================
// Generators
// ===========================================================================

/// Shape of one generated recipe: product index, ingredient indices and amounts.
#[derive(Debug, Clone)]
struct RecipeShape {
    product: usize,
    yield_amount: u32,
    time: u32,
    ingredients: Vec<(usize, u32)>,
    alternate: bool,
}

#[derive(Debug, Clone)]
struct CatalogShape {
    item_count: usize,
    raw: Vec<bool>,
    recipes: Vec<RecipeShape>,
}

fn arb_catalog_shape(max_items: usize) -> impl Strategy<Value = CatalogShape> {
    (2..=max_items).prop_flat_map(|n| {
        let recipe = (
            0..n,
            1..5u32,
            1..30u32,
            proptest::collection::vec((0..n, 1..6u32), 0..4),
            any::<bool>(),
        )
            .prop_map(|(product, yield_amount, time, ingredients, alternate)| {
                RecipeShape {
                    product,
                    yield_amount,
                    time,
                    ingredients,
                    alternate,
                }
            });
        (
            Just(n),
            proptest::collection::vec(proptest::bool::weighted(0.2), n),
            proptest::collection::vec(recipe, 0..(n * 2)),
        )
            .prop_map(|(item_count, raw, recipes)| CatalogShape {
                item_count,
                raw,
                recipes,
            })
    })
}

fn build(shape: &CatalogShape) -> (Catalog, Vec<ItemId>) {
    let mut b = CatalogBuilder::new();
    let items: Vec<ItemId> = (0..shape.item_count)
        .map(|i| b.register_item(Item::new(&format!("Desc_I{i}_C"), &format!("Item {i}"))))
        .collect();
    b.register_building(Building::new("Desc_Machine_C", "Machine"));
    for (i, &raw) in shape.raw.iter().enumerate() {
        if raw {
            b.register_resource(items[i], 60.0);
        }
    }
    for (r, recipe) in shape.recipes.iter().enumerate() {
        let mut def = Recipe::new(
            &format!("Recipe_{r}_C"),
            &format!("Recipe {r}"),
            recipe.time as f64,
        )
        .with_product(items[recipe.product], recipe.yield_amount as f64)
        .with_building("Desc_Machine_C");
        for &(ingredient, amount) in &recipe.ingredients {
            def = def.with_ingredient(items[ingredient], amount as f64);
        }
        def.alternate = recipe.alternate;
        b.register_recipe(def);
    }
    (b.build().unwrap(), items)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every solve terminates and holds at most one step per item.
    #[test]
    fn one_step_per_item(shape in arb_catalog_shape(8), pick in 0..8usize) {
        let (catalog, items) = build(&shape);
        let target = items[pick % items.len()];
        if let Ok(plan) = solve(ProductionTarget::new(target, 10.0), &catalog) {
            let mut seen = HashSet::new();
            for (_, node) in plan.nodes() {
                prop_assert!(seen.insert(node.item), "two steps for {:?}", node.item);
                prop_assert_eq!(
                    plan.node_for_item(node.item).map(|id| plan[id].item),
                    Some(node.item)
                );
            }
            prop_assert!(plan.len() <= items.len());
        }
    }

    /// Every resolved link points at a step of the same plan producing that item.
    #[test]
    fn links_point_at_matching_steps(shape in arb_catalog_shape(8), pick in 0..8usize) {
        let (catalog, items) = build(&shape);
        let target = items[pick % items.len()];
        if let Ok(plan) = solve(ProductionTarget::new(target, 10.0), &catalog) {
            for (_, node) in plan.nodes() {
                for input in &node.inputs {
                    match &input.producer {
                        Producer::Resolved(id) => {
                            let producer = plan.node(*id);
                            prop_assert!(producer.is_some());
                            prop_assert_eq!(producer.map(|p| p.item), Some(input.item));
                        }
                        Producer::Unresolved(Unresolved::RawMaterial) => {
                            prop_assert!(catalog.is_raw_material(input.item));
                        }
                        Producer::Unresolved(_) => {}
                    }
                }
            }
            // Consumers-first order lists each step once.
            prop_assert_eq!(plan.topological_order().len(), plan.len());
        }
    }

    /// Doubling the target doubles every machine count and rate.
    #[test]
    fn rates_scale_linearly(
        shape in arb_catalog_shape(8),
        pick in 0..8usize,
        amount in 1..1000u32,
    ) {
        let (catalog, items) = build(&shape);
        let target = items[pick % items.len()];
        let amount = amount as f64;
        let single = solve(ProductionTarget::new(target, amount), &catalog);
        let double = solve(ProductionTarget::new(target, amount * 2.0), &catalog);
        match (single, double) {
            (Ok(single), Ok(double)) => {
                prop_assert_eq!(single.len(), double.len());
                for (_, node) in single.nodes() {
                    let other = &double[double.node_for_item(node.item).unwrap()];
                    prop_assert_eq!(other.building_count, node.building_count * 2.0);
                    for (a, b) in node.inputs.iter().zip(&other.inputs) {
                        prop_assert_eq!(b.rate_per_minute, a.rate_per_minute * 2.0);
                        prop_assert_eq!(a.producer.node().is_some(), b.producer.node().is_some());
                    }
                }
            }
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(
                false,
                "solve outcome changed with amount: {:?} vs {:?}",
                a.is_ok(),
                b.is_ok()
            ),
        }
    }

    /// The worked iron plate example holds for any positive rate.
    #[test]
    fn iron_plate_ratios(amount in 1..10_000u32) {
        let catalog = iron_plate_catalog();
        let amount = amount as f64;
        let plate = ProductionTarget::new(item(&catalog, IRON_PLATE), amount);
        let plan = solve(plate, &catalog).unwrap();
        let ingots = &plan.root().inputs[0];
        prop_assert_eq!(ingots.rate_per_minute, amount / 2.0 * 3.0);
        prop_assert_eq!(plan.root().building_count, amount / 2.0 / 10.0);
    }

    /// Raw materials never resolve as a root, whatever the amount.
    #[test]
    fn raw_root_always_fails(amount in 0..10_000u32) {
        let catalog = iron_plate_catalog();
        let err = solve(ProductionTarget::new(item(&catalog, IRON_ORE), amount as f64), &catalog)
            .unwrap_err();
        prop_assert!(err.to_string().contains("production chain"));
    }
}
