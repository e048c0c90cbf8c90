//! Shared catalog fixtures for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::catalog::*;
use crate::id::*;

// ===========================================================================
// Class names
// ===========================================================================

pub const IRON_ORE: &str = "Desc_OreIron_C";
pub const IRON_INGOT: &str = "Desc_IronIngot_C";
pub const IRON_PLATE: &str = "Desc_IronPlate_C";
pub const IRON_ROD: &str = "Desc_IronRod_C";
pub const SCREW: &str = "Desc_IronScrew_C";
pub const REINFORCED_PLATE: &str = "Desc_IronPlateReinforced_C";

pub const SMELTER: &str = "Desc_SmelterMk1_C";
pub const CONSTRUCTOR: &str = "Desc_ConstructorMk1_C";
pub const ASSEMBLER: &str = "Desc_AssemblerMk1_C";

// ===========================================================================
// Helpers
// ===========================================================================

/// Look up an item that the fixture is known to contain.
pub fn item(catalog: &Catalog, class_name: &str) -> ItemId {
    catalog
        .item_id(class_name)
        .unwrap_or_else(|| panic!("fixture item {class_name} missing"))
}

fn machine(class_name: &str, name: &str) -> Building {
    Building::new(class_name, name)
}

/// Items, buildings and the ore resource shared by the iron fixtures.
fn iron_basics(b: &mut CatalogBuilder) -> (ItemId, ItemId, ItemId) {
    let ore = b.register_item(Item::new(IRON_ORE, "Iron Ore"));
    let ingot = b.register_item(Item::new(IRON_INGOT, "Iron Ingot"));
    let plate = b.register_item(Item::new(IRON_PLATE, "Iron Plate"));
    b.register_building(machine(SMELTER, "Smelter"));
    b.register_building(machine(CONSTRUCTOR, "Constructor"));
    b.register_resource(ore, 60.0);

    b.register_recipe(
        Recipe::new("Recipe_IngotIron_C", "Iron Ingot", 2.0)
            .with_ingredient(ore, 1.0)
            .with_product(ingot, 1.0)
            .with_building(SMELTER),
    );
    b.register_recipe(
        Recipe::new("Recipe_IronPlate_C", "Iron Plate", 6.0)
            .with_ingredient(ingot, 3.0)
            .with_product(plate, 2.0)
            .with_building(CONSTRUCTOR),
    );
    (ore, ingot, plate)
}

// ===========================================================================
// Fixtures
// ===========================================================================

/// Iron Ore (raw) -> Iron Ingot (1:1, 2 s, Smelter) -> Iron Plate (3:2, 6 s, Constructor).
pub fn iron_plate_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    iron_basics(&mut b);
    b
}

pub fn iron_plate_catalog() -> Catalog {
    iron_plate_builder()
        .build()
        .expect("iron plate fixture is valid")
}

/// Reinforced Iron Plate: 6 plates + 12 screws per 12 s cycle in an Assembler.
///
/// Screws come from rods, rods from ingots, so Iron Ingot is needed by both
/// the plate branch and the screw branch. An alternate screw recipe is
/// registered ahead of the standard one.
pub fn reinforced_plate_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    let (_, ingot, plate) = iron_basics(&mut b);
    let rod = b.register_item(Item::new(IRON_ROD, "Iron Rod"));
    let screw = b.register_item(Item::new(SCREW, "Screw"));
    let rip = b.register_item(Item::new(REINFORCED_PLATE, "Reinforced Iron Plate"));
    b.register_building(machine(ASSEMBLER, "Assembler"));

    b.register_recipe(
        Recipe::new("Recipe_IronRod_C", "Iron Rod", 4.0)
            .with_ingredient(ingot, 1.0)
            .with_product(rod, 1.0)
            .with_building(CONSTRUCTOR),
    );
    b.register_recipe(
        Recipe::new("Recipe_Alternate_Screw_C", "Alternate: Cast Screw", 24.0)
            .with_ingredient(ingot, 5.0)
            .with_product(screw, 20.0)
            .with_building(CONSTRUCTOR)
            .alternate(),
    );
    b.register_recipe(
        Recipe::new("Recipe_Screw_C", "Screw", 6.0)
            .with_ingredient(rod, 1.0)
            .with_product(screw, 4.0)
            .with_building(CONSTRUCTOR),
    );
    b.register_recipe(
        Recipe::new("Recipe_IronPlateReinforced_C", "Reinforced Iron Plate", 12.0)
            .with_ingredient(plate, 6.0)
            .with_ingredient(screw, 12.0)
            .with_product(rip, 1.0)
            .with_building(ASSEMBLER),
    );
    b
}

pub fn reinforced_plate_catalog() -> Catalog {
    reinforced_plate_builder()
        .build()
        .expect("reinforced plate fixture is valid")
}

/// Two items whose recipes consume each other: A <- B <- A.
pub fn two_cycle_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();
    let a = b.register_item(Item::new("Desc_A_C", "Alpha"));
    let bb = b.register_item(Item::new("Desc_B_C", "Beta"));
    b.register_building(machine("Desc_Machine_C", "Machine"));
    b.register_recipe(
        Recipe::new("Recipe_A_C", "Alpha", 1.0)
            .with_ingredient(bb, 1.0)
            .with_product(a, 1.0)
            .with_building("Desc_Machine_C"),
    );
    b.register_recipe(
        Recipe::new("Recipe_B_C", "Beta", 1.0)
            .with_ingredient(a, 1.0)
            .with_product(bb, 1.0)
            .with_building("Desc_Machine_C"),
    );
    b.build().expect("cycle fixture is valid")
}

/// A linear chain `depth` steps long over one raw material, each step
/// also pulling from a shared intermediate. Used by benchmarks.
pub fn deep_chain_catalog(depth: usize) -> Catalog {
    let mut b = CatalogBuilder::new();
    let raw = b.register_item(Item::new("Desc_Raw_C", "Raw"));
    let shared = b.register_item(Item::new("Desc_Shared_C", "Shared"));
    b.register_resource(raw, 60.0);
    b.register_building(machine("Desc_Machine_C", "Machine"));
    b.register_recipe(
        Recipe::new("Recipe_Shared_C", "Shared", 2.0)
            .with_ingredient(raw, 2.0)
            .with_product(shared, 1.0)
            .with_building("Desc_Machine_C"),
    );

    let mut previous = raw;
    for level in 0..depth {
        let next = b.register_item(Item::new(
            &format!("Desc_Part{level}_C"),
            &format!("Part {level}"),
        ));
        b.register_recipe(
            Recipe::new(&format!("Recipe_Part{level}_C"), &format!("Part {level}"), 4.0)
                .with_ingredient(previous, 2.0)
                .with_ingredient(shared, 1.0)
                .with_product(next, 1.0)
                .with_building("Desc_Machine_C"),
        );
        previous = next;
    }
    b.build().expect("deep chain fixture is valid")
}
