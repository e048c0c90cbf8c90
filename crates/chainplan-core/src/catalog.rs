use crate::id::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An item definition. Items are referenced everywhere by their class name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub class_name: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub sink_points: f64,
    pub stack_size: u32,
    pub energy_value: f64,
    pub liquid: bool,
    pub radioactive_decay: Option<bool>,
}

impl Item {
    /// Minimal item with neutral metadata. Mostly useful for tests and tools.
    pub fn new(class_name: &str, name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            slug: slugify(name),
            name: name.to_string(),
            description: String::new(),
            sink_points: 0.0,
            stack_size: 100,
            energy_value: 0.0,
            liquid: false,
            radioactive_decay: None,
        }
    }
}

/// An ingredient or product line of a recipe: `amount` units per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub item: ItemId,
    pub amount: f64,
}

/// A recipe definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub class_name: String,
    pub slug: String,
    pub name: String,
    pub ingredients: Vec<RecipeEntry>,
    pub products: Vec<RecipeEntry>,
    pub alternate: bool,
    /// Cycle time in seconds.
    pub time: f64,
    pub in_hand: bool,
    /// Building construction recipe; never automated.
    pub for_building: bool,
    /// Craft bench only; never automated.
    pub in_workshop: bool,
    /// Class names of the buildings able to run this recipe, in preference order.
    /// Kept as names because the first entry may not exist in the catalog.
    pub produced_in: Vec<String>,
    pub is_variable_power: bool,
    pub min_power: f64,
    pub max_power: f64,
}

impl Recipe {
    pub fn new(class_name: &str, name: &str, time: f64) -> Self {
        Self {
            class_name: class_name.to_string(),
            slug: slugify(name),
            name: name.to_string(),
            ingredients: Vec::new(),
            products: Vec::new(),
            alternate: false,
            time,
            in_hand: false,
            for_building: false,
            in_workshop: false,
            produced_in: Vec::new(),
            is_variable_power: false,
            min_power: 0.0,
            max_power: 0.0,
        }
    }

    pub fn with_ingredient(mut self, item: ItemId, amount: f64) -> Self {
        self.ingredients.push(RecipeEntry { item, amount });
        self
    }

    pub fn with_product(mut self, item: ItemId, amount: f64) -> Self {
        self.products.push(RecipeEntry { item, amount });
        self
    }

    pub fn with_building(mut self, building_class: &str) -> Self {
        self.produced_in.push(building_class.to_string());
        self
    }

    pub fn alternate(mut self) -> Self {
        self.alternate = true;
        self
    }

    /// Units of `item` produced per cycle, if this recipe produces it at all.
    pub fn product_amount(&self, item: ItemId) -> Option<f64> {
        self.products.iter().find(|p| p.item == item).map(|p| p.amount)
    }

    pub fn produces(&self, item: ItemId) -> bool {
        self.products.iter().any(|p| p.item == item)
    }
}

/// Power and speed characteristics of a building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingMetadata {
    pub power_consumption: f64,
    pub power_consumption_exponent: f64,
    pub manufacturing_speed: f64,
}

impl Default for BuildingMetadata {
    fn default() -> Self {
        Self {
            power_consumption: 0.0,
            power_consumption_exponent: 1.0,
            manufacturing_speed: 1.0,
        }
    }
}

/// A machine type able to run recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub class_name: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub metadata: BuildingMetadata,
}

impl Building {
    pub fn new(class_name: &str, name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            name: name.to_string(),
            slug: slugify(name),
            description: String::new(),
            metadata: BuildingMetadata::default(),
        }
    }
}

/// An extractable resource. Its presence marks `item` as a raw material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub item: ItemId,
    pub speed: f64,
}

fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
///
/// Entries keep their registration order; that order is the catalog order
/// used for deterministic recipe selection.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<Item>,
    item_index: HashMap<String, ItemId>,
    recipes: Vec<Recipe>,
    recipe_index: HashMap<String, RecipeId>,
    buildings: Vec<Building>,
    building_index: HashMap<String, BuildingId>,
    resources: Vec<Resource>,
    duplicates: Vec<(&'static str, String)>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item. Returns its ID.
    pub fn register_item(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        if self.item_index.insert(item.class_name.clone(), id).is_some() {
            self.duplicates.push(("item", item.class_name.clone()));
        }
        self.items.push(item);
        id
    }

    /// Register a recipe. Returns its ID.
    pub fn register_recipe(&mut self, recipe: Recipe) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        if self.recipe_index.insert(recipe.class_name.clone(), id).is_some() {
            self.duplicates.push(("recipe", recipe.class_name.clone()));
        }
        self.recipes.push(recipe);
        id
    }

    /// Register a building. Returns its ID.
    pub fn register_building(&mut self, building: Building) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32);
        if self
            .building_index
            .insert(building.class_name.clone(), id)
            .is_some()
        {
            self.duplicates.push(("building", building.class_name.clone()));
        }
        self.buildings.push(building);
        id
    }

    /// Register an extractable resource for `item`.
    pub fn register_resource(&mut self, item: ItemId, speed: f64) {
        self.resources.push(Resource { item, speed });
    }

    /// Lookup item ID by class name.
    pub fn item_id(&self, class_name: &str) -> Option<ItemId> {
        self.item_index.get(class_name).copied()
    }

    /// Mutate an already registered recipe by class name.
    pub fn mutate_recipe<F>(&mut self, class_name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut Recipe),
    {
        let id = self
            .recipe_index
            .get(class_name)
            .ok_or_else(|| CatalogError::NotFound(class_name.to_string()))?;
        f(&mut self.recipes[id.0 as usize]);
        Ok(())
    }

    /// Finalize and build the immutable catalog.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if let Some((kind, name)) = self.duplicates.into_iter().next() {
            return Err(CatalogError::DuplicateClassName { kind, name });
        }

        let item_count = self.items.len();
        for recipe in &self.recipes {
            for entry in recipe.ingredients.iter().chain(recipe.products.iter()) {
                if entry.item.0 as usize >= item_count {
                    return Err(CatalogError::InvalidItemRef(entry.item));
                }
            }
        }
        for resource in &self.resources {
            if resource.item.0 as usize >= item_count {
                return Err(CatalogError::InvalidItemRef(resource.item));
            }
        }

        let raw_materials = self.resources.iter().map(|r| r.item).collect();

        Ok(Catalog {
            items: self.items,
            item_index: self.item_index,
            recipes: self.recipes,
            recipe_index: self.recipe_index,
            buildings: self.buildings,
            building_index: self.building_index,
            resources: self.resources,
            raw_materials,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable catalog of items, recipes, buildings and resources.
/// Frozen after [`CatalogBuilder::build`]. Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<Item>,
    item_index: HashMap<String, ItemId>,
    recipes: Vec<Recipe>,
    recipe_index: HashMap<String, RecipeId>,
    buildings: Vec<Building>,
    building_index: HashMap<String, BuildingId>,
    resources: Vec<Resource>,
    raw_materials: HashSet<ItemId>,
}

impl Catalog {
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0 as usize)
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.0 as usize)
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id.0 as usize)
    }

    pub fn item_id(&self, class_name: &str) -> Option<ItemId> {
        self.item_index.get(class_name).copied()
    }

    pub fn recipe_id(&self, class_name: &str) -> Option<RecipeId> {
        self.recipe_index.get(class_name).copied()
    }

    pub fn building_id(&self, class_name: &str) -> Option<BuildingId> {
        self.building_index.get(class_name).copied()
    }

    /// Items in catalog order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (ItemId(i as u32), item))
    }

    /// Recipes in catalog order.
    pub fn recipes(&self) -> impl Iterator<Item = (RecipeId, &Recipe)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, recipe)| (RecipeId(i as u32), recipe))
    }

    /// Buildings in catalog order.
    pub fn buildings(&self) -> impl Iterator<Item = (BuildingId, &Building)> {
        self.buildings
            .iter()
            .enumerate()
            .map(|(i, building)| (BuildingId(i as u32), building))
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// True if some resource extracts `item`.
    pub fn is_raw_material(&self, item: ItemId) -> bool {
        self.raw_materials.contains(&item)
    }

    /// Find an item by class name, slug, or case-insensitive display name.
    pub fn find_item(&self, query: &str) -> Option<ItemId> {
        if let Some(id) = self.item_id(query) {
            return Some(id);
        }
        self.items()
            .find(|(_, item)| item.slug == query || item.name.eq_ignore_ascii_case(query))
            .map(|(id, _)| id)
    }

    /// Display name of an item, falling back to a debug form for unknown IDs.
    pub fn item_name(&self, id: ItemId) -> String {
        self.item(id)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| format!("{id:?}"))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemId),
    #[error("duplicate {kind} class name: {name}")]
    DuplicateClassName { kind: &'static str, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_builder() -> CatalogBuilder {
        let mut b = CatalogBuilder::new();
        let ore = b.register_item(Item::new("Desc_OreIron_C", "Iron Ore"));
        let ingot = b.register_item(Item::new("Desc_IronIngot_C", "Iron Ingot"));
        b.register_building(Building::new("Desc_SmelterMk1_C", "Smelter"));
        b.register_recipe(
            Recipe::new("Recipe_IngotIron_C", "Iron Ingot", 2.0)
                .with_ingredient(ore, 1.0)
                .with_product(ingot, 1.0)
                .with_building("Desc_SmelterMk1_C"),
        );
        b.register_resource(ore, 60.0);
        b
    }

    #[test]
    fn register_and_build() {
        let cat = setup_builder().build().unwrap();
        assert_eq!(cat.item_count(), 2);
        assert_eq!(cat.recipe_count(), 1);
        assert_eq!(cat.building_count(), 1);
        assert_eq!(cat.resources().len(), 1);
    }

    #[test]
    fn lookup_by_class_name() {
        let cat = setup_builder().build().unwrap();
        assert_eq!(cat.item_id("Desc_IronIngot_C"), Some(ItemId(1)));
        assert!(cat.item_id("Desc_Nope_C").is_none());
        assert!(cat.recipe_id("Recipe_IngotIron_C").is_some());
        assert!(cat.building_id("Desc_SmelterMk1_C").is_some());
    }

    #[test]
    fn find_item_by_slug_and_name() {
        let cat = setup_builder().build().unwrap();
        assert_eq!(cat.find_item("iron-ingot"), Some(ItemId(1)));
        assert_eq!(cat.find_item("iron ore"), Some(ItemId(0)));
        assert_eq!(cat.find_item("Desc_OreIron_C"), Some(ItemId(0)));
        assert_eq!(cat.find_item("copper"), None);
    }

    #[test]
    fn raw_material_index() {
        let cat = setup_builder().build().unwrap();
        assert!(cat.is_raw_material(ItemId(0)));
        assert!(!cat.is_raw_material(ItemId(1)));
        assert!(!cat.is_raw_material(ItemId(99)));
    }

    #[test]
    fn recipes_iterate_in_registration_order() {
        let mut b = setup_builder();
        let ingot = b.item_id("Desc_IronIngot_C").unwrap();
        b.register_recipe(
            Recipe::new("Recipe_Alternate_PureIronIngot_C", "Pure Iron Ingot", 12.0)
                .with_product(ingot, 13.0)
                .alternate(),
        );
        let cat = b.build().unwrap();
        let names: Vec<&str> = cat.recipes().map(|(_, r)| r.class_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Recipe_IngotIron_C", "Recipe_Alternate_PureIronIngot_C"]
        );
    }

    #[test]
    fn mutate_recipe() {
        let mut b = setup_builder();
        b.mutate_recipe("Recipe_IngotIron_C", |r| r.time = 4.0).unwrap();
        let cat = b.build().unwrap();
        let recipe = cat.recipe(cat.recipe_id("Recipe_IngotIron_C").unwrap()).unwrap();
        assert_eq!(recipe.time, 4.0);
    }

    #[test]
    fn mutate_nonexistent_fails() {
        let mut b = setup_builder();
        match b.mutate_recipe("Recipe_Nope_C", |_| {}) {
            Err(CatalogError::NotFound(name)) => assert_eq!(name, "Recipe_Nope_C"),
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_item_ref_in_recipe_fails() {
        let mut b = CatalogBuilder::new();
        b.register_recipe(Recipe::new("bad", "Bad", 1.0).with_ingredient(ItemId(999), 1.0));
        match b.build() {
            Err(CatalogError::InvalidItemRef(id)) => {
                assert_eq!(id, ItemId(999));
                let msg = format!("{}", CatalogError::InvalidItemRef(id));
                assert!(msg.contains("invalid item reference"), "got: {msg}");
            }
            other => panic!("expected InvalidItemRef, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_item_ref_in_resource_fails() {
        let mut b = CatalogBuilder::new();
        b.register_resource(ItemId(3), 60.0);
        assert!(matches!(b.build(), Err(CatalogError::InvalidItemRef(_))));
    }

    #[test]
    fn duplicate_class_name_fails() {
        let mut b = setup_builder();
        b.register_item(Item::new("Desc_OreIron_C", "Iron Ore Again"));
        match b.build() {
            Err(CatalogError::DuplicateClassName { kind, name }) => {
                assert_eq!(kind, "item");
                assert_eq!(name, "Desc_OreIron_C");
            }
            other => panic!("expected DuplicateClassName, got: {other:?}"),
        }
    }

    #[test]
    fn product_amount_lookup() {
        let cat = setup_builder().build().unwrap();
        let recipe = cat.recipe(RecipeId(0)).unwrap();
        assert_eq!(recipe.product_amount(ItemId(1)), Some(1.0));
        assert_eq!(recipe.product_amount(ItemId(0)), None);
        assert!(recipe.produces(ItemId(1)));
    }

    #[test]
    fn slugs_are_derived_from_names() {
        assert_eq!(Item::new("X", "Reinforced Iron Plate").slug, "reinforced-iron-plate");
    }

    #[test]
    fn empty_catalog_builds_successfully() {
        let cat = CatalogBuilder::new().build().unwrap();
        assert_eq!(cat.item_count(), 0);
        assert_eq!(cat.recipe_count(), 0);
        assert_eq!(cat.building_count(), 0);
    }

    #[test]
    fn catalog_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
