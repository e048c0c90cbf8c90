//! Serde structs for catalog documents.
//!
//! A catalog document holds four keyed collections: `items`, `recipes`,
//! `buildings` and `resources`. Keys are class names (resources are keyed
//! freely). Field names follow the upstream game-data export, in camelCase.
//! Collections keep their document order, which becomes catalog order.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

// ===========================================================================
// Ordered keyed collections
// ===========================================================================

/// A map deserialized into a list of `(key, value)` pairs in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T>(pub Vec<(String, T)>);

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Keyed<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct KeyedVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedVisitor<T> {
    type Value = Keyed<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map keyed by class name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, T>()? {
            entries.push((key, value));
        }
        Ok(Keyed(entries))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Keyed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }
}

// ===========================================================================
// Document
// ===========================================================================

/// Top-level catalog document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Keyed<ItemData>,
    #[serde(default)]
    pub recipes: Keyed<RecipeData>,
    #[serde(default)]
    pub buildings: Keyed<BuildingData>,
    #[serde(default)]
    pub resources: Keyed<ResourceData>,
}

/// An item definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub class_name: String,
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sink_points: f64,
    #[serde(default = "default_stack_size")]
    pub stack_size: u32,
    #[serde(default)]
    pub energy_value: f64,
    /// The upstream export spells this `radioctiveDecay`.
    #[serde(default, alias = "radioctiveDecay")]
    pub radioactive_decay: Option<bool>,
    #[serde(default)]
    pub liquid: bool,
}

fn default_stack_size() -> u32 {
    100
}

/// An ingredient or product line.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeEntryData {
    /// Item class name.
    pub item: String,
    pub amount: f64,
}

/// A recipe definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    pub class_name: String,
    #[serde(default)]
    pub slug: String,
    pub name: String,
    pub ingredients: Vec<RecipeEntryData>,
    pub products: Vec<RecipeEntryData>,
    #[serde(default)]
    pub alternate: bool,
    /// Cycle time in seconds.
    pub time: f64,
    #[serde(default)]
    pub in_hand: bool,
    #[serde(default)]
    pub for_building: bool,
    #[serde(default)]
    pub in_workshop: bool,
    /// Building class names.
    pub produced_in: Vec<String>,
    #[serde(default)]
    pub is_variable_power: bool,
    #[serde(default)]
    pub min_power: f64,
    #[serde(default)]
    pub max_power: f64,
}

/// Building power and speed figures.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingMetadataData {
    #[serde(default)]
    pub power_consumption: f64,
    #[serde(default = "default_one")]
    pub power_consumption_exponent: f64,
    #[serde(default = "default_one")]
    pub manufacturing_speed: f64,
}

fn default_one() -> f64 {
    1.0
}

impl Default for BuildingMetadataData {
    fn default() -> Self {
        Self {
            power_consumption: 0.0,
            power_consumption_exponent: default_one(),
            manufacturing_speed: default_one(),
        }
    }
}

/// A building definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingData {
    pub class_name: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: BuildingMetadataData,
}

/// An extractable resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceData {
    /// Item class name.
    pub item: String,
    /// Extraction speed.
    #[serde(default)]
    pub speed: f64,
}
