//! Loading pipeline: reads a catalog document, resolves cross-references and
//! builds an immutable [`Catalog`].
//!
//! Format is detected from the file extension (RON/JSON/TOML). Collections
//! are registered in document order, so the first recipe listed for an item
//! is the first candidate the selector sees.

use crate::schema::*;
use chainplan_core::catalog::{
    Building, BuildingMetadata, Catalog, CatalogBuilder, CatalogError, Item, Recipe, RecipeEntry,
};
use chainplan_core::config::SolverConfig;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A key appears twice in the same collection.
    #[error("duplicate {kind} key '{name}' in {file}")]
    DuplicateName {
        file: PathBuf,
        kind: &'static str,
        name: String,
    },

    /// A collection key disagrees with the entry's own class name.
    #[error("{kind} key '{key}' does not match className '{class_name}' in {file}")]
    KeyMismatch {
        file: PathBuf,
        kind: &'static str,
        key: String,
        class_name: String,
    },

    /// An ingredient or product amount is negative or not a number.
    #[error("invalid amount {amount} for '{item}' in recipe '{recipe}' in {file}")]
    InvalidAmount {
        file: PathBuf,
        recipe: String,
        item: String,
        amount: f64,
    },

    /// The assembled catalog failed validation.
    #[error("invalid catalog in {file}: {source}")]
    Catalog {
        file: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Detect the format of a file based on its extension.
    pub fn detect(path: &Path) -> Result<Format, DataLoadError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Ok(Format::Ron),
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            _ => Err(DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            }),
        }
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = Format::detect(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Public entry points
// ===========================================================================

/// Load a catalog document from disk.
pub fn load_catalog(path: &Path) -> Result<Catalog, DataLoadError> {
    let data: CatalogData = deserialize_file(path)?;
    build_catalog(data, path)
}

/// Load a catalog document held in memory.
pub fn load_catalog_str(content: &str, format: Format) -> Result<Catalog, DataLoadError> {
    let file = Path::new("<memory>");
    let data: CatalogData = deserialize_str(content, format, file)?;
    build_catalog(data, file)
}

/// Load a [`SolverConfig`]. Missing fields take their defaults.
pub fn load_solver_config(path: &Path) -> Result<SolverConfig, DataLoadError> {
    deserialize_file(path)
}

// ===========================================================================
// Catalog assembly
// ===========================================================================

fn build_catalog(data: CatalogData, file: &Path) -> Result<Catalog, DataLoadError> {
    check_keys(&data.items, "item", file, |i| &i.class_name)?;
    check_keys(&data.buildings, "building", file, |b| &b.class_name)?;
    check_keys(&data.recipes, "recipe", file, |r| &r.class_name)?;
    check_unique(&data.resources, "resource", file)?;

    let mut builder = CatalogBuilder::new();

    for (_, item) in data.items.0 {
        builder.register_item(convert_item(item));
    }

    for (_, building) in data.buildings.0 {
        builder.register_building(convert_building(building));
    }

    for (_, recipe) in data.recipes.0 {
        let recipe = convert_recipe(recipe, &builder, file)?;
        builder.register_recipe(recipe);
    }

    for (_, resource) in data.resources.0 {
        let item = resolve_item(&builder, &resource.item, file)?;
        builder.register_resource(item, resource.speed);
    }

    let catalog = builder.build().map_err(|source| DataLoadError::Catalog {
        file: file.to_path_buf(),
        source,
    })?;

    log_missing_buildings(&catalog);
    tracing::debug!(
        file = %file.display(),
        items = catalog.item_count(),
        recipes = catalog.recipe_count(),
        buildings = catalog.building_count(),
        resources = catalog.resources().len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Every key must be unique and equal to the entry's class name.
fn check_keys<T>(
    entries: &Keyed<T>,
    kind: &'static str,
    file: &Path,
    class_name: impl Fn(&T) -> &String,
) -> Result<(), DataLoadError> {
    check_unique(entries, kind, file)?;
    for (key, entry) in entries.iter() {
        let class_name = class_name(entry);
        if key != class_name {
            return Err(DataLoadError::KeyMismatch {
                file: file.to_path_buf(),
                kind,
                key: key.to_string(),
                class_name: class_name.clone(),
            });
        }
    }
    Ok(())
}

fn check_unique<T>(
    entries: &Keyed<T>,
    kind: &'static str,
    file: &Path,
) -> Result<(), DataLoadError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (key, _) in entries.iter() {
        if !seen.insert(key) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                kind,
                name: key.to_string(),
            });
        }
    }
    Ok(())
}

fn resolve_item(
    builder: &CatalogBuilder,
    name: &str,
    file: &Path,
) -> Result<chainplan_core::id::ItemId, DataLoadError> {
    builder.item_id(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind: "item",
    })
}

fn convert_item(data: ItemData) -> Item {
    Item {
        class_name: data.class_name,
        slug: data.slug,
        name: data.name,
        description: data.description,
        sink_points: data.sink_points,
        stack_size: data.stack_size,
        energy_value: data.energy_value,
        liquid: data.liquid,
        radioactive_decay: data.radioactive_decay,
    }
}

fn convert_building(data: BuildingData) -> Building {
    Building {
        class_name: data.class_name,
        name: data.name,
        slug: data.slug,
        description: data.description,
        metadata: BuildingMetadata {
            power_consumption: data.metadata.power_consumption,
            power_consumption_exponent: data.metadata.power_consumption_exponent,
            manufacturing_speed: data.metadata.manufacturing_speed,
        },
    }
}

fn convert_recipe(
    data: RecipeData,
    builder: &CatalogBuilder,
    file: &Path,
) -> Result<Recipe, DataLoadError> {
    let entries = |lines: &[RecipeEntryData]| -> Result<Vec<RecipeEntry>, DataLoadError> {
        lines
            .iter()
            .map(|line| {
                if line.amount.is_nan() || line.amount < 0.0 {
                    return Err(DataLoadError::InvalidAmount {
                        file: file.to_path_buf(),
                        recipe: data.class_name.clone(),
                        item: line.item.clone(),
                        amount: line.amount,
                    });
                }
                Ok(RecipeEntry {
                    item: resolve_item(builder, &line.item, file)?,
                    amount: line.amount,
                })
            })
            .collect()
    };
    let ingredients = entries(&data.ingredients)?;
    let products = entries(&data.products)?;

    Ok(Recipe {
        class_name: data.class_name,
        slug: data.slug,
        name: data.name,
        ingredients,
        products,
        alternate: data.alternate,
        time: data.time,
        in_hand: data.in_hand,
        for_building: data.for_building,
        in_workshop: data.in_workshop,
        produced_in: data.produced_in,
        is_variable_power: data.is_variable_power,
        min_power: data.min_power,
        max_power: data.max_power,
    })
}

/// Recipes naming an unknown first building still load; the resolver reports
/// them as unresolved when selected.
fn log_missing_buildings(catalog: &Catalog) {
    for (_, recipe) in catalog.recipes() {
        if let Some(first) = recipe.produced_in.first() {
            if catalog.building_id(first).is_none() {
                tracing::debug!(
                    recipe = %recipe.class_name,
                    building = %first,
                    "recipe names a building missing from the catalog"
                );
            }
        }
    }
}
