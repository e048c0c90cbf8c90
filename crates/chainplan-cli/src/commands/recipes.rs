use crate::support::{find_item_or_exit, fmt_rate, load_catalog_or_exit};
use chainplan_core::rate::cycles_per_machine_per_minute;
use chainplan_core::select::{find_building, find_recipe, recipe_candidates};
use std::path::PathBuf;

pub fn run(data: PathBuf, item: String) {
    let catalog = load_catalog_or_exit(&data);
    let item = find_item_or_exit(&catalog, &item);
    let selected = find_recipe(item, &catalog).map(|(id, _)| id);

    println!("Recipes for {}:", catalog.item_name(item));
    if selected.is_none() {
        println!("  (none)");
        return;
    }
    for (id, recipe) in recipe_candidates(item, &catalog) {
        let marker = if Some(id) == selected { "*" } else { " " };
        let building = match find_building(recipe, &catalog) {
            Some((_, building)) => building.name.clone(),
            None => format!(
                "{} (missing)",
                recipe.produced_in.first().map(String::as_str).unwrap_or("?")
            ),
        };
        let per_machine = recipe
            .product_amount(item)
            .map(|amount| amount * cycles_per_machine_per_minute(recipe))
            .unwrap_or(0.0);
        println!(
            "{marker} {}{}  {}/min per {building}",
            recipe.name,
            if recipe.alternate { " [alternate]" } else { "" },
            fmt_rate(per_machine),
        );
    }
}
