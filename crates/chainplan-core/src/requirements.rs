//! Totals over a resolved plan: external inputs by item, machines by building.
//!
//! Steps are visited consumers-first, so a shared step is counted once with
//! the summed demand of all the inputs pointing at it.

use crate::id::{BuildingId, ItemId, NodeId};
use crate::plan::{ProductionPlan, Producer, Unresolved};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Per-minute amounts the plan expects to receive from outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceRequirements {
    /// Raw materials to extract.
    pub raw: BTreeMap<ItemId, f64>,
    /// Inputs left without a producer for any other reason.
    pub unresolved: BTreeMap<ItemId, f64>,
}

impl ResourceRequirements {
    pub fn raw_rate(&self, item: ItemId) -> f64 {
        self.raw.get(&item).copied().unwrap_or(0.0)
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Sum the rate of every producer-less input, by item.
///
/// Rates reflect the demand of every consumer, whatever the demand policy
/// the plan was solved with. A step sized for its first consumer only has its
/// input rates scaled by total demand over the rate it was sized for.
pub fn resource_requirements(plan: &ProductionPlan) -> ResourceRequirements {
    let mut demand: HashMap<NodeId, f64> = HashMap::with_capacity(plan.len());
    demand.insert(plan.root_id(), plan.target().amount);

    let mut totals = ResourceRequirements::default();
    for id in plan.topological_order() {
        let node = &plan[id];
        let wanted = demand.get(&id).copied().unwrap_or(0.0);
        for input in &node.inputs {
            let rate = if node.rate_per_minute > 0.0 {
                input.rate_per_minute * wanted / node.rate_per_minute
            } else {
                0.0
            };
            let bucket = match &input.producer {
                Producer::Resolved(producer) => {
                    *demand.entry(*producer).or_insert(0.0) += rate;
                    continue;
                }
                Producer::Unresolved(Unresolved::RawMaterial) => &mut totals.raw,
                Producer::Unresolved(_) => &mut totals.unresolved,
            };
            *bucket.entry(input.item).or_insert(0.0) += rate;
        }
    }
    totals
}

/// Total fractional machine count per building.
pub fn building_totals(plan: &ProductionPlan) -> BTreeMap<BuildingId, f64> {
    let mut totals = BTreeMap::new();
    for (_, node) in plan.nodes() {
        *totals.entry(node.building).or_insert(0.0) += node.building_count;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DemandPolicy, SolverConfig};
    use crate::plan::ProductionTarget;
    use crate::resolver::{solve, solve_with};
    use crate::test_utils::*;

    #[test]
    fn iron_plate_needs_thirty_ore() {
        let catalog = iron_plate_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, IRON_PLATE), 20.0),
            &catalog,
        )
        .unwrap();
        let req = resource_requirements(&plan);
        assert_eq!(req.raw_rate(item(&catalog, IRON_ORE)), 30.0);
        assert_eq!(req.raw.len(), 1);
        assert!(req.is_fully_resolved());
    }

    #[test]
    fn shared_step_demand_summed_under_both_policies() {
        let catalog = reinforced_plate_catalog();
        let rip = ProductionTarget::new(item(&catalog, REINFORCED_PLATE), 5.0);

        // 45 ingots/min for plates plus 15 for rods.
        let first_caller = resource_requirements(&solve(rip, &catalog).unwrap());
        assert_eq!(first_caller.raw_rate(item(&catalog, IRON_ORE)), 60.0);

        let config = SolverConfig {
            demand: DemandPolicy::Aggregate,
            ..SolverConfig::default()
        };
        let aggregated = resource_requirements(&solve_with(rip, &catalog, &config).unwrap());
        assert_eq!(aggregated.raw_rate(item(&catalog, IRON_ORE)), 60.0);
    }

    #[test]
    fn raw_totals_match_consumer_demand() {
        let catalog = reinforced_plate_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, REINFORCED_PLATE), 5.0),
            &catalog,
        )
        .unwrap();
        let ingot = plan.node_for_item(item(&catalog, IRON_INGOT)).unwrap();
        let consumed: f64 = plan
            .nodes()
            .flat_map(|(_, node)| node.inputs.iter())
            .filter(|input| input.producer.node() == Some(ingot))
            .map(|input| input.rate_per_minute)
            .sum();
        assert_eq!(consumed, 60.0);

        let req = resource_requirements(&plan);
        assert_eq!(req.raw_rate(item(&catalog, IRON_ORE)), consumed);
    }

    #[test]
    fn zero_target_needs_nothing() {
        let catalog = iron_plate_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, IRON_PLATE), 0.0),
            &catalog,
        )
        .unwrap();
        assert_eq!(resource_requirements(&plan).raw_rate(item(&catalog, IRON_ORE)), 0.0);
    }

    #[test]
    fn unresolved_inputs_are_kept_apart() {
        let catalog = two_cycle_catalog();
        let a = item(&catalog, "Desc_A_C");
        let plan = solve(ProductionTarget::new(a, 10.0), &catalog).unwrap();
        let req = resource_requirements(&plan);
        assert!(req.raw.is_empty());
        assert_eq!(req.unresolved.get(&a), Some(&10.0));
        assert!(!req.is_fully_resolved());
    }

    #[test]
    fn machine_totals_by_building() {
        let catalog = reinforced_plate_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, REINFORCED_PLATE), 5.0),
            &catalog,
        )
        .unwrap();
        let totals = building_totals(&plan);
        let constructor = catalog.building_id(CONSTRUCTOR).unwrap();
        let assembler = catalog.building_id(ASSEMBLER).unwrap();
        let smelter = catalog.building_id(SMELTER).unwrap();
        // plate 1.5 + screw 1.5 + rod 1.0
        assert_eq!(totals[&constructor], 4.0);
        assert_eq!(totals[&assembler], 1.0);
        assert_eq!(totals[&smelter], 1.5);
    }
}
