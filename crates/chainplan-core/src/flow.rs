//! Conversion of a plan into a flat node/edge diagram.
//!
//! One production node per distinct step, one source node per distinct item
//! entering the plan from outside, and one edge per required input. Node
//! positions and edge ordering into a node are left to the layout engine.

use crate::id::{BuildingId, ItemId, NodeId, RecipeId};
use crate::plan::ProductionPlan;
use serde::Serialize;
use std::collections::HashMap;

/// Identifies a node in a [`FlowGraph`]. Assigned sequentially from a start value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FlowNodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowNode {
    Production {
        id: FlowNodeId,
        step: NodeId,
        recipe: RecipeId,
        building: BuildingId,
        building_count: f64,
    },
    Source {
        id: FlowNodeId,
        item: ItemId,
    },
}

impl FlowNode {
    pub fn id(&self) -> FlowNodeId {
        match self {
            FlowNode::Production { id, .. } | FlowNode::Source { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEdge {
    pub from: FlowNodeId,
    pub to: FlowNodeId,
    pub item: ItemId,
    pub rate_per_minute: f64,
    /// Position of the input in the consuming recipe.
    pub input_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    /// First unused id, for callers appending more nodes.
    pub next_id: u32,
}

impl FlowGraph {
    pub fn production_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, FlowNode::Production { .. }))
            .count()
    }

    pub fn source_count(&self) -> usize {
        self.nodes.len() - self.production_count()
    }

    pub fn incoming(&self, id: FlowNodeId) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().filter(move |e| e.to == id)
    }
}

struct Converter<'a> {
    plan: &'a ProductionPlan,
    graph: FlowGraph,
    steps: HashMap<NodeId, FlowNodeId>,
    sources: HashMap<ItemId, FlowNodeId>,
}

impl Converter<'_> {
    fn allocate(&mut self) -> FlowNodeId {
        let id = FlowNodeId(self.graph.next_id);
        self.graph.next_id += 1;
        id
    }

    fn source(&mut self, item: ItemId) -> FlowNodeId {
        if let Some(&id) = self.sources.get(&item) {
            return id;
        }
        let id = self.allocate();
        self.graph.nodes.push(FlowNode::Source { id, item });
        self.sources.insert(item, id);
        id
    }

    fn step(&mut self, step: NodeId) -> FlowNodeId {
        if let Some(&id) = self.steps.get(&step) {
            return id;
        }
        let plan = self.plan;
        let node = &plan[step];
        let id = self.allocate();
        self.graph.nodes.push(FlowNode::Production {
            id,
            step,
            recipe: node.recipe,
            building: node.building,
            building_count: node.building_count,
        });
        self.steps.insert(step, id);

        for (input_index, input) in node.inputs.iter().enumerate() {
            let from = match input.producer.node() {
                Some(producer) => self.step(producer),
                None => self.source(input.item),
            };
            self.graph.edges.push(FlowEdge {
                from,
                to: id,
                item: input.item,
                rate_per_minute: input.rate_per_minute,
                input_index,
            });
        }
        id
    }
}

/// Flatten `plan` into diagram nodes and edges, numbering nodes from `start_id`.
pub fn to_flow_graph(plan: &ProductionPlan, start_id: u32) -> FlowGraph {
    let mut converter = Converter {
        plan,
        graph: FlowGraph {
            next_id: start_id,
            ..FlowGraph::default()
        },
        steps: HashMap::new(),
        sources: HashMap::new(),
    };
    converter.step(plan.root_id());
    converter.graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ProductionTarget;
    use crate::resolver::solve;
    use crate::test_utils::*;

    #[test]
    fn iron_plate_flow() {
        let catalog = iron_plate_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, IRON_PLATE), 20.0),
            &catalog,
        )
        .unwrap();
        let graph = to_flow_graph(&plan, 1);

        assert_eq!(graph.production_count(), 2);
        assert_eq!(graph.source_count(), 1);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.nodes[0].id(), FlowNodeId(1));
        assert_eq!(graph.next_id, 4);

        let into_root: Vec<_> = graph.incoming(FlowNodeId(1)).collect();
        assert_eq!(into_root.len(), 1);
        assert_eq!(into_root[0].rate_per_minute, 30.0);
        assert_eq!(into_root[0].item, item(&catalog, IRON_INGOT));
    }

    #[test]
    fn shared_step_and_sources_are_deduplicated() {
        let catalog = reinforced_plate_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, REINFORCED_PLATE), 5.0),
            &catalog,
        )
        .unwrap();
        let graph = to_flow_graph(&plan, 0);

        assert_eq!(graph.production_count(), plan.len());
        assert_eq!(graph.source_count(), 1);

        // RIP <- plate, screw; plate <- ingot; screw <- rod; rod <- ingot; ingot <- ore
        assert_eq!(graph.edges.len(), 6);
        let ingot_step = plan.node_for_item(item(&catalog, IRON_INGOT)).unwrap();
        let ingot_flow = graph
            .nodes
            .iter()
            .find(|n| matches!(n, FlowNode::Production { step, .. } if *step == ingot_step))
            .unwrap()
            .id();
        let from_ingot = graph.edges.iter().filter(|e| e.from == ingot_flow).count();
        assert_eq!(from_ingot, 2);
    }

    #[test]
    fn cycle_back_edge_becomes_source() {
        let catalog = two_cycle_catalog();
        let plan = solve(
            ProductionTarget::new(item(&catalog, "Desc_A_C"), 10.0),
            &catalog,
        )
        .unwrap();
        let graph = to_flow_graph(&plan, 0);
        assert_eq!(graph.production_count(), 2);
        assert_eq!(graph.source_count(), 1);
    }
}
