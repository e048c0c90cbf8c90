use crate::id::*;
use serde::Serialize;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashMap, VecDeque};

// ---------------------------------------------------------------------------
// Input edges
// ---------------------------------------------------------------------------

/// Why an input has no producing step in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unresolved {
    /// Extracted directly; supplied from outside the plan.
    RawMaterial,
    /// No automatable recipe produces the item.
    NoRecipe,
    /// The selected recipe's first building is not in the catalog.
    NoBuilding { building: String },
    /// The selected recipe does not list the item among its products.
    ProductMismatch,
    /// The item already appears on the path from the root to this input.
    Cycle,
}

impl std::fmt::Display for Unresolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unresolved::RawMaterial => write!(f, "raw material"),
            Unresolved::NoRecipe => write!(f, "no recipe"),
            Unresolved::NoBuilding { building } => write!(f, "no building {building}"),
            Unresolved::ProductMismatch => write!(f, "recipe does not produce item"),
            Unresolved::Cycle => write!(f, "cyclic dependency"),
        }
    }
}

/// Where an input comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Producer {
    /// Produced by another step of the same plan. Several inputs may share it.
    Resolved(NodeId),
    /// Treated as externally supplied.
    Unresolved(Unresolved),
}

impl Producer {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Producer::Resolved(id) => Some(*id),
            Producer::Unresolved(_) => None,
        }
    }
}

/// One ingredient demand of a production step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredInput {
    pub item: ItemId,
    pub rate_per_minute: f64,
    pub producer: Producer,
}

/// One resolved production step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeNode {
    /// The item this step was resolved for.
    pub item: ItemId,
    pub recipe: RecipeId,
    pub building: BuildingId,
    /// Output of `item` per minute this step is sized for.
    pub rate_per_minute: f64,
    /// Fractional machine count.
    pub building_count: f64,
    pub cycles_per_minute: f64,
    /// In recipe ingredient order.
    pub inputs: Vec<RequiredInput>,
}

// ---------------------------------------------------------------------------
// ProductionPlan
// ---------------------------------------------------------------------------

/// The requested output of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductionTarget {
    pub item: ItemId,
    /// Units per minute.
    pub amount: f64,
}

impl ProductionTarget {
    pub fn new(item: ItemId, amount: f64) -> Self {
        Self { item, amount }
    }
}

/// A resolved production chain.
///
/// Steps live in an arena and inputs refer to their producers by [`NodeId`],
/// so a step needed in several places exists exactly once and the plan is a
/// DAG. A plan is read-only once returned from the solver.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionPlan {
    target: ProductionTarget,
    root: NodeId,
    nodes: SlotMap<NodeId, RecipeNode>,
    #[serde(skip)]
    by_item: HashMap<ItemId, NodeId>,
}

impl ProductionPlan {
    pub(crate) fn new(
        target: ProductionTarget,
        root: NodeId,
        nodes: SlotMap<NodeId, RecipeNode>,
        by_item: HashMap<ItemId, NodeId>,
    ) -> Self {
        Self {
            target,
            root,
            nodes,
            by_item,
        }
    }

    pub fn target(&self) -> ProductionTarget {
        self.target
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &RecipeNode {
        &self.nodes[self.root]
    }

    pub fn node(&self, id: NodeId) -> Option<&RecipeNode> {
        self.nodes.get(id)
    }

    /// The producing step of an input, if it has one.
    pub fn producer(&self, input: &RequiredInput) -> Option<&RecipeNode> {
        input.producer.node().and_then(|id| self.nodes.get(id))
    }

    /// The single step producing `item`, if the plan contains one.
    pub fn node_for_item(&self, item: ItemId) -> Option<NodeId> {
        self.by_item.get(&item).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &RecipeNode)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of inputs across the plan that point at `id`.
    pub fn consumer_count(&self, id: NodeId) -> usize {
        self.nodes
            .values()
            .flat_map(|node| node.inputs.iter())
            .filter(|input| input.producer.node() == Some(id))
            .count()
    }

    /// Steps ordered so that every consumer precedes its producers.
    pub fn topological_order(&self) -> Vec<NodeId> {
        topological_order(&self.nodes)
    }
}

impl std::ops::Index<NodeId> for ProductionPlan {
    type Output = RecipeNode;

    /// Panics if `id` does not belong to this plan.
    fn index(&self, id: NodeId) -> &RecipeNode {
        &self.nodes[id]
    }
}

/// Kahn's algorithm over consumer -> producer links.
///
/// Plans produced by the resolver are acyclic. Should a cycle ever appear,
/// its nodes are appended in key order so every node is still listed once.
pub(crate) fn topological_order(nodes: &SlotMap<NodeId, RecipeNode>) -> Vec<NodeId> {
    let mut in_degree: SecondaryMap<NodeId, usize> = SecondaryMap::new();
    for id in nodes.keys() {
        in_degree.insert(id, 0);
    }
    for node in nodes.values() {
        for input in &node.inputs {
            if let Some(deg) = input.producer.node().and_then(|p| in_degree.get_mut(p)) {
                *deg += 1;
            }
        }
    }

    let mut queue: VecDeque<NodeId> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(id, _)| id)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(id) = queue.pop_front() {
        order.push(id);
        for input in &nodes[id].inputs {
            if let Some(producer) = input.producer.node() {
                if let Some(deg) = in_degree.get_mut(producer) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(producer);
                    }
                }
            }
        }
    }

    if order.len() < nodes.len() {
        let listed: std::collections::HashSet<NodeId> = order.iter().copied().collect();
        let mut rest: Vec<NodeId> = nodes.keys().filter(|id| !listed.contains(id)).collect();
        rest.sort();
        order.extend(rest);
    }

    order
}
