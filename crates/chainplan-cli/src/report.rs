//! Serializable solve report and its text rendering.
//!
//! The plan is a DAG; the report unfolds it into a tree. A step with several
//! consumers is expanded the first time it is reached and marked `repeated`
//! at every later occurrence.

use crate::support::fmt_rate;
use chainplan_core::catalog::Catalog;
use chainplan_core::id::{ItemId, NodeId};
use chainplan_core::plan::{Producer, ProductionPlan, RecipeNode};
use chainplan_core::requirements::{building_totals, resource_requirements};
use chainplan_core::resolver::SolveError;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<Totals>,
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub item: String,
    pub recipe: String,
    pub building: String,
    pub building_count: f64,
    pub cycles_per_minute: f64,
    /// More than one input in the plan draws from this step.
    #[serde(skip_serializing_if = "is_false")]
    pub shared: bool,
    /// Already expanded earlier in the tree; inputs omitted.
    #[serde(skip_serializing_if = "is_false")]
    pub repeated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputReport>,
}

#[derive(Debug, Serialize)]
pub struct InputReport {
    pub item: String,
    pub rate_per_minute: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepReport>,
}

#[derive(Debug, Default, Serialize)]
pub struct Totals {
    pub raw: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub unresolved: BTreeMap<String, f64>,
    pub machines: BTreeMap<String, f64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SolveReport {
    pub fn new(result: &Result<ProductionPlan, SolveError>, catalog: &Catalog) -> Self {
        match result {
            Ok(plan) => Self {
                success: true,
                root: Some(TreeBuilder::new(plan, catalog).step(plan.root_id())),
                error: None,
                totals: Some(totals(plan, catalog)),
            },
            Err(err) => Self {
                success: false,
                root: None,
                error: Some(err.to_string()),
                totals: None,
            },
        }
    }
}

struct TreeBuilder<'a> {
    plan: &'a ProductionPlan,
    catalog: &'a Catalog,
    expanded: HashSet<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(plan: &'a ProductionPlan, catalog: &'a Catalog) -> Self {
        Self {
            plan,
            catalog,
            expanded: HashSet::new(),
        }
    }

    fn step(&mut self, id: NodeId) -> StepReport {
        let (plan, catalog) = (self.plan, self.catalog);
        let node: &RecipeNode = &plan[id];
        let repeated = !self.expanded.insert(id);
        let inputs = if repeated {
            Vec::new()
        } else {
            node.inputs
                .iter()
                .map(|input| InputReport {
                    item: catalog.item_name(input.item),
                    rate_per_minute: input.rate_per_minute,
                    unresolved: match &input.producer {
                        Producer::Unresolved(reason) => Some(reason.to_string()),
                        Producer::Resolved(_) => None,
                    },
                    step: input.producer.node().map(|child| self.step(child)),
                })
                .collect()
        };

        StepReport {
            item: catalog.item_name(node.item),
            recipe: catalog
                .recipe(node.recipe)
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            building: catalog
                .building(node.building)
                .map(|b| b.name.clone())
                .unwrap_or_default(),
            building_count: node.building_count,
            cycles_per_minute: node.cycles_per_minute,
            shared: plan.consumer_count(id) > 1,
            repeated,
            inputs,
        }
    }
}

/// Entries sharing a display name are summed into one line.
fn totals(plan: &ProductionPlan, catalog: &Catalog) -> Totals {
    let requirements = resource_requirements(plan);
    let by_name = |map: BTreeMap<ItemId, f64>| -> BTreeMap<String, f64> {
        let mut named = BTreeMap::new();
        for (item, rate) in map {
            *named.entry(catalog.item_name(item)).or_insert(0.0) += rate;
        }
        named
    };

    let mut machines = BTreeMap::new();
    for (building, count) in building_totals(plan) {
        let name = catalog
            .building(building)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| format!("{building:?}"));
        *machines.entry(name).or_insert(0.0) += count;
    }

    Totals {
        raw: by_name(requirements.raw),
        unresolved: by_name(requirements.unresolved),
        machines,
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Render a successful report as an indented tree followed by totals.
pub fn render_text(report: &SolveReport, target_rate: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(root) = &report.root else {
        if let Some(error) = &report.error {
            lines.push(format!("error: {error}"));
        }
        return lines;
    };

    lines.push(format!(
        "{} {}/min  {}",
        root.item,
        fmt_rate(target_rate),
        step_suffix(root)
    ));
    render_inputs(&root.inputs, "", &mut lines);

    if let Some(totals) = &report.totals {
        lines.push(String::new());
        lines.push("Raw materials:".to_string());
        for (item, rate) in &totals.raw {
            lines.push(format!("  {item}: {}/min", fmt_rate(*rate)));
        }
        if !totals.unresolved.is_empty() {
            lines.push("Unresolved inputs:".to_string());
            for (item, rate) in &totals.unresolved {
                lines.push(format!("  {item}: {}/min", fmt_rate(*rate)));
            }
        }
        lines.push("Machines:".to_string());
        for (building, count) in &totals.machines {
            lines.push(format!("  {building}: {}", fmt_rate(*count)));
        }
    }
    lines
}

fn step_suffix(step: &StepReport) -> String {
    let mut suffix = format!(
        "[{} x{} via {}]",
        step.building,
        fmt_rate(step.building_count),
        step.recipe
    );
    if step.repeated {
        suffix.push_str(" (shared, see above)");
    } else if step.shared {
        suffix.push_str(" (shared)");
    }
    suffix
}

fn render_inputs(inputs: &[InputReport], prefix: &str, lines: &mut Vec<String>) {
    for (i, input) in inputs.iter().enumerate() {
        let last = i + 1 == inputs.len();
        let branch = if last { "└─ " } else { "├─ " };
        let detail = match (&input.step, &input.unresolved) {
            (Some(step), _) => step_suffix(step),
            (None, Some(reason)) => format!("<{reason}>"),
            (None, None) => String::new(),
        };
        lines.push(format!(
            "{prefix}{branch}{} {}/min  {detail}",
            input.item,
            fmt_rate(input.rate_per_minute)
        ));
        if let Some(step) = &input.step {
            let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });
            render_inputs(&step.inputs, &child_prefix, lines);
        }
    }
}
