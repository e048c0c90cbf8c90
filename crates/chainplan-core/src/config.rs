use serde::{Deserialize, Serialize};

/// How demand on a shared production step is accounted for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandPolicy {
    /// A shared step keeps the rates computed for the first input that
    /// reached it. Later consumers link to it without rescaling.
    #[default]
    FirstCaller,
    /// After resolution, demand from every consuming input is summed and
    /// machine counts and input rates are recomputed from the totals.
    Aggregate,
}

/// Solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub demand: DemandPolicy,
    /// Divide machine counts by the building's manufacturing speed.
    pub apply_manufacturing_speed: bool,
}
