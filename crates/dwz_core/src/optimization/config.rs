//! Savings-split optimizer configuration.

use serde::{Deserialize, Serialize};

use crate::model::SplitMode;

/// The concessional-cap policy shared by both optimizer entry points. The
/// variable the optimizer searches over — the share of `annualSavings`
/// directed to super — is `α`, not part of this policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitPolicy {
    /// Upper bound on the searched `α ∈ [0, maxPct]`.
    pub max_pct: f64,
    pub cap_per_person: f64,
    pub eligible_people: u32,
    pub contrib_tax_rate: f64,
    pub outside_tax_rate: Option<f64>,
    pub mode: SplitMode,
}

/// Tunables for the grid + ternary-refinement search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerOpts {
    /// Number of equispaced grid points in `[0, maxPct]`.
    pub grid_points: u32,
    /// Number of ternary-search refinement passes around the grid optimum.
    pub refine_iters: u32,
    /// Half-width of the refinement window around the grid optimum.
    pub refine_window: f64,
}

impl Default for OptimizerOpts {
    fn default() -> Self {
        Self {
            grid_points: 21,
            refine_iters: 2,
            refine_window: 0.15,
        }
    }
}
