//! Shared result shapes for both savings-split optimizer entry points.

use serde::{Deserialize, Serialize};

/// One outcome at a nearby split percentage, evaluated for the sensitivity
/// band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub pct: f64,
    pub earliest_age: Option<u32>,
    pub s_base: Option<f64>,
}

/// The effective concessional-cap constraints at the recommended split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub cap_per_person: f64,
    pub eligible_people: u32,
    /// Whether `annualSavings · recommendedPct` exceeds the remaining
    /// concessional-cap headroom at the optimum.
    pub cap_binding: bool,
}

/// Result shared by `optimizeSavingsSplit` and
/// `optimizeSavingsSplitForPlan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub recommended_pct: f64,
    pub earliest_age: Option<u32>,
    pub dwz_spend: Option<f64>,
    pub sensitivity: Vec<SensitivityPoint>,
    pub constraints: Constraints,
    pub evaluations: u32,
    pub explanation: String,
}
