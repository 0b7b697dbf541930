//! Wealth trajectory output type.

use serde::{Deserialize, Serialize};

/// Which leg of the plan a [`PathPoint`] falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Still saving, before retirement.
    Accum,
    /// Retired, before preservation age — outside funds only.
    Bridge,
    /// Retired, at or past preservation age — commingled pool.
    Retire,
}

/// One end-of-year point on the wealth trajectory, after that year's flows
/// and growth have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub age: u32,
    pub outside: f64,
    pub super_balance: f64,
    pub total: f64,
    pub phase: Phase,
}

impl PathPoint {
    #[must_use]
    pub fn new(age: u32, outside: f64, super_balance: f64, phase: Phase) -> Self {
        Self {
            age,
            outside,
            super_balance,
            total: outside + super_balance,
            phase,
        }
    }
}
