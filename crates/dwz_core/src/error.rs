//! Error types for the DWZ engine.
//!
//! [`InputError`] is the boundary error: it fails a request fast, before any
//! simulation runs, and carries a human-readable reason across the message
//! boundary (see [`crate::boundary`]). [`EngineError`] is internal — it
//! marks conditions the solver and search loops treat as domain infeasibility
//! rather than propagate as faults: bisection non-convergence, for
//! instance, means the plan can't be solved, not that the engine broke.

use std::fmt;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Internal, non-fatal conditions surfaced by the simulator/solver. These
/// never cross the engine boundary directly — callers (`search`,
/// `optimization`) fold them into `None` / infeasible results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A withdrawal exceeded available funds; simulation clamped to zero.
    Depleted { age: u32 },
    /// Bisection exhausted its iteration budget without reaching tolerance.
    BisectionNonConvergent,
}

/// Request-rejection errors: the input itself is invalid, independent of
/// whether a plan turns out to be achievable.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    NegativeBalance { field: &'static str },
    NegativeSavings,
    LifeExpBeforeCurrentAge,
    EmptyBands,
    BandsNotStrictlyIncreasing,
    NonPositiveMultiplier { end_age_incl: u32 },
    BandsDoNotCoverLifeExpectancy,
    SplitPctOutOfRange { value: f64 },
    InvalidTaxRate { field: &'static str, value: f64 },
    NegativeCapPerPerson,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NegativeBalance { field } => {
                write!(f, "{field} must be non-negative")
            }
            InputError::NegativeSavings => write!(f, "annualSavings must be non-negative"),
            InputError::LifeExpBeforeCurrentAge => {
                write!(f, "lifeExp must be greater than currentAge")
            }
            InputError::EmptyBands => write!(f, "bands must contain at least one entry"),
            InputError::BandsNotStrictlyIncreasing => {
                write!(f, "bands.endAgeIncl must be strictly increasing")
            }
            InputError::NonPositiveMultiplier { end_age_incl } => {
                write!(f, "band ending at age {end_age_incl} has a non-positive multiplier")
            }
            InputError::BandsDoNotCoverLifeExpectancy => {
                write!(f, "the last band must cover lifeExp")
            }
            InputError::SplitPctOutOfRange { value } => {
                write!(f, "toSuperPct {value} is outside [0, 1]")
            }
            InputError::InvalidTaxRate { field, value } => {
                write!(f, "{field} {value} is outside [0, 1]")
            }
            InputError::NegativeCapPerPerson => write!(f, "capPerPerson must be non-negative"),
        }
    }
}

impl std::error::Error for InputError {}
