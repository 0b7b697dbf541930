//! Balance simulator — forward-rolls `(outside, super)` year by
//! year under deterministic contribution/withdrawal/growth rules.
//!
//! Two entry points:
//! - [`accumulate_until`] rolls the pre-retirement accumulation phase from
//!   `current_age` to a target age.
//! - [`simulate_retirement`] rolls the post-retirement phase (bridge, then
//!   commingled) from a starting balance at retirement age `R` through
//!   `life_exp`.
//!
//! Both apply the end-of-year convention: within a year, inflows land
//! first, then that year's contribution/withdrawal, then growth.

use crate::model::{Inputs, PathPoint, Phase};
use crate::taxes::route_contribution;

/// Household balances at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Balances {
    pub outside: f64,
    pub super_balance: f64,
}

impl Balances {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.outside + self.super_balance
    }
}

/// Roll the accumulation phase forward from `current_age` through
/// `target_age`, inclusive. Returns the balances at `target_age` and the
/// path of end-of-year points from `current_age` through `target_age`
/// (the first point is the unmodified starting snapshot).
///
/// If `target_age <= current_age`, no year is rolled and the returned
/// balances equal the starting snapshot — this is the `R == currentAge`
/// "retire now" case.
#[must_use]
pub fn accumulate_until(inputs: &Inputs, target_age: u32) -> (Balances, Vec<PathPoint>) {
    let mut balances = Balances {
        outside: inputs.outside0,
        super_balance: inputs.super0,
    };
    let mut path = vec![PathPoint::new(
        inputs.current_age,
        balances.outside,
        balances.super_balance,
        Phase::Accum,
    )];

    if target_age <= inputs.current_age {
        return (balances, path);
    }

    for x in inputs.current_age..target_age {
        step_accumulation_year(inputs, &mut balances, x);
        path.push(PathPoint::new(
            x + 1,
            balances.outside,
            balances.super_balance,
            Phase::Accum,
        ));
    }

    (balances, path)
}

fn step_accumulation_year(inputs: &Inputs, balances: &mut Balances, x: u32) {
    apply_inflows(inputs, balances, x + 1);

    let (to_outside, to_super) = match &inputs.pre_fire_savings_split {
        Some(split) => route_contribution(inputs.annual_savings, inputs.employer_sg_gross, split),
        None => (inputs.annual_savings, 0.0),
    };
    balances.outside += to_outside;
    balances.super_balance += to_super;

    balances.outside *= 1.0 + inputs.real_return;
    balances.super_balance *= 1.0 + inputs.real_return;
}

fn apply_inflows(inputs: &Inputs, balances: &mut Balances, landing_age: u32) {
    for inflow in inputs.inflows_at(landing_age) {
        match inflow.to {
            crate::model::InflowDestination::Outside => balances.outside += inflow.amount,
            crate::model::InflowDestination::Super => balances.super_balance += inflow.amount,
        }
    }
}

/// Result of rolling the retirement phase forward.
#[derive(Debug, Clone, PartialEq)]
pub struct RetirementRoll {
    pub path: Vec<PathPoint>,
    pub final_balances: Balances,
    /// Age at which a withdrawal first exceeded available funds, if any.
    pub depleted_at: Option<u32>,
}

/// Roll the retirement phase forward from `balances_at_r` (the state at the
/// start of age `r`) through `life_exp`, spending `s_base * multiplier(age)`
/// each year: outside-only while `age < preserve_age` (the bridge), then a
/// commingled pool depleting outside first — this ordering is observable
/// and deliberate, not an implementation detail.
///
/// `future_inflows` landing during retirement augment balances at the
/// inflow age without triggering a re-solve of `s_base` — the schedule
/// determined at `r` simply continues.
#[must_use]
pub fn simulate_retirement(
    inputs: &Inputs,
    balances_at_r: Balances,
    r: u32,
    s_base: f64,
) -> RetirementRoll {
    let mut balances = balances_at_r;
    let mut path = Vec::with_capacity((inputs.life_exp.saturating_sub(r)) as usize);
    let mut depleted_at = None;

    for x in r..inputs.life_exp {
        apply_inflows(inputs, &mut balances, x + 1);

        let spend = s_base * inputs.multiplier_at(x + 1);
        let shortfall = withdraw(inputs, &mut balances, x + 1, spend);
        if shortfall > 1e-9 && depleted_at.is_none() {
            depleted_at = Some(x + 1);
        }

        balances.outside *= 1.0 + inputs.real_return;
        balances.super_balance *= 1.0 + inputs.real_return;

        let phase = if x < inputs.preserve_age {
            Phase::Bridge
        } else {
            Phase::Retire
        };
        path.push(PathPoint::new(
            x + 1,
            balances.outside,
            balances.super_balance,
            phase,
        ));
    }

    RetirementRoll {
        path,
        final_balances: balances,
        depleted_at,
    }
}

/// Withdraw `spend` from `balances` per the §4.A ordering rule, clamping to
/// zero on insufficient funds. Returns the unfunded shortfall (0 if fully
/// covered).
fn withdraw(inputs: &Inputs, balances: &mut Balances, age_after: u32, spend: f64) -> f64 {
    if age_after < inputs.preserve_age {
        let from_outside = spend.min(balances.outside);
        balances.outside -= from_outside;
        (spend - from_outside).max(0.0)
    } else {
        let from_outside = spend.min(balances.outside);
        balances.outside -= from_outside;
        let remaining = spend - from_outside;
        let from_super = remaining.min(balances.super_balance);
        balances.super_balance -= from_super;
        (remaining - from_super).max(0.0)
    }
}
