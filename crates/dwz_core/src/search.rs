//! Earliest-viable-age searches.
//!
//! [`find_earliest_viable`] is the unconstrained linear scan; it sweeps
//! every candidate retirement age outright. [`find_earliest_age_for_plan`]
//! is the plan-first binary search: given a target spend, it narrows in on
//! the earliest age that can sustain it, exploiting `S(R)` being
//! non-decreasing in `R` on the feasible region.

use crate::bridge::{self, BridgeReport};
use crate::model::{Inputs, PathPoint};
use crate::simulation::accumulate_until;
use crate::solver;

/// How far past `currentAge` the unconstrained scan and the plan-first
/// search's default upper bound reach, absent a tighter `hiAgeHint`.
const DEFAULT_AGE_WINDOW: u32 = 60;
const MAX_PLAN_SEARCH_ITERS: u32 = 20;

/// Evaluate the solved `S` at retirement age `r`: roll balances to `r`,
/// then bisect for the sustainable spend.
fn solve_s_at_age(inputs: &Inputs, r: u32) -> solver::SolveResult {
    let (balances_at_r, _) = accumulate_until(inputs, r);
    solver::solve_s_base_for_age(inputs, balances_at_r, r)
}

/// Result of the unconstrained earliest-viable-age scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ViableResult {
    pub age: u32,
    pub s_base: f64,
    pub path: Vec<PathPoint>,
    pub bridge: BridgeReport,
}

/// Finds the smallest retirement age `R` whose solved `S` is positive, the
/// bridge period is covered, and the path never depletes before `lifeExp`.
/// Scans `R` from `currentAge` up to `min(lifeExp - 1, currentAge + 60)`.
#[must_use]
pub fn find_earliest_viable(inputs: &Inputs) -> Option<ViableResult> {
    let cap = inputs
        .life_exp
        .saturating_sub(1)
        .min(inputs.current_age + DEFAULT_AGE_WINDOW);

    for r in inputs.current_age..=cap {
        let (balances_at_r, accum_path) = accumulate_until(inputs, r);
        let solved = solver::solve_s_base_for_age(inputs, balances_at_r, r);
        let report = bridge::compute_bridge_pv(inputs, r, solved.s_base, balances_at_r.outside);

        let viable = solved.s_base > 0.0 && report.covered && !solved.depleted;
        if viable {
            let mut path = accum_path;
            path.extend(solved.path_retire);
            return Some(ViableResult {
                age: r,
                s_base: solved.s_base,
                path,
                bridge: report,
            });
        }
    }

    None
}

/// Result of the plan-first search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanSearchResult {
    pub earliest_age: Option<u32>,
    pub at_age_spend: Option<f64>,
    pub evaluations: u32,
}

/// Finds the smallest retirement age `R` whose solved `S(R) >= plan`, by
/// binary search over integer ages, exploiting the monotonicity of `S(R)`
/// in `R`.
///
/// `hi_age_hint` lets a caller (the split optimizer, tightening across
/// successive `α` values) narrow the upper bound below the default
/// `currentAge + 60` window.
#[must_use]
pub fn find_earliest_age_for_plan(
    inputs: &Inputs,
    plan: f64,
    hi_age_hint: Option<u32>,
) -> PlanSearchResult {
    let mut evaluations = 0u32;
    let mut rlo = inputs.current_age;
    let mut rhi = inputs
        .life_exp
        .saturating_sub(1)
        .min(hi_age_hint.unwrap_or(inputs.current_age + DEFAULT_AGE_WINDOW));

    let s_at_rhi = solve_s_at_age(inputs, rhi);
    evaluations += 1;
    if s_at_rhi.s_base < plan {
        return PlanSearchResult {
            earliest_age: None,
            at_age_spend: None,
            evaluations,
        };
    }

    let mut best_spend = s_at_rhi.s_base;
    for _ in 0..MAX_PLAN_SEARCH_ITERS {
        if rlo >= rhi {
            break;
        }
        let mid = rlo + (rhi - rlo) / 2;
        let solved = solve_s_at_age(inputs, mid);
        evaluations += 1;
        if solved.s_base >= plan {
            rhi = mid;
            best_spend = solved.s_base;
        } else {
            rlo = mid + 1;
        }
    }

    PlanSearchResult {
        earliest_age: Some(rhi),
        at_age_spend: Some(best_spend),
        evaluations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HouseholdSnapshot, Inputs, SpendingBand};

    fn couple_base_snapshot() -> HouseholdSnapshot {
        HouseholdSnapshot {
            current_age: 30,
            preserve_age: 60,
            life_exp: 90,
            outside0: 100_000.0,
            super0: 200_000.0,
            annual_savings: 100_000.0,
            employer_sg_gross: 0.0,
            real_return: 0.059,
            bequest: 0.0,
            bands: vec![
                SpendingBand {
                    end_age_incl: 60,
                    multiplier: 1.10,
                },
                SpendingBand {
                    end_age_incl: 75,
                    multiplier: 1.00,
                },
                SpendingBand {
                    end_age_incl: 200,
                    multiplier: 0.85,
                },
            ],
            future_inflows: vec![],
            pre_fire_savings_split: None,
        }
    }

    #[test]
    fn s1_couples_base_finds_viable_age_in_expected_range() {
        let inputs = Inputs::normalize(&couple_base_snapshot()).unwrap();
        let result = find_earliest_viable(&inputs).expect("S1 should be viable");
        assert!((40..=56).contains(&result.age), "age was {}", result.age);
        let terminal = result.path.last().unwrap().total;
        assert!(terminal.abs() < 1_000.0);
        assert!(result.bridge.covered);
    }

    #[test]
    fn path_is_monotonic_in_age_with_no_duplicates() {
        let inputs = Inputs::normalize(&couple_base_snapshot()).unwrap();
        let result = find_earliest_viable(&inputs).unwrap();
        for pair in result.path.windows(2) {
            assert_eq!(pair[1].age, pair[0].age + 1);
        }
    }

    #[test]
    fn plan_first_feasible_plan_meets_or_exceeds_target() {
        let inputs = Inputs::normalize(&couple_base_snapshot()).unwrap();
        let result = find_earliest_age_for_plan(&inputs, 65_000.0, None);
        let age = result.earliest_age.expect("plan should be feasible");
        assert!(result.at_age_spend.unwrap() >= 65_000.0 - 1e-6);
        assert!(age >= inputs.current_age);
    }

    #[test]
    fn plan_first_absurd_plan_is_infeasible() {
        let inputs = Inputs::normalize(&couple_base_snapshot()).unwrap();
        let result = find_earliest_age_for_plan(&inputs, 500_000.0, None);
        assert_eq!(result.earliest_age, None);
        assert_eq!(result.at_age_spend, None);
    }

    #[test]
    fn hi_age_hint_narrows_the_search_window() {
        let inputs = Inputs::normalize(&couple_base_snapshot()).unwrap();
        let unhinted = find_earliest_age_for_plan(&inputs, 65_000.0, None);
        let hinted = find_earliest_age_for_plan(&inputs, 65_000.0, Some(unhinted.earliest_age.unwrap() + 2));
        assert_eq!(hinted.earliest_age, unhinted.earliest_age);
    }
}
