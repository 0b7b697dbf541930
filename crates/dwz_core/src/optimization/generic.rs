//! `optimizeSavingsSplit` — the generic entry point (spec §4.E1): minimize
//! earliest retirement age over the outside/super split fraction `α`.

use rustc_hash::FxHashMap;

use crate::model::Inputs;
use crate::search;

use super::config::{OptimizerOpts, SplitPolicy};
use super::result::{Constraints, OptimizeResult, SensitivityPoint};
use super::{build_sensitivity_offsets, explain, quantize_pct, with_split};

type Outcome = (Option<u32>, Option<f64>);

fn eval_alpha(
    inputs: &Inputs,
    policy: &SplitPolicy,
    alpha: f64,
    cache: &mut FxHashMap<i64, Outcome>,
    evaluations: &mut u32,
) -> Outcome {
    let key = quantize_pct(alpha);
    if let Some(cached) = cache.get(&key) {
        return *cached;
    }
    *evaluations += 1;
    let split_inputs = with_split(inputs, policy, alpha);
    let outcome = match search::find_earliest_viable(&split_inputs) {
        Some(viable) => (Some(viable.age), Some(viable.s_base)),
        None => (None, None),
    };
    cache.insert(key, outcome);
    outcome
}

/// Lower age is better; a viable outcome always beats an infeasible one.
fn is_strictly_better(a: Outcome, b: Outcome) -> bool {
    match (a.0, b.0) {
        (Some(x), Some(y)) => x < y,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// `optimizeSavingsSplit(inp, policy, opts)` (spec §4.E1): coarse grid,
/// then ternary refinement around the grid optimum, with memoized
/// evaluations and a five-point sensitivity band.
#[must_use]
pub fn optimize_savings_split(
    inputs: &Inputs,
    policy: &SplitPolicy,
    opts: &OptimizerOpts,
) -> OptimizeResult {
    let mut cache = FxHashMap::default();
    let mut evaluations = 0u32;

    let grid_points = opts.grid_points.max(2);
    let mut best_pct = 0.0_f64;
    let mut best_outcome: Outcome = (None, None);

    for i in 0..grid_points {
        let alpha = policy.max_pct * f64::from(i) / f64::from(grid_points - 1);
        let outcome = eval_alpha(inputs, policy, alpha, &mut cache, &mut evaluations);
        if is_strictly_better(outcome, best_outcome) {
            best_outcome = outcome;
            best_pct = alpha;
        }
    }

    let mut lo = (best_pct - opts.refine_window).max(0.0);
    let mut hi = (best_pct + opts.refine_window).min(policy.max_pct);
    for _ in 0..opts.refine_iters {
        if hi - lo < 1e-6 {
            break;
        }
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        let o1 = eval_alpha(inputs, policy, m1, &mut cache, &mut evaluations);
        let o2 = eval_alpha(inputs, policy, m2, &mut cache, &mut evaluations);
        if is_strictly_better(o1, best_outcome) {
            best_outcome = o1;
            best_pct = m1;
        }
        if is_strictly_better(o2, best_outcome) {
            best_outcome = o2;
            best_pct = m2;
        }
        if o1.0.map_or(u32::MAX, |a| a) <= o2.0.map_or(u32::MAX, |a| a) {
            hi = m2;
        } else {
            lo = m1;
        }
    }

    let sensitivity: Vec<SensitivityPoint> = build_sensitivity_offsets(best_pct, policy.max_pct)
        .into_iter()
        .map(|pct| {
            let outcome = eval_alpha(inputs, policy, pct, &mut cache, &mut evaluations);
            SensitivityPoint {
                pct,
                earliest_age: outcome.0,
                s_base: outcome.1,
            }
        })
        .collect();

    let cap_room = policy.cap_per_person * f64::from(policy.eligible_people) - inputs.employer_sg_gross;
    let cap_binding = (inputs.annual_savings * best_pct) > cap_room + 1e-6;
    let explanation = explain(best_pct, best_outcome.0, cap_binding);

    OptimizeResult {
        recommended_pct: best_pct,
        earliest_age: best_outcome.0,
        dwz_spend: best_outcome.1,
        sensitivity,
        constraints: Constraints {
            cap_per_person: policy.cap_per_person,
            eligible_people: policy.eligible_people,
            cap_binding,
        },
        evaluations,
        explanation,
    }
}
