//! `optimizeSavingsSplitForPlan` — the plan-first entry point: minimize
//! earliest age subject to `S(R) ≥ plan`, tie-breaking on the largest `α`.

use rustc_hash::FxHashMap;

use crate::model::Inputs;
use crate::search;

use super::config::{OptimizerOpts, SplitPolicy};
use super::result::{Constraints, OptimizeResult, SensitivityPoint};
use super::{build_sensitivity_offsets, explain, quantize_pct, with_split};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlanEval {
    age: Option<u32>,
    spend: Option<f64>,
}

#[allow(clippy::too_many_arguments)]
fn eval_alpha(
    inputs: &Inputs,
    policy: &SplitPolicy,
    plan: f64,
    alpha: f64,
    cache: &mut FxHashMap<i64, PlanEval>,
    evaluations: &mut u32,
    best_age_hint: &mut Option<u32>,
) -> PlanEval {
    let key = quantize_pct(alpha);
    if let Some(cached) = cache.get(&key) {
        return *cached;
    }
    *evaluations += 1;
    let split_inputs = with_split(inputs, policy, alpha);
    let result = search::find_earliest_age_for_plan(&split_inputs, plan, *best_age_hint);
    if let Some(age) = result.earliest_age {
        *best_age_hint = Some(best_age_hint.map_or(age, |h| h.min(age)));
    }
    let outcome = PlanEval {
        age: result.earliest_age,
        spend: result.at_age_spend,
    };
    cache.insert(key, outcome);
    outcome
}

/// `optimizeSavingsSplitForPlan(inp, plan, policy, opts)`.
/// `bestAgeHint` threads the best age seen so far into subsequent
/// `findEarliestAgeForPlan` calls, tightening their search window.
#[must_use]
pub fn optimize_savings_split_for_plan(
    inputs: &Inputs,
    plan: f64,
    policy: &SplitPolicy,
    opts: &OptimizerOpts,
) -> OptimizeResult {
    let mut cache = FxHashMap::default();
    let mut evaluations = 0u32;
    let mut best_age_hint: Option<u32> = None;
    let mut evaluated: Vec<(f64, PlanEval)> = Vec::new();

    let grid_points = opts.grid_points.max(2);
    for i in 0..grid_points {
        let alpha = policy.max_pct * f64::from(i) / f64::from(grid_points - 1);
        let outcome = eval_alpha(inputs, policy, plan, alpha, &mut cache, &mut evaluations, &mut best_age_hint);
        evaluated.push((alpha, outcome));
    }

    let best_grid_pct = evaluated
        .iter()
        .filter(|(_, o)| o.age.is_some())
        .min_by_key(|(_, o)| o.age.unwrap())
        .map(|(pct, _)| *pct)
        .unwrap_or(0.0);

    let mut lo = (best_grid_pct - opts.refine_window).max(0.0);
    let mut hi = (best_grid_pct + opts.refine_window).min(policy.max_pct);
    for _ in 0..opts.refine_iters {
        if hi - lo < 1e-6 {
            break;
        }
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        let o1 = eval_alpha(inputs, policy, plan, m1, &mut cache, &mut evaluations, &mut best_age_hint);
        let o2 = eval_alpha(inputs, policy, plan, m2, &mut cache, &mut evaluations, &mut best_age_hint);
        evaluated.push((m1, o1));
        evaluated.push((m2, o2));
        let a1 = o1.age.unwrap_or(u32::MAX);
        let a2 = o2.age.unwrap_or(u32::MAX);
        if a1 <= a2 {
            hi = m2;
        } else {
            lo = m1;
        }
    }

    let best_age = evaluated.iter().filter_map(|(_, o)| o.age).min();

    let (recommended_pct, best_outcome) = match best_age {
        None => (0.0, PlanEval { age: None, spend: None }),
        Some(age) => evaluated
            .iter()
            .filter(|(_, o)| o.age == Some(age))
            .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap())
            .copied()
            .expect("best_age was drawn from evaluated"),
    };

    let sensitivity: Vec<SensitivityPoint> = build_sensitivity_offsets(recommended_pct, policy.max_pct)
        .into_iter()
        .map(|pct| {
            let outcome = eval_alpha(inputs, policy, plan, pct, &mut cache, &mut evaluations, &mut best_age_hint);
            SensitivityPoint {
                pct,
                earliest_age: outcome.age,
                s_base: outcome.spend,
            }
        })
        .collect();

    let cap_room = policy.cap_per_person * f64::from(policy.eligible_people) - inputs.employer_sg_gross;
    let cap_binding = (inputs.annual_savings * recommended_pct) > cap_room + 1e-6;
    let explanation = explain(recommended_pct, best_outcome.age, cap_binding);

    OptimizeResult {
        recommended_pct,
        earliest_age: best_outcome.age,
        dwz_spend: best_outcome.spend,
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
