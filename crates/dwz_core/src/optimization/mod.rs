//! Savings-split optimizer (spec §4.E) — coarse grid plus ternary
//! refinement over the outside/super split fraction `α`, memoized per call,
//! with an MTR-aware per-person allocator for display.

mod allocator;
mod config;
mod generic;
mod plan;
mod result;

pub use allocator::{AllocationResult, Person, PersonAllocation, allocate_concessional_by_mtr};
pub use config::{OptimizerOpts, SplitPolicy};
pub use generic::optimize_savings_split;
pub use plan::optimize_savings_split_for_plan;
pub use result::{Constraints, OptimizeResult, SensitivityPoint};

use crate::model::{Inputs, PreFireSavingsSplit};

/// Quantize `α` to 4 decimal places for the memoization key (spec §4.E1
/// step 3). `f64` isn't `Hash`/`Eq`, so the cache key is the scaled integer.
pub(super) fn quantize_pct(pct: f64) -> i64 {
    (pct * 10_000.0).round() as i64
}

/// Clone `inputs` with `preFireSavingsSplit` set to route `α` of
/// `annualSavings` to super under `policy`.
pub(super) fn with_split(inputs: &Inputs, policy: &SplitPolicy, alpha: f64) -> Inputs {
    let mut out = inputs.clone();
    out.pre_fire_savings_split = Some(PreFireSavingsSplit {
        to_super_pct: alpha,
        cap_per_person: policy.cap_per_person,
        eligible_people: policy.eligible_people,
        contrib_tax_rate: policy.contrib_tax_rate,
        outside_tax_rate: policy.outside_tax_rate,
        mode: policy.mode,
    });
    out
}

/// Five `α` values clustered around `best_pct` (`±0.10`, `±0.05`, optimum),
/// clamped to `[0, max_pct]` and padded by midpoint insertion if clamping
/// collapsed two or more points together (spec §4.E1 step 4).
pub(super) fn build_sensitivity_offsets(best_pct: f64, max_pct: f64) -> Vec<f64> {
    let mut pts: Vec<f64> = [-0.10, -0.05, 0.0, 0.05, 0.10]
        .iter()
        .map(|offset| (best_pct + offset).clamp(0.0, max_pct))
        .collect();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    pts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

    while pts.len() < 5 && pts.len() >= 2 {
        let mut widest_idx = 0;
        let mut widest_gap = -1.0;
        for (i, pair) in pts.windows(2).enumerate() {
            let gap = pair[1] - pair[0];
            if gap > widest_gap {
                widest_gap = gap;
                widest_idx = i;
            }
        }
        let mid = (pts[widest_idx] + pts[widest_idx + 1]) / 2.0;
        pts.insert(widest_idx + 1, mid);
        pts.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    }

    pts
}

/// Build a human-readable explanation for the recommended split (spec
/// §4.E2, examples given near-verbatim).
pub(super) fn explain(pct: f64, age: Option<u32>, cap_binding: bool) -> String {
    match age {
        None => "No viable split found under the given assumptions.".to_string(),
        Some(age) => {
            if cap_binding {
                format!("Maxed salary-sacrifice to cap without delaying retirement (age {age}).")
            } else if pct <= 1e-6 {
                "Bridge binding: allocated savings outside; no super without delaying retirement."
                    .to_string()
            } else {
                format!("Optimal split {:.0}%→super achieves earliest age {age}.", pct * 100.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitivity_offsets_are_clamped_and_sorted() {
        let pts = build_sensitivity_offsets(0.02, 0.30);
        assert!(pts.iter().all(|p| (0.0..=0.30).contains(p)));
        assert!(pts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn sensitivity_offsets_pad_when_clamping_collapses_points() {
        // best_pct near zero collapses both negative offsets to 0.0.
        let pts = build_sensitivity_offsets(0.01, 0.30);
        assert_eq!(pts.len(), 5);
    }

    #[test]
    fn quantize_rounds_to_four_decimal_places() {
        assert_eq!(quantize_pct(0.123_449), quantize_pct(0.1234));
        assert_ne!(quantize_pct(0.1234), quantize_pct(0.1235));
    }
}
