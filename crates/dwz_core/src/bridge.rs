//! Bridge assessor — the single source of truth for whether the
//! outside-only period between retirement age `R` and preservation age `P`
//! is funded.

use serde::{Deserialize, Serialize};

use crate::model::Inputs;

/// PV feasibility of the `[R, P)` bridge period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeReport {
    pub years: u32,
    pub need_pv: f64,
    pub have_pv: f64,
    pub covered: bool,
}

const COVERED_EPSILON: f64 = 1.0;

/// Compute the bridge report for base spend `s` at retirement age `r`, given
/// outside balance `outside_at_r` already rolled to `r`.
///
/// `needPV` is the present value, discounted at `realReturn` back to age
/// `R`, of `S · multiplier(x)` over each bridge year `x ∈ [R, P)`. `havePV`
/// is the outside balance at `R` plus the PV of any outside-destined future
/// inflows landing before `P`.
#[must_use]
pub fn compute_bridge_pv(inputs: &Inputs, r: u32, s: f64, outside_at_r: f64) -> BridgeReport {
    let years = inputs.preserve_age.saturating_sub(r);

    let mut need_pv = 0.0;
    for x in r..inputs.preserve_age {
        let discount = (1.0 + inputs.real_return).powi((x - r) as i32);
        need_pv += s * inputs.multiplier_at(x) / discount;
    }

    let mut have_pv = outside_at_r;
    for inflow in &inputs.future_inflows {
        if inflow.age_you > r && inflow.age_you < inputs.preserve_age {
            if let crate::model::InflowDestination::Outside = inflow.to {
                let discount = (1.0 + inputs.real_return).powi((inflow.age_you - r) as i32);
                have_pv += inflow.amount / discount;
            }
        }
    }

    BridgeReport {
        years,
        need_pv,
        have_pv,
        covered: have_pv >= need_pv - COVERED_EPSILON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FutureInflow, HouseholdSnapshot, InflowDestination, SpendingBand};

    fn snapshot() -> HouseholdSnapshot {
        HouseholdSnapshot {
            current_age: 30,
            preserve_age: 60,
            life_exp: 90,
            outside0: 500_000.0,
            super0: 200_000.0,
            annual_savings: 0.0,
            employer_sg_gross: 0.0,
            real_return: 0.05,
            bequest: 0.0,
            bands: vec![SpendingBand {
                end_age_incl: 200,
                multiplier: 1.0,
            }],
            future_inflows: vec![],
            pre_fire_savings_split: None,
        }
    }

    #[test]
    fn zero_bridge_years_is_trivially_covered() {
        let inputs = Inputs::normalize(&snapshot()).unwrap();
        let report = compute_bridge_pv(&inputs, 60, 50_000.0, 100_000.0);
        assert_eq!(report.years, 0);
        assert_eq!(report.need_pv, 0.0);
        assert!(report.covered);
    }

    #[test]
    fn need_pv_discounts_each_bridge_year() {
        let inputs = Inputs::normalize(&snapshot()).unwrap();
        let report = compute_bridge_pv(&inputs, 55, 20_000.0, 1_000_000.0);
        assert_eq!(report.years, 5);
        let expected: f64 = (0..5).map(|k| 20_000.0 / 1.05_f64.powi(k)).sum();
        assert!((report.need_pv - expected).abs() < 1e-6);
        assert!(report.covered);
    }

    #[test]
    fn insufficient_outside_balance_is_not_covered() {
        let inputs = Inputs::normalize(&snapshot()).unwrap();
        let report = compute_bridge_pv(&inputs, 55, 100_000.0, 10_000.0);
        assert!(!report.covered);
        assert!(report.have_pv < report.need_pv);
    }

    #[test]
    fn outside_bound_future_inflow_before_p_improves_have_pv() {
        let mut snap = snapshot();
        snap.future_inflows.push(FutureInflow {
            age_you: 57,
            amount: 100_000.0,
            to: InflowDestination::Outside,
        });
        let inputs = Inputs::normalize(&snap).unwrap();
        let without_inflow = compute_bridge_pv(&Inputs::normalize(&snapshot()).unwrap(), 55, 20_000.0, 50_000.0);
        let with_inflow = compute_bridge_pv(&inputs, 55, 20_000.0, 50_000.0);
        assert!(with_inflow.have_pv > without_inflow.have_pv);
    }

    #[test]
    fn super_bound_inflow_before_p_does_not_count_toward_have_pv() {
        let mut snap = snapshot();
        snap.future_inflows.push(FutureInflow {
            age_you: 57,
            amount: 100_000.0,
            to: InflowDestination::Super,
        });
        let inputs = Inputs::normalize(&snap).unwrap();
        let report = compute_bridge_pv(&inputs, 55, 20_000.0, 50_000.0);
        let baseline = compute_bridge_pv(&Inputs::normalize(&snapshot()).unwrap(), 55, 20_000.0, 50_000.0);
        assert!((report.have_pv - baseline.have_pv).abs() < 1e-9);
    }
}
