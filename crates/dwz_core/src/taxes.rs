//! Contribution tax conversions for the accumulation-phase savings split.
//!
//! These mirror the gross/net conversions a payroll or super contribution
//! calculation performs, kept as small pure functions — one per direction,
//! no shared state.

use crate::model::{PreFireSavingsSplit, SplitMode};

/// Split one year's `annual_savings` between outside and super under a
/// [`PreFireSavingsSplit`] policy, honoring the concessional-cap headroom
/// (employer SG counts against it first) and spilling any excess super
/// share to outside. Returns `(to_outside, to_super)` as landed (post-tax,
/// where applicable) dollar amounts.
#[must_use]
pub fn route_contribution(
    annual_savings: f64,
    employer_sg_gross: f64,
    split: &PreFireSavingsSplit,
) -> (f64, f64) {
    let cap_room =
        (split.cap_per_person * f64::from(split.eligible_people) - employer_sg_gross).max(0.0);

    match split.mode {
        SplitMode::NetFixed => {
            let net_share = annual_savings * split.to_super_pct;
            let outside_share = annual_savings - net_share;
            let landed_in_super = net_share.min(cap_room * (1.0 - split.contrib_tax_rate));
            let shortfall = net_share - landed_in_super;
            (outside_share + shortfall, landed_in_super)
        }
        SplitMode::GrossDeferral => {
            let gross_share = annual_savings * split.to_super_pct;
            let allowed_gross = gross_share.min(cap_room);
            let landed_in_super = allowed_gross * (1.0 - split.contrib_tax_rate);
            let outside_tax_rate = split.outside_tax_rate.unwrap_or(0.0);
            let outside_gross = annual_savings - allowed_gross;
            let landed_outside = outside_gross * (1.0 - outside_tax_rate);
            (landed_outside, landed_in_super)
        }
    }
}

/// Gross up a net amount so that, after contributions tax at `tax_rate`, it
/// lands as `net` in the account. Used in [`crate::model::SplitMode::NetFixed`]
/// mode: the household is allocating take-home pay, and the super-destined
/// share needs to arrive gross before the fund's tax bite.
#[must_use]
pub fn gross_up_net(net: f64, tax_rate: f64) -> f64 {
    if tax_rate >= 1.0 {
        return f64::INFINITY;
    }
    net / (1.0 - tax_rate)
}

/// Apply contributions tax to a gross amount, returning what actually lands
/// in the account. Used in [`crate::model::SplitMode::GrossDeferral`] mode:
/// the household is directing pre-tax salary, and each leg (super, outside)
/// is taxed at its own rate on entry.
#[must_use]
pub fn net_of_tax(gross: f64, tax_rate: f64) -> f64 {
    gross * (1.0 - tax_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gross_up_then_net_of_tax_round_trips() {
        let net = 10_000.0;
        let rate = 0.15;
        let grossed = gross_up_net(net, rate);
        let landed = net_of_tax(grossed, rate);
        assert!((landed - net).abs() < 1e-6);
    }

    #[test]
    fn net_of_tax_at_zero_rate_is_identity() {
        assert_eq!(net_of_tax(5_000.0, 0.0), 5_000.0);
    }

    #[test]
    fn gross_up_net_at_standard_concessional_rate() {
        // $8,500 net should gross up to 8500 / 0.85 = 10000
        assert!((gross_up_net(8_500.0, 0.15) - 10_000.0).abs() < 1e-6);
    }

    fn split(mode: SplitMode, to_super_pct: f64, cap_per_person: f64) -> PreFireSavingsSplit {
        PreFireSavingsSplit {
            to_super_pct,
            cap_per_person,
            eligible_people: 1,
            contrib_tax_rate: 0.15,
            outside_tax_rate: Some(0.30),
            mode,
        }
    }

    #[test]
    fn route_contribution_no_cap_binding_net_fixed() {
        let policy = split(SplitMode::NetFixed, 0.5, 1_000_000.0);
        let (outside, super_) = route_contribution(20_000.0, 0.0, &policy);
        assert!((outside - 10_000.0).abs() < 1e-6);
        assert!((super_ - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn route_contribution_cap_binding_spills_to_outside() {
        // Full 20,000 net directed to super, but cap room after SG leaves only
        // room for 10,000 gross -> 8,500 net landing; 11,500 net shortfall spills.
        let policy = split(SplitMode::NetFixed, 1.0, 10_000.0);
        let (outside, super_) = route_contribution(20_000.0, 0.0, &policy);
        assert!((super_ - 8_500.0).abs() < 1e-6);
        assert!((outside - 11_500.0).abs() < 1e-6);
        assert!((outside + super_ - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn route_contribution_employer_sg_eats_into_cap_room() {
        let policy = split(SplitMode::NetFixed, 1.0, 10_000.0);
        let (outside, super_) = route_contribution(20_000.0, 10_000.0, &policy);
        // No cap room left at all -> everything spills to outside.
        assert_eq!(super_, 0.0);
        assert!((outside - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn route_contribution_gross_deferral_taxes_both_legs() {
        let policy = split(SplitMode::GrossDeferral, 0.5, 1_000_000.0);
        let (outside, super_) = route_contribution(20_000.0, 0.0, &policy);
        // 10,000 gross to super taxed at 15% -> 8,500
        assert!((super_ - 8_500.0).abs() < 1e-6);
        // 10,000 gross outside taxed at 30% -> 7,000
        assert!((outside - 7_000.0).abs() < 1e-6);
    }
}
