//! Cross-cutting property tests and concrete scenarios, exercised
//! through the public engine API rather than any one module's internals.


use crate::model::{HouseholdSnapshot, SpendingBand};

pub(super) fn couple_base_snapshot() -> HouseholdSnapshot {
    HouseholdSnapshot {
        current_age: 30,
        preserve_age: 60,
        life_exp: 90,
        outside0: 50_000.0,
        super0: 100_000.0,
        annual_savings: 50_000.0,
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
