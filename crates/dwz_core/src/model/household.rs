//! Household snapshot — the wire-facing input contract.
//!
//! [`HouseholdSnapshot`] is what a host deserializes off the message
//! boundary (see [`crate::boundary`]); [`Inputs`] is what the engine
//! actually computes against, produced once per call by
//! [`Inputs::normalize`].

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// An age-banded spending multiplier. `spend(x) = sBase * multiplier(x)` for
/// the first band whose `end_age_incl >= x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendingBand {
    pub end_age_incl: u32,
    pub multiplier: f64,
}

/// Which account a future lump sum lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InflowDestination {
    #[default]
    Outside,
    Super,
}

/// A one-off lump sum the household expects at a future age, applied once
/// in the year the household reaches `age_you`, before that year's growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FutureInflow {
    pub age_you: u32,
    pub amount: f64,
    #[serde(default)]
    pub to: InflowDestination,
}

/// How `annual_savings` is interpreted when routing a share to super.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitMode {
    /// `annual_savings` is net take-home being allocated; the super share is
    /// grossed up at `contrib_tax_rate` so it lands net of contributions tax.
    NetFixed,
    /// `annual_savings` is pre-tax salary being directed; the super share is
    /// taxed at `contrib_tax_rate` on entry, the outside share at
    /// `outside_tax_rate`.
    GrossDeferral,
}

/// Pre-retirement savings-routing policy between outside and super.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreFireSavingsSplit {
    pub to_super_pct: f64,
    pub cap_per_person: f64,
    pub eligible_people: u32,
    #[serde(default = "default_contrib_tax_rate")]
    pub contrib_tax_rate: f64,
    pub outside_tax_rate: Option<f64>,
    pub mode: SplitMode,
}

fn default_contrib_tax_rate() -> f64 {
    0.15
}

/// Household snapshot as received from the host, at "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    pub current_age: u32,
    pub preserve_age: u32,
    pub life_exp: u32,
    pub outside0: f64,
    pub super0: f64,
    pub annual_savings: f64,
    #[serde(default)]
    pub employer_sg_gross: f64,
    pub real_return: f64,
    #[serde(default)]
    pub bequest: f64,
    pub bands: Vec<SpendingBand>,
    #[serde(default)]
    pub future_inflows: Vec<FutureInflow>,
    #[serde(default)]
    pub pre_fire_savings_split: Option<PreFireSavingsSplit>,
}

/// Normalized, validated form of [`HouseholdSnapshot`] the engine computes
/// against. Immutable once built; every component treats it as a read-only
/// request-scoped value (spec §3 "Lifecycle / ownership").
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub current_age: u32,
    pub preserve_age: u32,
    pub life_exp: u32,
    pub outside0: f64,
    pub super0: f64,
    pub annual_savings: f64,
    pub employer_sg_gross: f64,
    pub real_return: f64,
    pub bequest: f64,
    pub bands: Vec<SpendingBand>,
    pub future_inflows: Vec<FutureInflow>,
    pub pre_fire_savings_split: Option<PreFireSavingsSplit>,
}

impl Inputs {
    /// Validate a snapshot and produce the normalized record the rest of the
    /// engine operates on. Fails fast on the input-invalid conditions listed
    /// in spec §7: negative balances, non-monotonic bands, `lifeExp` at or
    /// before `currentAge`, non-positive multipliers.
    pub fn normalize(snapshot: &HouseholdSnapshot) -> Result<Self, InputError> {
        if snapshot.outside0 < 0.0 {
            return Err(InputError::NegativeBalance { field: "outside0" });
        }
        if snapshot.super0 < 0.0 {
            return Err(InputError::NegativeBalance { field: "super0" });
        }
        if snapshot.annual_savings < 0.0 {
            return Err(InputError::NegativeSavings);
        }
        if snapshot.life_exp <= snapshot.current_age {
            return Err(InputError::LifeExpBeforeCurrentAge);
        }
        if snapshot.bands.is_empty() {
            return Err(InputError::EmptyBands);
        }

        let mut prev_end: Option<u32> = None;
        for band in &snapshot.bands {
            if band.multiplier <= 0.0 {
                return Err(InputError::NonPositiveMultiplier {
                    end_age_incl: band.end_age_incl,
                });
            }
            if let Some(prev) = prev_end {
                if band.end_age_incl <= prev {
                    return Err(InputError::BandsNotStrictlyIncreasing);
                }
            }
            prev_end = Some(band.end_age_incl);
        }
        if snapshot.bands.last().unwrap().end_age_incl < snapshot.life_exp {
            return Err(InputError::BandsDoNotCoverLifeExpectancy);
        }

        if let Some(split) = &snapshot.pre_fire_savings_split {
            if !(0.0..=1.0).contains(&split.to_super_pct) {
                return Err(InputError::SplitPctOutOfRange {
                    value: split.to_super_pct,
                });
            }
            if split.cap_per_person < 0.0 {
                return Err(InputError::NegativeCapPerPerson);
            }
            if !(0.0..=1.0).contains(&split.contrib_tax_rate) {
                return Err(InputError::InvalidTaxRate {
                    field: "contribTaxRate",
                    value: split.contrib_tax_rate,
                });
            }
            if let Some(rate) = split.outside_tax_rate {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(InputError::InvalidTaxRate {
                        field: "outsideTaxRate",
                        value: rate,
                    });
                }
            }
        }

        Ok(Inputs {
            current_age: snapshot.current_age,
            preserve_age: snapshot.preserve_age,
            life_exp: snapshot.life_exp,
            outside0: snapshot.outside0,
            super0: snapshot.super0,
            annual_savings: snapshot.annual_savings,
            employer_sg_gross: snapshot.employer_sg_gross,
            real_return: snapshot.real_return,
            bequest: snapshot.bequest,
            bands: snapshot.bands.clone(),
            future_inflows: snapshot.future_inflows.clone(),
            pre_fire_savings_split: snapshot.pre_fire_savings_split,
        })
    }

    /// `multiplier(x)`: the first band with `x <= end_age_incl`.
    #[must_use]
    pub fn multiplier_at(&self, age: u32) -> f64 {
        self.bands
            .iter()
            .find(|b| age <= b.end_age_incl)
            .map(|b| b.multiplier)
            .unwrap_or_else(|| self.bands.last().expect("normalize ensures non-empty bands").multiplier)
    }

    /// Inflows landing in the year the household reaches `age`, in list order.
    pub fn inflows_at(&self, age: u32) -> impl Iterator<Item = &FutureInflow> {
        self.future_inflows.iter().filter(move |i| i.age_you == age)
    }
}
