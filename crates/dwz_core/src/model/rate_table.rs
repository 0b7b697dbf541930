//! Rate-table data contract — consumed by the engine, not defined here.
//!
//! The jurisdiction-specific rate table (financial year -> concessional cap,
//! employer-contribution rate, progressive tax brackets) is out of scope as
//! a *source of truth* (spec §1, §6): it is host-supplied plain data. These
//! types are the shape the engine expects it in, plus the one pure
//! date-arithmetic helper spec §6 calls out explicitly: selecting the
//! Australian financial-year label from a calendar date.

use serde::{Deserialize, Serialize};

/// A progressive tax bracket: `rate` applies to income above `up_to` of the
/// *previous* bracket, up to this bracket's own `up_to` (or unbounded if
/// `None`, i.e. the top bracket).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub up_to: Option<f64>,
    pub rate: f64,
}

/// One financial year's worth of jurisdiction rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub financial_year: String,
    pub concessional_cap: f64,
    pub super_guarantee_rate: f64,
    pub tax_brackets: Vec<TaxBracket>,
}

/// Label the Australian financial year (1 July – 30 June) containing
/// `(year, month)`, e.g. `(2026, 7) -> "FY2027"`, `(2026, 6) -> "FY2026"`.
#[must_use]
pub fn financial_year_label(year: i32, month: u32) -> String {
    let fy_end_year = if month >= 7 { year + 1 } else { year };
    format!("FY{fy_end_year}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn financial_year_rolls_over_on_july() {
        assert_eq!(financial_year_label(2026, 6), "FY2026");
        assert_eq!(financial_year_label(2026, 7), "FY2027");
        assert_eq!(financial_year_label(2026, 1), "FY2026");
        assert_eq!(financial_year_label(2026, 12), "FY2027");
    }
}
