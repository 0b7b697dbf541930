//! Data-definition modules: request/response types the rest of the engine
//! operates on.

mod household;
mod path;
mod rate_table;

pub use household::{
    FutureInflow, HouseholdSnapshot, InflowDestination, Inputs, PreFireSavingsSplit,
    SpendingBand, SplitMode,
};
pub use path::{PathPoint, Phase};
pub use rate_table::{RateTableEntry, TaxBracket, financial_year_label};
