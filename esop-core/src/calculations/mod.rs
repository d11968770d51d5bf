//! Calculation engines for ESOP and household income-tax scenarios.
//!
//! Each engine borrows its tax tables at construction and validates them at
//! the start of every calculation, so a calculator built over bad tables
//! fails fast instead of producing numbers.

pub mod common;
pub mod india_esop;
pub mod income_tax;
pub mod progressive;
pub mod us_esop;

mod us_payroll;

pub use india_esop::{IndiaEsopCalculator, IndiaEsopError, IndiaEsopInput, IndiaEsopResult};
pub use income_tax::{
    BaseOnlyTaxes, BonusEstimate, EarnerAllocation, EarnerIncome, EarnerRole,
    IncomeTaxCalculator, IncomeTaxError, IncomeTaxInput, IncomeTaxResult, K401Election,
    PerPeriodBreakdown,
};
pub use progressive::{marginal_rate, progressive_tax};
pub use us_esop::{CompensationSource, UsEsopCalculator, UsEsopError, UsEsopInput, UsEsopResult};
