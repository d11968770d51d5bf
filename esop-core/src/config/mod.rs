//! Versioned tax tables injected into the calculation engines.
//!
//! Tables are plain data with explicit `validate()` checks; engines validate
//! the tables they were constructed with before every calculation.

mod india;
mod us;

pub use india::{FyPolicy, IndiaTaxTables};
pub use us::{FicaRates, PerFilingStatus, UsTaxTables};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TaxBracket;

/// Errors raised by tax-table validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("{table} bracket table is empty")]
    EmptyBrackets { table: &'static str },

    #[error("{table} bracket table must end with an unbounded bracket")]
    BoundedTail { table: &'static str },

    #[error("{table} bracket table has a non-final unbounded bracket at entry {index}")]
    UnboundedInterior { table: &'static str, index: usize },

    #[error("{table} bracket bounds must be strictly increasing at entry {index}")]
    NonIncreasingBound { table: &'static str, index: usize },

    #[error("{table} bracket rate {rate} at entry {index} is outside [0, 1]")]
    RateOutOfRange {
        table: &'static str,
        index: usize,
        rate: Decimal,
    },

    #[error("{table} bracket rates must be non-decreasing at entry {index}")]
    DecreasingRate { table: &'static str, index: usize },

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate {
        name: &'static str,
        value: Decimal,
    },

    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount {
        name: &'static str,
        value: Decimal,
    },

    #[error("no financial year policies configured")]
    NoFyPolicies,

    #[error("duplicate financial year policy {0}")]
    DuplicateFyPolicy(String),

    #[error("default financial year {0} has no policy record")]
    MissingDefaultFy(String),
}

/// Checks a bracket table for the shape every engine relies on: strictly
/// increasing bounds, a single unbounded tail, rates within [0, 1] and
/// non-decreasing.
pub(crate) fn check_brackets(
    table: &'static str,
    brackets: &[TaxBracket],
) -> Result<(), TableError> {
    if brackets.is_empty() {
        return Err(TableError::EmptyBrackets { table });
    }

    let mut prev_bound = Decimal::ZERO;
    let mut prev_rate = Decimal::ZERO;
    let last = brackets.len() - 1;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(TableError::RateOutOfRange {
                table,
                index,
                rate: bracket.rate,
            });
        }
        if bracket.rate < prev_rate {
            return Err(TableError::DecreasingRate { table, index });
        }
        prev_rate = bracket.rate;

        match bracket.up_to {
            Some(bound) => {
                if index == last {
                    return Err(TableError::BoundedTail { table });
                }
                if bound <= prev_bound {
                    return Err(TableError::NonIncreasingBound { table, index });
                }
                prev_bound = bound;
            }
            None => {
                if index != last {
                    return Err(TableError::UnboundedInterior { table, index });
                }
            }
        }
    }

    Ok(())
}

pub(crate) fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), TableError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TableError::InvalidRate { name, value });
    }
    Ok(())
}

pub(crate) fn check_amount(
    name: &'static str,
    value: Decimal,
) -> Result<(), TableError> {
    if value < Decimal::ZERO {
        return Err(TableError::NegativeAmount { name, value });
    }
    Ok(())
}
