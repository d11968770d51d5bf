//! Progressive bracket arithmetic shared by every jurisdiction.
//!
//! A bracket table is a list of `(up_to, rate)` pairs with an unbounded tail.
//! The walk advances through brackets chunk by chunk: each bracket taxes the
//! income between the previous bound and `min(taxable, bound)`. This is the
//! single bracket-walk semantic used everywhere, including the India surcharge
//! band lookup, so boundary behavior is defined in exactly one place.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use esop_core::calculations::progressive::{marginal_rate, progressive_tax};
//! use esop_core::{FilingStatus, UsTaxTables};
//!
//! let tables = UsTaxTables::year_2025();
//! let brackets = tables.fed_brackets.for_status(FilingStatus::Single);
//!
//! // 11,925 × 10% + 36,550 × 12% + 35,775 × 22%
//! assert_eq!(progressive_tax(dec!(84250), brackets), dec!(13449.00));
//! assert_eq!(marginal_rate(dec!(84250), brackets), dec!(0.22));
//! ```

use rust_decimal::Decimal;

use crate::models::TaxBracket;

/// Tax due on `taxable` under a progressive bracket table. Non-positive
/// taxable amounts owe nothing.
pub fn progressive_tax(
    taxable: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    if taxable <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    let mut prev = Decimal::ZERO;

    for bracket in brackets {
        let cap = match bracket.up_to {
            Some(bound) => taxable.min(bound),
            None => taxable,
        };
        if cap > prev {
            tax += (cap - prev) * bracket.rate;
            prev = cap;
        }
        if bracket.up_to.is_none_or(|bound| taxable <= bound) {
            break;
        }
    }

    tax.max(Decimal::ZERO)
}

/// Rate of the bracket the last unit of `taxable` falls in: the first bracket
/// whose bound covers it, or the last bracket's rate when every bound is
/// below `taxable`. Also serves as the step-function lookup for surcharge
/// bands.
pub fn marginal_rate(
    taxable: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    brackets
        .iter()
        .find(|bracket| bracket.up_to.is_none_or(|bound| taxable <= bound))
        .or_else(|| brackets.last())
        .map(|bracket| bracket.rate)
        .unwrap_or(Decimal::ZERO)
}
