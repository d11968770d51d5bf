//! Shared helpers for the calculation engines: money rounding, date span
//! arithmetic, and input clamping.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero, following standard financial
/// rounding conventions.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use esop_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole dollars, half away from zero. Used for derived 401(k)
/// contributions, which payroll systems keep in whole dollars.
pub fn round_to_dollar(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to one decimal place, half away from zero. Household-level display
/// rates carry a single decimal.
pub fn round_to_tenth(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Whole months between two dates, ignoring the day of month. Returns zero
/// when `end` is not after `start`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use esop_core::calculations::common::holding_months;
///
/// let exercise = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
/// let sale = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
/// assert_eq!(holding_months(exercise, sale), 12);
/// ```
pub fn holding_months(
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    months.max(0) as u32
}

/// Clamps a contractually non-negative input to zero, logging when it was
/// negative.
pub(crate) fn non_negative(
    name: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field = name, value = %value, "negative amount treated as zero");
        return Decimal::ZERO;
    }
    value
}
