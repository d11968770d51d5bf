use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One progressive bracket: income up to `up_to` (exclusive of the next
/// bracket) is taxed at `rate`. `up_to = None` marks the unbounded top bracket.
/// Rates are fractions, not percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub up_to: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn up_to(bound: Decimal, rate: Decimal) -> Self {
        Self {
            up_to: Some(bound),
            rate,
        }
    }

    pub fn top(rate: Decimal) -> Self {
        Self { up_to: None, rate }
    }
}
