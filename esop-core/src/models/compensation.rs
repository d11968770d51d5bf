use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Resolved annual compensation figures for one earner.
///
/// All amounts are annual USD. A household calculation embeds the primary
/// earner's resolved profile in its result so an ESOP calculation can reuse it
/// without re-entering the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationProfile {
    pub base_salary: Decimal,
    pub bonus: Decimal,
    /// Employee 401(k) contribution, already derived and capped.
    pub k401_contribution: Decimal,
    pub health_annual: Decimal,
    pub other_annual: Decimal,
}

impl CompensationProfile {
    pub fn gross(&self) -> Decimal {
        self.base_salary + self.bonus
    }

    /// Deductions that reduce federal and state taxable income.
    pub fn pretax_income_deductions(&self) -> Decimal {
        self.k401_contribution + self.health_annual + self.other_annual
    }

    /// Deductions that reduce FICA wages. 401(k) contributions stay in FICA
    /// wages; only cafeteria-plan items come out.
    pub fn pretax_fica_deductions(&self) -> Decimal {
        self.health_annual + self.other_annual
    }
}
