//! India ESOP taxation: the exercise-time perquisite and the sale-time
//! capital gain.
//!
//! The perquisite (FMV at exercise minus strike, per share) is salary income,
//! taxed by the incremental method: slab tax on other income with and without
//! the perquisite, the difference being the perquisite tax. The capital gain
//! (sale FMV minus exercise FMV) follows one of four statutory paths:
//!
//! | Listing  | Holding      | Treatment                                        |
//! |----------|--------------|--------------------------------------------------|
//! | Listed   | ≤ 12 months  | STCG rate × gain, surcharge capped at 15%, cess  |
//! | Listed   | > 12 months  | LTCG rate × (gain − exemption), capped surcharge |
//! | Unlisted | ≤ 24 months  | slab-incremental on top of other income          |
//! | Unlisted | > 24 months  | flat 20%, uncapped surcharge, cess               |
//!
//! Thresholds, rates, the exemption, and the standard deduction come from the
//! injected [`IndiaTaxTables`] and its per-financial-year policy records.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use esop_core::calculations::india_esop::{IndiaEsopCalculator, IndiaEsopInput};
//! use esop_core::{GrantPortfolio, GrantTranche, IndiaTaxTables, ShareListing};
//!
//! let tables = IndiaTaxTables::year_2025();
//! let calculator = IndiaEsopCalculator::new(&tables);
//!
//! let input = IndiaEsopInput {
//!     portfolio: GrantPortfolio::new(vec![GrantTranche {
//!         id: 1,
//!         share_count: dec!(1000),
//!         exercise_price: dec!(640),
//!     }]),
//!     fmv_at_exercise: dec!(5040),
//!     fmv_at_sale: dec!(10000),
//!     exercise_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
//!     sale_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
//!     other_income: dec!(0),
//!     listing: ShareListing::Listed,
//!     financial_year: "2025-26".to_string(),
//!     plan_to_exercise: true,
//! };
//!
//! let result = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(result.perquisite, dec!(4400000.00));
//! assert_eq!(result.perquisite_tax, dec!(912600.00));
//! assert_eq!(result.capital_gain_tax, dec!(1134848.00));
//! assert_eq!(result.net_after_tax, dec!(7312552.00));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{holding_months, non_negative, round_half_up};
use crate::calculations::progressive::{marginal_rate, progressive_tax};
use crate::config::{FyPolicy, IndiaTaxTables, TableError};
use crate::models::{GrantPortfolio, ShareListing};

/// Errors that can occur during an India ESOP calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndiaEsopError {
    /// The grant portfolio contained no tranches.
    #[error("no grant tranches provided")]
    NoTranches,

    /// The injected tax tables failed validation.
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaEsopInput {
    pub portfolio: GrantPortfolio,
    /// Fair market value per share on the exercise date, INR.
    pub fmv_at_exercise: Decimal,
    /// Expected fair market value per share on the sale date, INR.
    pub fmv_at_sale: Decimal,
    pub exercise_date: NaiveDate,
    pub sale_date: NaiveDate,
    /// Annual income besides the perquisite, INR.
    pub other_income: Decimal,
    pub listing: ShareListing,
    /// Financial-year label selecting the policy record, e.g. `2025-26`.
    pub financial_year: String,
    /// When false, the sale leg is skipped: no capital gain, no proceeds.
    pub plan_to_exercise: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaEsopResult {
    pub total_shares: Decimal,
    pub weighted_avg_exercise_price: Decimal,
    pub exercise_cost: Decimal,
    pub perquisite: Decimal,
    pub perquisite_tax: Decimal,
    /// Surcharge rate the perquisite-inclusive income lands in, percent.
    pub perquisite_surcharge_rate_pct: Decimal,
    pub holding_months: u32,
    pub capital_gain: Decimal,
    pub capital_gain_tax: Decimal,
    pub total_tax: Decimal,
    pub total_cost_to_exercise: Decimal,
    pub gross_proceeds: Decimal,
    pub net_after_tax: Decimal,
    pub effective_tax_rate_pct: Decimal,
    pub stcg_rate_pct: Decimal,
    pub ltcg_rate_pct: Decimal,
    pub ltcg_exemption: Decimal,
    pub new_regime: bool,
}

/// Calculator for India ESOP scenarios over a fixed set of tax tables.
#[derive(Debug, Clone)]
pub struct IndiaEsopCalculator<'a> {
    tables: &'a IndiaTaxTables,
}

impl<'a> IndiaEsopCalculator<'a> {
    pub fn new(tables: &'a IndiaTaxTables) -> Self {
        Self { tables }
    }

    /// Runs the full perquisite + capital-gains calculation.
    ///
    /// # Errors
    ///
    /// Returns [`IndiaEsopError`] if the portfolio is empty or the tables
    /// fail validation.
    pub fn calculate(
        &self,
        input: &IndiaEsopInput,
    ) -> Result<IndiaEsopResult, IndiaEsopError> {
        self.tables.validate()?;
        if input.portfolio.is_empty() {
            return Err(IndiaEsopError::NoTranches);
        }
        let policy = self
            .tables
            .policy_for(&input.financial_year)
            .ok_or_else(|| {
                TableError::MissingDefaultFy(self.tables.default_financial_year.clone())
            })?;

        let fmv_at_exercise = non_negative("fmv_at_exercise", input.fmv_at_exercise);
        let fmv_at_sale = non_negative("fmv_at_sale", input.fmv_at_sale);
        let other_income = non_negative("other_income", input.other_income);

        let summary = input.portfolio.summarize();
        let exercise_cost = round_half_up(summary.exercise_cost);
        let weighted_avg_exercise_price = round_half_up(summary.weighted_avg_exercise_price);

        let perquisite = round_half_up(self.perquisite(&input.portfolio, fmv_at_exercise));
        let income_before = (other_income - policy.standard_deduction).max(Decimal::ZERO);
        let income_after =
            (other_income + perquisite - policy.standard_deduction).max(Decimal::ZERO);
        let perquisite_tax = (self.total_tax_from_income(income_after)
            - self.total_tax_from_income(income_before))
        .max(Decimal::ZERO);

        let holding = holding_months(input.exercise_date, input.sale_date);
        let capital_gain = if input.plan_to_exercise {
            round_half_up((fmv_at_sale - fmv_at_exercise) * summary.total_shares)
        } else {
            Decimal::ZERO
        };
        let capital_gain_tax = if capital_gain > Decimal::ZERO {
            self.capital_gain_tax(capital_gain, income_after, holding, input.listing, policy)
        } else {
            Decimal::ZERO
        };

        let total_tax = perquisite_tax + capital_gain_tax;
        let total_cost_to_exercise = exercise_cost + total_tax;
        let gross_proceeds = if input.plan_to_exercise {
            round_half_up(fmv_at_sale * summary.total_shares)
        } else {
            Decimal::ZERO
        };
        let net_after_tax = if input.plan_to_exercise {
            gross_proceeds - total_cost_to_exercise
        } else {
            Decimal::ZERO
        };
        let effective_tax_rate_pct = if input.plan_to_exercise && gross_proceeds > Decimal::ZERO {
            round_half_up(total_tax / gross_proceeds * Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        Ok(IndiaEsopResult {
            total_shares: summary.total_shares,
            weighted_avg_exercise_price,
            exercise_cost,
            perquisite,
            perquisite_tax,
            perquisite_surcharge_rate_pct: round_half_up(
                self.surcharge_rate(income_after) * Decimal::ONE_HUNDRED,
            ),
            holding_months: holding,
            capital_gain,
            capital_gain_tax,
            total_tax,
            total_cost_to_exercise,
            gross_proceeds,
            net_after_tax,
            effective_tax_rate_pct,
            stcg_rate_pct: round_half_up(policy.listed_stcg_rate * Decimal::ONE_HUNDRED),
            ltcg_rate_pct: round_half_up(policy.listed_ltcg_rate * Decimal::ONE_HUNDRED),
            ltcg_exemption: policy.ltcg_exemption,
            new_regime: policy.new_regime,
        })
    }

    /// Slab tax on a taxable income, before surcharge and cess.
    pub fn slab_tax(&self, income: Decimal) -> Decimal {
        round_half_up(progressive_tax(income, &self.tables.slabs))
    }

    /// Surcharge rate for a total income, from the configured bands.
    pub fn surcharge_rate(&self, total_income: Decimal) -> Decimal {
        marginal_rate(total_income, &self.tables.surcharge_bands)
    }

    /// Surcharge rate for listed capital gains, which the statute caps.
    pub fn listed_gains_surcharge_rate(&self, total_income: Decimal) -> Decimal {
        self.surcharge_rate(total_income)
            .min(self.tables.listed_gains_surcharge_cap)
    }

    /// Complete slab liability on an income: slab tax, surcharge, and cess.
    /// Non-positive incomes owe nothing.
    pub fn total_tax_from_income(&self, income: Decimal) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let base = self.slab_tax(income);
        let surcharge = round_half_up(base * self.surcharge_rate(income));
        let cess = round_half_up((base + surcharge) * self.tables.cess_rate);
        base + surcharge + cess
    }

    /// Sum over tranches of `max(0, fmv − strike) × shares`.
    fn perquisite(
        &self,
        portfolio: &GrantPortfolio,
        fmv_at_exercise: Decimal,
    ) -> Decimal {
        portfolio
            .tranches
            .iter()
            .map(|tranche| {
                (fmv_at_exercise - tranche.effective_exercise_price()).max(Decimal::ZERO)
                    * tranche.effective_share_count()
            })
            .sum()
    }

    fn capital_gain_tax(
        &self,
        gain: Decimal,
        income_after_perquisite: Decimal,
        holding_months: u32,
        listing: ShareListing,
        policy: &FyPolicy,
    ) -> Decimal {
        let total_income = income_after_perquisite + gain;
        match listing {
            ShareListing::Listed if holding_months <= self.tables.listed_ltcg_threshold_months => {
                let base = round_half_up(gain * policy.listed_stcg_rate);
                self.with_surcharge_and_cess(base, self.listed_gains_surcharge_rate(total_income))
            }
            ShareListing::Listed => {
                let taxable_gain = (gain - policy.ltcg_exemption).max(Decimal::ZERO);
                let base = round_half_up(taxable_gain * policy.listed_ltcg_rate);
                self.with_surcharge_and_cess(base, self.listed_gains_surcharge_rate(total_income))
            }
            ShareListing::Unlisted
                if holding_months <= self.tables.unlisted_ltcg_threshold_months =>
            {
                // Short-term unlisted gains are ordinary income: tax the slabs
                // with and without the gain and take the difference.
                (self.total_tax_from_income(total_income)
                    - self.total_tax_from_income(income_after_perquisite))
                .max(Decimal::ZERO)
            }
            ShareListing::Unlisted => {
                let base = round_half_up(gain * self.tables.unlisted_ltcg_rate);
                self.with_surcharge_and_cess(base, self.surcharge_rate(total_income))
            }
        }
    }

    fn with_surcharge_and_cess(
        &self,
        base: Decimal,
        surcharge_rate: Decimal,
    ) -> Decimal {
        let surcharge = round_half_up(base * surcharge_rate);
        let cess = round_half_up((base + surcharge) * self.tables.cess_rate);
        base + surcharge + cess
    }
}
