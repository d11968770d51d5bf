//! US ESOP taxation for INR-denominated grants held by a US/California
//! taxpayer.
//!
//! All INR amounts convert to USD at the supplied FX rate; per-share USD
//! prices stay unrounded so aggregates keep full precision. The perquisite
//! (spread at exercise) is ordinary wage income, costed by the marginal
//! method: the full federal + CA + FICA + SDI liability is computed on
//! compensation alone and again with the perquisite added to gross wages, and
//! the difference is the perquisite tax. The capital gain uses the supplied
//! long-term rate past the holding threshold, or federal + CA bracket
//! increments on top of the with-perquisite taxable amounts for short-term
//! sales. NIIT, when enabled, applies to the portion of the gain above the
//! MAGI threshold.
//!
//! Compensation comes from a [`CompensationSource`], resolved once up front:
//! either the primary-earner profile embedded in a household
//! [`IncomeTaxResult`], or manually entered annual figures.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use esop_core::calculations::us_esop::{CompensationSource, UsEsopCalculator, UsEsopInput};
//! use esop_core::{CompensationProfile, FilingStatus, GrantPortfolio, GrantTranche, UsTaxTables};
//!
//! let tables = UsTaxTables::year_2025();
//! let calculator = UsEsopCalculator::new(&tables);
//!
//! let compensation = CompensationProfile {
//!     base_salary: dec!(150000),
//!     bonus: dec!(0),
//!     k401_contribution: dec!(0),
//!     health_annual: dec!(0),
//!     other_annual: dec!(0),
//! };
//! let input = UsEsopInput {
//!     portfolio: GrantPortfolio::new(vec![GrantTranche {
//!         id: 1,
//!         share_count: dec!(1000),
//!         exercise_price: dec!(640),
//!     }]),
//!     exercise_price_inr: dec!(640),
//!     fmv_at_exercise_inr: dec!(1080),
//!     fmv_at_sale_inr: dec!(5040),
//!     fx_rate_inr_per_usd: dec!(87),
//!     ltcg_rate: dec!(0.15),
//!     include_niit: true,
//!     exercise_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
//!     sale_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
//!     filing_status: FilingStatus::Single,
//!     plan_to_exercise: true,
//! };
//!
//! let result = calculator
//!     .calculate(&input, CompensationSource::Manual(&compensation))
//!     .unwrap();
//!
//! assert_eq!(result.perquisite_usd, dec!(5057.47));
//! assert_eq!(result.marginal_tax_from_perquisite_usd, dec!(2131.71));
//! assert_eq!(result.net_after_tax_usd, dec!(33263.91));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{holding_months, non_negative, round_half_up};
use crate::calculations::income_tax::IncomeTaxResult;
use crate::calculations::progressive::progressive_tax;
use crate::calculations::us_payroll::{self, AnnualLiability};
use crate::config::{TableError, UsTaxTables};
use crate::models::{CompensationProfile, FilingStatus, GrantPortfolio};

/// Errors that can occur during a US ESOP calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsEsopError {
    /// The grant portfolio contained no tranches.
    #[error("no grant tranches provided")]
    NoTranches,

    /// The INR-per-USD rate must be strictly positive.
    #[error("FX rate must be positive, got {0}")]
    InvalidFxRate(Decimal),

    /// The injected tax tables failed validation.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Where the annual compensation figures come from, resolved once at the
/// start of a calculation.
#[derive(Debug, Clone, Copy)]
pub enum CompensationSource<'a> {
    /// Reuse the primary-earner profile a household calculation resolved.
    IncomeTax(&'a IncomeTaxResult),
    /// Directly entered annual figures.
    Manual(&'a CompensationProfile),
}

impl CompensationSource<'_> {
    fn resolve(&self) -> CompensationProfile {
        match self {
            CompensationSource::IncomeTax(result) => result.primary_compensation.clone(),
            CompensationSource::Manual(profile) => (*profile).clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsEsopInput {
    pub portfolio: GrantPortfolio,
    /// Exercise price per share, INR.
    pub exercise_price_inr: Decimal,
    /// Fair market value per share on the exercise date, INR.
    pub fmv_at_exercise_inr: Decimal,
    /// Expected fair market value per share on the sale date, INR.
    pub fmv_at_sale_inr: Decimal,
    /// INR per USD. Must be strictly positive.
    pub fx_rate_inr_per_usd: Decimal,
    /// Long-term capital gains rate as a fraction, e.g. `0.15`.
    pub ltcg_rate: Decimal,
    pub include_niit: bool,
    pub exercise_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub filing_status: FilingStatus,
    /// When false, the sale leg is skipped: no capital gain, no proceeds.
    pub plan_to_exercise: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsEsopResult {
    pub total_shares: Decimal,
    /// Per-share prices in USD, unrounded.
    pub exercise_price_usd: Decimal,
    pub fmv_exercise_usd: Decimal,
    pub fmv_sale_usd: Decimal,
    /// Share-weighted average of the per-tranche INR prices, in USD.
    pub weighted_avg_exercise_price_usd: Decimal,
    pub perquisite_usd: Decimal,
    /// Annual tax on compensation alone.
    pub base_total_tax_usd: Decimal,
    /// Annual tax with the perquisite added to gross wages.
    pub total_tax_with_perquisite_usd: Decimal,
    pub marginal_tax_from_perquisite_usd: Decimal,
    pub holding_months: u32,
    pub capital_gain_usd: Decimal,
    /// Capital gains tax including NIIT when enabled.
    pub capital_gain_tax_usd: Decimal,
    pub niit_usd: Decimal,
    pub exercise_cost_usd: Decimal,
    pub total_tax_usd: Decimal,
    pub total_cost_to_exercise_usd: Decimal,
    pub gross_proceeds_usd: Decimal,
    pub net_after_tax_usd: Decimal,
    pub effective_tax_rate_pct: Decimal,
}

/// Calculator for US ESOP scenarios over a fixed set of tax tables.
#[derive(Debug, Clone)]
pub struct UsEsopCalculator<'a> {
    tables: &'a UsTaxTables,
}

impl<'a> UsEsopCalculator<'a> {
    pub fn new(tables: &'a UsTaxTables) -> Self {
        Self { tables }
    }

    /// Runs the full perquisite + capital-gains calculation in USD.
    ///
    /// # Errors
    ///
    /// Returns [`UsEsopError`] if the portfolio is empty, the FX rate is not
    /// positive, or the tables fail validation.
    pub fn calculate(
        &self,
        input: &UsEsopInput,
        source: CompensationSource<'_>,
    ) -> Result<UsEsopResult, UsEsopError> {
        self.tables.validate()?;
        if input.portfolio.is_empty() {
            return Err(UsEsopError::NoTranches);
        }
        let fx_rate = input.fx_rate_inr_per_usd;
        if fx_rate <= Decimal::ZERO {
            return Err(UsEsopError::InvalidFxRate(fx_rate));
        }
        let compensation = source.resolve();
        let ltcg_rate = clamped_ltcg_rate(input.ltcg_rate);

        let summary = input.portfolio.summarize();
        let total_shares = summary.total_shares;

        let exercise_price_usd =
            non_negative("exercise_price", input.exercise_price_inr) / fx_rate;
        let fmv_exercise_usd = non_negative("fmv_at_exercise", input.fmv_at_exercise_inr) / fx_rate;
        let fmv_sale_usd = non_negative("fmv_at_sale", input.fmv_at_sale_inr) / fx_rate;
        let weighted_avg_exercise_price_usd =
            round_half_up(summary.weighted_avg_exercise_price / fx_rate);

        let exercise_cost_usd = round_half_up(exercise_price_usd * total_shares);
        let perquisite_usd = round_half_up(
            (fmv_exercise_usd - exercise_price_usd).max(Decimal::ZERO) * total_shares,
        );

        let baseline = us_payroll::annual_liability(
            self.tables,
            input.filing_status,
            compensation.gross(),
            compensation.pretax_income_deductions(),
            compensation.pretax_fica_deductions(),
        );
        // The perquisite is wage income: it raises gross (and FICA wages)
        // while the pre-tax deductions stay as elected.
        let with_perquisite = us_payroll::annual_liability(
            self.tables,
            input.filing_status,
            compensation.gross() + perquisite_usd,
            compensation.pretax_income_deductions(),
            compensation.pretax_fica_deductions(),
        );
        let base_total_tax_usd = baseline.total();
        let total_tax_with_perquisite_usd = with_perquisite.total();
        let marginal_tax_from_perquisite_usd =
            (total_tax_with_perquisite_usd - base_total_tax_usd).max(Decimal::ZERO);

        let holding = holding_months(input.exercise_date, input.sale_date);
        let capital_gain_usd = if input.plan_to_exercise {
            round_half_up((fmv_sale_usd - fmv_exercise_usd) * total_shares)
        } else {
            Decimal::ZERO
        };

        let (capital_gain_tax_usd, niit_usd) = if capital_gain_usd > Decimal::ZERO {
            let base = if holding > self.tables.long_term_holding_months {
                round_half_up(capital_gain_usd * ltcg_rate)
            } else {
                self.short_term_gain_tax(
                    input.filing_status,
                    &with_perquisite,
                    capital_gain_usd,
                )
            };
            let niit = if input.include_niit {
                self.niit(input.filing_status, &with_perquisite, capital_gain_usd)
            } else {
                Decimal::ZERO
            };
            (base + niit, niit)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let total_tax_usd = marginal_tax_from_perquisite_usd + capital_gain_tax_usd;
        let total_cost_to_exercise_usd = exercise_cost_usd + total_tax_usd;
        let gross_proceeds_usd = if input.plan_to_exercise {
            round_half_up(fmv_sale_usd * total_shares)
        } else {
            Decimal::ZERO
        };
        let net_after_tax_usd = if input.plan_to_exercise {
            gross_proceeds_usd - total_cost_to_exercise_usd
        } else {
            Decimal::ZERO
        };
        let effective_tax_rate_pct = if input.plan_to_exercise
            && gross_proceeds_usd > Decimal::ZERO
        {
            round_half_up(total_tax_usd / gross_proceeds_usd * Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        Ok(UsEsopResult {
            total_shares,
            exercise_price_usd,
            fmv_exercise_usd,
            fmv_sale_usd,
            weighted_avg_exercise_price_usd,
            perquisite_usd,
            base_total_tax_usd,
            total_tax_with_perquisite_usd,
            marginal_tax_from_perquisite_usd,
            holding_months: holding,
            capital_gain_usd,
            capital_gain_tax_usd,
            niit_usd,
            exercise_cost_usd,
            total_tax_usd,
            total_cost_to_exercise_usd,
            gross_proceeds_usd,
            net_after_tax_usd,
            effective_tax_rate_pct,
        })
    }

    /// Federal + CA tax increments from stacking the gain on top of the
    /// with-perquisite taxable amounts. Gains are not FICA wages.
    fn short_term_gain_tax(
        &self,
        filing_status: FilingStatus,
        with_perquisite: &AnnualLiability,
        gain: Decimal,
    ) -> Decimal {
        let fed_with_gain = round_half_up(progressive_tax(
            with_perquisite.fed_taxable + gain,
            self.tables.fed_brackets.for_status(filing_status),
        ));
        let ca_with_gain = round_half_up(progressive_tax(
            with_perquisite.ca_taxable + gain,
            self.tables.ca_brackets.for_status(filing_status),
        ));
        (fed_with_gain - with_perquisite.fed_tax) + (ca_with_gain - with_perquisite.ca_tax)
    }

    /// NIIT on the portion of the gain above the MAGI threshold, with MAGI
    /// approximated as with-perquisite adjusted income plus the gain.
    fn niit(
        &self,
        filing_status: FilingStatus,
        with_perquisite: &AnnualLiability,
        gain: Decimal,
    ) -> Decimal {
        let approx_magi = with_perquisite.adjusted_income + gain;
        let threshold = *self.tables.niit_threshold.for_status(filing_status);
        let taxable = gain.min((approx_magi - threshold).max(Decimal::ZERO));
        round_half_up(taxable * self.tables.niit_rate)
    }
}

fn clamped_ltcg_rate(rate: Decimal) -> Decimal {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        warn!(rate = %rate, "long-term capital gains rate outside [0, 1]; clamping");
        return rate.clamp(Decimal::ZERO, Decimal::ONE);
    }
    rate
}
