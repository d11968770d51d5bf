//! India tax tables: slab schedule, surcharge bands, cess, and per-financial-year
//! policy records.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{TableError, check_amount, check_brackets, check_rate};
use crate::models::TaxBracket;

/// Policy values that change per financial year: the standard deduction and
/// the listed capital-gains treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FyPolicy {
    /// Label in `YYYY-YY` form, e.g. `2025-26`.
    pub financial_year: String,
    pub standard_deduction: Decimal,
    pub listed_stcg_rate: Decimal,
    pub listed_ltcg_rate: Decimal,
    /// Annual exemption subtracted from listed long-term gains before tax.
    pub ltcg_exemption: Decimal,
    pub new_regime: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaTaxTables {
    pub assessment_year: i32,
    pub slabs: Vec<TaxBracket>,
    /// Step function over total income giving the surcharge rate.
    pub surcharge_bands: Vec<TaxBracket>,
    /// Statutory ceiling on the surcharge rate applied to listed capital gains.
    pub listed_gains_surcharge_cap: Decimal,
    pub cess_rate: Decimal,
    /// Flat rate for unlisted long-term gains.
    pub unlisted_ltcg_rate: Decimal,
    pub listed_ltcg_threshold_months: u32,
    pub unlisted_ltcg_threshold_months: u32,
    pub policies: Vec<FyPolicy>,
    /// Fallback when an input names a financial year with no policy record.
    pub default_financial_year: String,
}

impl IndiaTaxTables {
    /// Tables for assessment year 2025, new-regime slab schedule.
    pub fn year_2025() -> Self {
        Self {
            assessment_year: 2025,
            slabs: vec![
                TaxBracket::up_to(dec!(400000), Decimal::ZERO),
                TaxBracket::up_to(dec!(800000), dec!(0.05)),
                TaxBracket::up_to(dec!(1200000), dec!(0.10)),
                TaxBracket::up_to(dec!(1600000), dec!(0.15)),
                TaxBracket::up_to(dec!(2000000), dec!(0.20)),
                TaxBracket::up_to(dec!(2400000), dec!(0.25)),
                TaxBracket::top(dec!(0.30)),
            ],
            surcharge_bands: vec![
                TaxBracket::up_to(dec!(5000000), Decimal::ZERO),
                TaxBracket::up_to(dec!(10000000), dec!(0.10)),
                TaxBracket::up_to(dec!(20000000), dec!(0.15)),
                TaxBracket::top(dec!(0.25)),
            ],
            listed_gains_surcharge_cap: dec!(0.15),
            cess_rate: dec!(0.04),
            unlisted_ltcg_rate: dec!(0.20),
            listed_ltcg_threshold_months: 12,
            unlisted_ltcg_threshold_months: 24,
            policies: vec![
                FyPolicy {
                    financial_year: "2024-25".to_string(),
                    standard_deduction: dec!(50000),
                    listed_stcg_rate: dec!(0.15),
                    listed_ltcg_rate: dec!(0.10),
                    ltcg_exemption: dec!(100000),
                    new_regime: false,
                },
                FyPolicy {
                    financial_year: "2025-26".to_string(),
                    standard_deduction: dec!(75000),
                    listed_stcg_rate: dec!(0.20),
                    listed_ltcg_rate: dec!(0.125),
                    ltcg_exemption: dec!(125000),
                    new_regime: true,
                },
                FyPolicy {
                    financial_year: "2026-27".to_string(),
                    standard_deduction: dec!(75000),
                    listed_stcg_rate: dec!(0.20),
                    listed_ltcg_rate: dec!(0.125),
                    ltcg_exemption: dec!(125000),
                    new_regime: true,
                },
            ],
            default_financial_year: "2025-26".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        check_brackets("India slab", &self.slabs)?;
        check_brackets("India surcharge", &self.surcharge_bands)?;
        check_rate("listed gains surcharge cap", self.listed_gains_surcharge_cap)?;
        check_rate("cess rate", self.cess_rate)?;
        check_rate("unlisted LTCG rate", self.unlisted_ltcg_rate)?;

        if self.policies.is_empty() {
            return Err(TableError::NoFyPolicies);
        }
        for (index, policy) in self.policies.iter().enumerate() {
            if self.policies[..index]
                .iter()
                .any(|earlier| earlier.financial_year == policy.financial_year)
            {
                return Err(TableError::DuplicateFyPolicy(policy.financial_year.clone()));
            }
            check_amount("standard deduction", policy.standard_deduction)?;
            check_amount("LTCG exemption", policy.ltcg_exemption)?;
            check_rate("listed STCG rate", policy.listed_stcg_rate)?;
            check_rate("listed LTCG rate", policy.listed_ltcg_rate)?;
        }
        if !self
            .policies
            .iter()
            .any(|policy| policy.financial_year == self.default_financial_year)
        {
            return Err(TableError::MissingDefaultFy(
                self.default_financial_year.clone(),
            ));
        }

        Ok(())
    }

    /// Looks up the policy for a financial year, falling back to the default
    /// record for unknown labels. Returns `None` only when the default itself
    /// is missing, which `validate` rejects.
    pub fn policy_for(&self, financial_year: &str) -> Option<&FyPolicy> {
        if let Some(policy) = self
            .policies
            .iter()
            .find(|policy| policy.financial_year == financial_year)
        {
            return Some(policy);
        }

        warn!(
            financial_year,
            default = %self.default_financial_year,
            "unknown financial year; using default policy"
        );
        self.policies
            .iter()
            .find(|policy| policy.financial_year == self.default_financial_year)
    }
}

impl Default for IndiaTaxTables {
    fn default() -> Self {
        Self::year_2025()
    }
}
