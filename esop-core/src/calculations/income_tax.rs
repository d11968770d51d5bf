//! Annual US federal + California income tax for a one- or two-earner
//! household, with payroll taxes, a per-pay-period breakdown, and a one-time
//! bonus estimate.
//!
//! Each earner's 401(k) election is resolved once at the start (percent of
//! gross or a fixed annual amount, capped at the employee limit), health and
//! "other" pre-tax amounts annualize from half-monthly payroll periods, and
//! the household totals flow through the shared federal + CA + FICA + SDI
//! liability. A base-salary-only view of the same pipeline feeds the
//! per-period breakdown and serves as the baseline for the bonus estimate.
//! Dual-earner households also get a proportional display allocation of every
//! tax component.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use esop_core::calculations::income_tax::{
//!     EarnerIncome, IncomeTaxCalculator, IncomeTaxInput, K401Election,
//! };
//! use esop_core::{FilingStatus, PayFrequency, UsTaxTables};
//!
//! let tables = UsTaxTables::year_2025();
//! let calculator = IncomeTaxCalculator::new(&tables);
//!
//! let input = IncomeTaxInput {
//!     primary: EarnerIncome {
//!         base_salary: dec!(100000),
//!         bonus: dec!(0),
//!         k401: K401Election::FixedAnnual(dec!(0)),
//!         k401_match_pct: dec!(0),
//!         health_per_period: dec!(0),
//!         other_per_period: dec!(0),
//!     },
//!     spouse: None,
//!     filing_status: FilingStatus::Single,
//!     pay_frequency: PayFrequency::Monthly,
//! };
//!
//! let result = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(result.total_tax, dec!(27736.63));
//! assert_eq!(result.net_annual, dec!(72263.37));
//! assert_eq!(result.suggested_ordinary_rate_pct, dec!(31.3));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{non_negative, round_half_up, round_to_dollar, round_to_tenth};
use crate::calculations::progressive::marginal_rate;
use crate::calculations::us_payroll::{self, AnnualLiability};
use crate::config::{TableError, UsTaxTables};
use crate::models::{CompensationProfile, FilingStatus, PayFrequency};

/// Health and "other" pre-tax amounts are entered per half-monthly payroll
/// period regardless of the selected pay frequency.
const HALF_MONTHLY_PERIODS: Decimal = dec!(24);

const SUGGESTED_RATE_CAP_PCT: Decimal = dec!(60);

/// Errors that can occur during a household income-tax calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IncomeTaxError {
    /// The injected tax tables failed validation.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// How an earner elects their employee 401(k) contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum K401Election {
    /// Percent of the earner's gross (salary + bonus), e.g. `5` for 5%.
    PercentOfSalary(Decimal),
    /// Fixed annual dollar amount.
    FixedAnnual(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnerIncome {
    pub base_salary: Decimal,
    pub bonus: Decimal,
    pub k401: K401Election,
    /// Employer match as a percent of base salary. Informational only.
    pub k401_match_pct: Decimal,
    /// Health insurance pre-tax deduction per half-monthly period.
    pub health_per_period: Decimal,
    /// Other cafeteria pre-tax deductions per half-monthly period.
    pub other_per_period: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub primary: EarnerIncome,
    pub spouse: Option<EarnerIncome>,
    pub filing_status: FilingStatus,
    pub pay_frequency: PayFrequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarnerRole {
    Primary,
    Spouse,
}

/// The household pipeline re-run on base salaries only: no bonus, percent
/// 401(k) elections re-derived from base gross, fixed elections excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseOnlyTaxes {
    pub gross: Decimal,
    pub pretax_annual: Decimal,
    pub adjusted_income: Decimal,
    pub fed_tax: Decimal,
    pub ca_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub sdi: Decimal,
    pub total_tax: Decimal,
    pub net_annual: Decimal,
    /// Wages subject to Social Security after the cap; bonus headroom.
    pub ss_taxable_wages: Decimal,
    pub fica_base: Decimal,
}

/// One-time tax estimate for the household bonus, on top of the base-only
/// baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusEstimate {
    pub bonus: Decimal,
    pub fed_tax: Decimal,
    pub ca_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub sdi: Decimal,
    pub total_tax: Decimal,
    pub net_bonus: Decimal,
}

/// Display split of the household taxes, proportional to each earner's share
/// of gross income. Never fed back into the computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnerAllocation {
    pub role: EarnerRole,
    pub gross: Decimal,
    pub share_pct: Decimal,
    pub fed_tax: Decimal,
    pub ca_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub sdi: Decimal,
    pub total_tax: Decimal,
    pub net_annual: Decimal,
}

/// Base-only annual figures split across pay periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPeriodBreakdown {
    pub periods_per_year: u32,
    pub gross: Decimal,
    pub pretax: Decimal,
    pub fed_tax: Decimal,
    pub ca_tax: Decimal,
    /// Social Security + Medicare + Additional Medicare combined.
    pub fica: Decimal,
    pub sdi: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    pub gross_income: Decimal,
    pub pretax_annual: Decimal,
    pub adjusted_income: Decimal,
    pub fed_taxable: Decimal,
    pub fed_tax: Decimal,
    pub ca_taxable: Decimal,
    pub ca_tax: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub sdi: Decimal,
    pub total_tax: Decimal,
    pub net_annual: Decimal,
    pub fed_marginal_rate_pct: Decimal,
    pub ca_marginal_rate_pct: Decimal,
    /// Combined marginal rate for ordinary-income withholding, capped.
    pub suggested_ordinary_rate_pct: Decimal,
    pub effective_tax_rate_pct: Decimal,
    pub periods_per_year: u32,
    pub base_only: BaseOnlyTaxes,
    pub bonus: BonusEstimate,
    pub employer_match_annual: Decimal,
    /// Employee 401(k) limit times the number of earners.
    pub household_k401_cap: Decimal,
    pub allocations: Vec<EarnerAllocation>,
    /// Resolved primary-earner figures, reusable by an ESOP calculation.
    pub primary_compensation: CompensationProfile,
}

impl IncomeTaxResult {
    /// Splits the base-salary-only figures across pay periods.
    pub fn per_period(&self) -> PerPeriodBreakdown {
        let periods = Decimal::from(self.periods_per_year);
        let split = |value: Decimal| round_half_up(value / periods);
        PerPeriodBreakdown {
            periods_per_year: self.periods_per_year,
            gross: split(self.base_only.gross),
            pretax: split(self.base_only.pretax_annual),
            fed_tax: split(self.base_only.fed_tax),
            ca_tax: split(self.base_only.ca_tax),
            fica: split(
                self.base_only.social_security
                    + self.base_only.medicare
                    + self.base_only.additional_medicare,
            ),
            sdi: split(self.base_only.sdi),
            net: split(self.base_only.net_annual),
        }
    }
}

/// An earner after election resolution: clamped amounts, annualized
/// deductions, and the derived 401(k) contribution.
#[derive(Debug, Clone)]
struct ResolvedEarner {
    role: EarnerRole,
    profile: CompensationProfile,
    k401_match: Decimal,
    election: K401Election,
}

/// Calculator for household income-tax scenarios over a fixed set of tables.
#[derive(Debug, Clone)]
pub struct IncomeTaxCalculator<'a> {
    tables: &'a UsTaxTables,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(tables: &'a UsTaxTables) -> Self {
        Self { tables }
    }

    /// Runs the full household calculation.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeTaxError`] if the tables fail validation. Ordinary
    /// inputs never fail; negative amounts are clamped to zero.
    pub fn calculate(
        &self,
        input: &IncomeTaxInput,
    ) -> Result<IncomeTaxResult, IncomeTaxError> {
        self.tables.validate()?;

        let mut earners = vec![self.resolve_earner(EarnerRole::Primary, &input.primary)];
        if let Some(spouse) = &input.spouse {
            earners.push(self.resolve_earner(EarnerRole::Spouse, spouse));
        }

        let gross_income: Decimal = earners.iter().map(|e| e.profile.gross()).sum();
        let pretax_annual: Decimal = earners
            .iter()
            .map(|e| e.profile.pretax_income_deductions())
            .sum();
        let pretax_fica: Decimal = earners
            .iter()
            .map(|e| e.profile.pretax_fica_deductions())
            .sum();

        let liability = us_payroll::annual_liability(
            self.tables,
            input.filing_status,
            gross_income,
            pretax_annual,
            pretax_fica,
        );
        let total_tax = liability.total();
        let net_annual = liability.adjusted_income - total_tax;

        let fed_marginal = marginal_rate(
            liability.fed_taxable,
            self.tables.fed_brackets.for_status(input.filing_status),
        );
        let ca_marginal = marginal_rate(
            liability.ca_taxable,
            self.tables.ca_brackets.for_status(input.filing_status),
        );
        let fed_marginal_rate_pct = round_half_up(fed_marginal * Decimal::ONE_HUNDRED);
        let ca_marginal_rate_pct = round_half_up(ca_marginal * Decimal::ONE_HUNDRED);
        let suggested_ordinary_rate_pct =
            round_to_tenth(fed_marginal_rate_pct + ca_marginal_rate_pct)
                .min(SUGGESTED_RATE_CAP_PCT);

        let base_only = self.base_only_view(&earners, input.filing_status);
        let household_bonus: Decimal = earners.iter().map(|e| e.profile.bonus).sum();
        let bonus = self.bonus_estimate(
            household_bonus,
            fed_marginal,
            ca_marginal,
            &base_only,
            input.filing_status,
        );

        let allocations = self.allocations(&earners, &liability, gross_income);

        let employer_match_annual =
            round_half_up(earners.iter().map(|e| e.k401_match).sum::<Decimal>());
        let household_k401_cap =
            self.tables.k401_employee_limit * Decimal::from(earners.len() as u32);

        let effective_tax_rate_pct = if gross_income > Decimal::ZERO {
            round_to_tenth(total_tax / gross_income * Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        let primary_compensation = earners[0].profile.clone();

        Ok(IncomeTaxResult {
            gross_income,
            pretax_annual,
            adjusted_income: liability.adjusted_income,
            fed_taxable: liability.fed_taxable,
            fed_tax: liability.fed_tax,
            ca_taxable: liability.ca_taxable,
            ca_tax: liability.ca_tax,
            social_security: liability.social_security,
            medicare: liability.medicare,
            additional_medicare: liability.additional_medicare,
            sdi: liability.sdi,
            total_tax,
            net_annual,
            fed_marginal_rate_pct,
            ca_marginal_rate_pct,
            suggested_ordinary_rate_pct,
            effective_tax_rate_pct,
            periods_per_year: input.pay_frequency.periods_per_year(),
            base_only,
            bonus,
            employer_match_annual,
            household_k401_cap,
            allocations,
            primary_compensation,
        })
    }

    fn resolve_earner(
        &self,
        role: EarnerRole,
        income: &EarnerIncome,
    ) -> ResolvedEarner {
        let base_salary = non_negative("base_salary", income.base_salary);
        let bonus = non_negative("bonus", income.bonus);
        let health_annual =
            non_negative("health_per_period", income.health_per_period) * HALF_MONTHLY_PERIODS;
        let other_annual =
            non_negative("other_per_period", income.other_per_period) * HALF_MONTHLY_PERIODS;
        let k401_contribution = self.resolve_k401(&income.k401, base_salary + bonus);
        let k401_match =
            non_negative("k401_match_pct", income.k401_match_pct) / Decimal::ONE_HUNDRED
                * base_salary;

        ResolvedEarner {
            role,
            profile: CompensationProfile {
                base_salary,
                bonus,
                k401_contribution,
                health_annual,
                other_annual,
            },
            k401_match,
            election: income.k401.clone(),
        }
    }

    /// Derives the employee 401(k) contribution from an election, capped at
    /// the statutory per-earner limit.
    fn resolve_k401(
        &self,
        election: &K401Election,
        earner_gross: Decimal,
    ) -> Decimal {
        let cap = self.tables.k401_employee_limit;
        let requested = match election {
            K401Election::PercentOfSalary(pct) => {
                let pct = non_negative("k401_percent", *pct);
                round_to_dollar(pct / Decimal::ONE_HUNDRED * earner_gross)
            }
            K401Election::FixedAnnual(amount) => non_negative("k401_annual", *amount),
        };
        if requested > cap {
            debug!(%requested, %cap, "401(k) election capped at the employee limit");
            return cap;
        }
        requested
    }

    fn base_only_view(
        &self,
        earners: &[ResolvedEarner],
        filing_status: FilingStatus,
    ) -> BaseOnlyTaxes {
        let gross: Decimal = earners.iter().map(|e| e.profile.base_salary).sum();
        let pretax_annual: Decimal = earners
            .iter()
            .map(|e| {
                self.base_only_k401(&e.election, e.profile.base_salary)
                    + e.profile.health_annual
                    + e.profile.other_annual
            })
            .sum();
        let pretax_fica: Decimal = earners
            .iter()
            .map(|e| e.profile.pretax_fica_deductions())
            .sum();

        let liability = us_payroll::annual_liability(
            self.tables,
            filing_status,
            gross,
            pretax_annual,
            pretax_fica,
        );
        let total_tax = liability.total();

        BaseOnlyTaxes {
            gross,
            pretax_annual,
            adjusted_income: liability.adjusted_income,
            fed_tax: liability.fed_tax,
            ca_tax: liability.ca_tax,
            social_security: liability.social_security,
            medicare: liability.medicare,
            additional_medicare: liability.additional_medicare,
            sdi: liability.sdi,
            total_tax,
            net_annual: liability.adjusted_income - total_tax,
            ss_taxable_wages: liability.ss_taxable_wages,
            fica_base: liability.fica_base,
        }
    }

    /// Percent elections re-derive from base salary alone; fixed-dollar
    /// elections are attributed entirely to the bonus view and excluded here.
    fn base_only_k401(
        &self,
        election: &K401Election,
        base_salary: Decimal,
    ) -> Decimal {
        match election {
            K401Election::PercentOfSalary(_) => self.resolve_k401(election, base_salary),
            K401Election::FixedAnnual(_) => Decimal::ZERO,
        }
    }

    /// One-time bonus taxes on top of the base-only baseline: federal and CA
    /// at the household marginal rates, Social Security within the remaining
    /// wage-base headroom, Additional Medicare as the increment over the
    /// base-only FICA wages.
    fn bonus_estimate(
        &self,
        bonus: Decimal,
        fed_marginal: Decimal,
        ca_marginal: Decimal,
        base_only: &BaseOnlyTaxes,
        filing_status: FilingStatus,
    ) -> BonusEstimate {
        let fica = &self.tables.fica;
        let fed_tax = round_half_up(bonus * fed_marginal);
        let ca_tax = round_half_up(bonus * ca_marginal);

        let ss_headroom = (fica.ss_wage_base - base_only.ss_taxable_wages).max(Decimal::ZERO);
        let social_security = round_half_up(bonus.min(ss_headroom) * fica.ss_rate);
        let medicare = round_half_up(bonus * fica.medicare_rate);

        let threshold = *fica.additional_medicare_threshold.for_status(filing_status);
        let additional_medicare = round_half_up(
            ((base_only.fica_base + bonus - threshold).max(Decimal::ZERO)
                - (base_only.fica_base - threshold).max(Decimal::ZERO))
                * fica.additional_medicare_rate,
        );
        let sdi = round_half_up(bonus * fica.sdi_rate);

        let total_tax =
            fed_tax + ca_tax + social_security + medicare + additional_medicare + sdi;

        BonusEstimate {
            bonus,
            fed_tax,
            ca_tax,
            social_security,
            medicare,
            additional_medicare,
            sdi,
            total_tax,
            net_bonus: bonus - total_tax,
        }
    }

    fn allocations(
        &self,
        earners: &[ResolvedEarner],
        liability: &AnnualLiability,
        household_gross: Decimal,
    ) -> Vec<EarnerAllocation> {
        earners
            .iter()
            .map(|earner| {
                let gross = earner.profile.gross();
                let share = gross.checked_div(household_gross).unwrap_or(Decimal::ZERO);
                let fed_tax = round_half_up(liability.fed_tax * share);
                let ca_tax = round_half_up(liability.ca_tax * share);
                let social_security = round_half_up(liability.social_security * share);
                let medicare = round_half_up(liability.medicare * share);
                let additional_medicare = round_half_up(liability.additional_medicare * share);
                let sdi = round_half_up(liability.sdi * share);
                let total_tax =
                    fed_tax + ca_tax + social_security + medicare + additional_medicare + sdi;
                let net_annual = round_half_up(
                    gross - earner.profile.pretax_income_deductions() - total_tax,
                );

                EarnerAllocation {
                    role: earner.role,
                    gross,
                    share_pct: round_half_up(share * Decimal::ONE_HUNDRED),
                    fed_tax,
                    ca_tax,
                    social_security,
                    medicare,
                    additional_medicare,
                    sdi,
                    total_tax,
                    net_annual,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn tables() -> UsTaxTables {
        UsTaxTables::year_2025()
    }

    fn earner(
        base_salary: Decimal,
        bonus: Decimal,
    ) -> EarnerIncome {
        EarnerIncome {
            base_salary,
            bonus,
            k401: K401Election::FixedAnnual(dec!(0)),
            k401_match_pct: dec!(0),
            health_per_period: dec!(0),
            other_per_period: dec!(0),
        }
    }

    fn single_input(
        base_salary: Decimal,
        bonus: Decimal,
    ) -> IncomeTaxInput {
        IncomeTaxInput {
            primary: earner(base_salary, bonus),
            spouse: None,
            filing_status: FilingStatus::Single,
            pay_frequency: PayFrequency::Monthly,
        }
    }

    fn calculate(input: &IncomeTaxInput) -> Result<IncomeTaxResult, IncomeTaxError> {
        let tables = tables();
        IncomeTaxCalculator::new(&tables).calculate(input)
    }

    // =========================================================================
    // annual liability tests
    // =========================================================================

    #[test]
    fn single_earner_annual_totals() {
        let result = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        assert_eq!(result.gross_income, dec!(100000));
        assert_eq!(result.adjusted_income, dec!(100000.00));
        assert_eq!(result.fed_tax, dec!(13449.00));
        assert_eq!(result.ca_tax, dec!(5437.63));
        assert_eq!(result.social_security, dec!(6200.00));
        assert_eq!(result.medicare, dec!(1450.00));
        assert_eq!(result.additional_medicare, dec!(0.00));
        assert_eq!(result.sdi, dec!(1200.00));
        assert_eq!(result.total_tax, dec!(27736.63));
        assert_eq!(result.net_annual, dec!(72263.37));
    }

    #[test]
    fn marginal_and_suggested_rates() {
        let result = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        assert_eq!(result.fed_marginal_rate_pct, dec!(22.00));
        assert_eq!(result.ca_marginal_rate_pct, dec!(9.30));
        assert_eq!(result.suggested_ordinary_rate_pct, dec!(31.3));
    }

    #[test]
    fn suggested_rate_is_capped() {
        let mut tables = tables();
        let top_bracket = tables
            .ca_brackets
            .single
            .last_mut()
            .expect("Failed to find top CA bracket");
        top_bracket.rate = dec!(0.40);

        let result = IncomeTaxCalculator::new(&tables)
            .calculate(&single_input(dec!(1000000), dec!(0)))
            .unwrap();

        assert_eq!(result.fed_marginal_rate_pct, dec!(37.00));
        assert_eq!(result.ca_marginal_rate_pct, dec!(40.00));
        assert_eq!(result.suggested_ordinary_rate_pct, dec!(60));
    }

    #[test]
    fn effective_rate_uses_one_decimal() {
        let result = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        assert_eq!(result.effective_tax_rate_pct, dec!(27.7));
    }

    #[test]
    fn pretax_deductions_reduce_income_taxes_but_not_sdi() {
        let mut input = single_input(dec!(100000), dec!(0));
        input.primary.health_per_period = dec!(100);
        input.primary.other_per_period = dec!(50);

        let result = calculate(&input).unwrap();

        assert_eq!(result.pretax_annual, dec!(3600));
        assert_eq!(result.adjusted_income, dec!(96400.00));
        assert_eq!(result.fed_tax, dec!(12657.00));
        assert_eq!(result.ca_tax, dec!(5102.83));
        assert_eq!(result.social_security, dec!(5976.80));
        assert_eq!(result.medicare, dec!(1397.80));
        assert_eq!(result.sdi, dec!(1200.00));
        assert_eq!(result.total_tax, dec!(26334.43));
        assert_eq!(result.net_annual, dec!(70065.57));
    }

    #[test]
    fn zero_income_household_owes_nothing() {
        let result = calculate(&single_input(dec!(0), dec!(0))).unwrap();

        assert_eq!(result.total_tax, dec!(0.00));
        assert_eq!(result.net_annual, dec!(0.00));
        assert_eq!(result.effective_tax_rate_pct, dec!(0));
        // Marginal rates describe the next dollar earned.
        assert_eq!(result.fed_marginal_rate_pct, dec!(10.00));
        assert_eq!(result.ca_marginal_rate_pct, dec!(1.00));
        assert_eq!(result.allocations[0].share_pct, dec!(0.00));
        assert_eq!(result.allocations[0].net_annual, dec!(0.00));
    }

    #[test]
    fn negative_amounts_are_clamped_to_zero() {
        let _guard = init_test_tracing();
        let mut input = single_input(dec!(-50000), dec!(-1000));
        input.primary.health_per_period = dec!(-100);

        let result = calculate(&input).unwrap();

        assert_eq!(result.gross_income, dec!(0));
        assert_eq!(result.pretax_annual, dec!(0));
        assert_eq!(result.total_tax, dec!(0.00));
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let mut tables = tables();
        tables.ca_brackets.mfj.clear();
        let mut input = single_input(dec!(100000), dec!(0));
        input.filing_status = FilingStatus::MarriedFilingJointly;

        let result = IncomeTaxCalculator::new(&tables).calculate(&input);

        assert_eq!(
            result,
            Err(IncomeTaxError::Table(TableError::EmptyBrackets {
                table: "CA MFJ"
            }))
        );
    }

    // =========================================================================
    // 401(k) resolution tests
    // =========================================================================

    #[test]
    fn percent_election_derives_from_gross() {
        let mut input = single_input(dec!(120000), dec!(0));
        input.primary.k401 = K401Election::PercentOfSalary(dec!(10));

        let result = calculate(&input).unwrap();

        assert_eq!(result.primary_compensation.k401_contribution, dec!(12000));
        assert_eq!(result.pretax_annual, dec!(12000));
    }

    #[test]
    fn percent_election_caps_at_employee_limit() {
        let mut input = single_input(dec!(120000), dec!(0));
        input.primary.k401 = K401Election::PercentOfSalary(dec!(25));

        let result = calculate(&input).unwrap();

        assert_eq!(result.primary_compensation.k401_contribution, dec!(23500));
    }

    #[test]
    fn fixed_election_caps_at_employee_limit() {
        let mut input = single_input(dec!(120000), dec!(0));
        input.primary.k401 = K401Election::FixedAnnual(dec!(30000));

        let result = calculate(&input).unwrap();

        assert_eq!(result.primary_compensation.k401_contribution, dec!(23500));
    }

    #[test]
    fn percent_election_rounds_to_whole_dollars() {
        let mut input = single_input(dec!(98765), dec!(0));
        input.primary.k401 = K401Election::PercentOfSalary(dec!(7.5));

        let result = calculate(&input).unwrap();

        // 7.5% of 98,765 is 7,407.375
        assert_eq!(result.primary_compensation.k401_contribution, dec!(7407));
    }

    #[test]
    fn household_k401_cap_scales_with_earner_count() {
        let single = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        let dual_input = IncomeTaxInput {
            primary: earner(dec!(100000), dec!(0)),
            spouse: Some(earner(dec!(80000), dec!(0))),
            filing_status: FilingStatus::MarriedFilingJointly,
            pay_frequency: PayFrequency::Monthly,
        };
        let dual = calculate(&dual_input).unwrap();

        assert_eq!(single.household_k401_cap, dec!(23500));
        assert_eq!(dual.household_k401_cap, dec!(47000));
    }

    #[test]
    fn employer_match_is_informational_only() {
        let mut input = single_input(dec!(100000), dec!(0));
        input.primary.k401_match_pct = dec!(4);
        let with_match = calculate(&input).unwrap();
        let without_match = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        assert_eq!(with_match.employer_match_annual, dec!(4000.00));
        assert_eq!(with_match.gross_income, without_match.gross_income);
        assert_eq!(with_match.total_tax, without_match.total_tax);
    }

    // =========================================================================
    // base-only view and per-period tests
    // =========================================================================

    #[test]
    fn base_only_view_excludes_bonus() {
        let result = calculate(&single_input(dec!(150000), dec!(50000))).unwrap();

        assert_eq!(result.gross_income, dec!(200000));
        assert_eq!(result.base_only.gross, dec!(150000));
        assert_eq!(result.base_only.fed_tax, dec!(25067.00));
        assert_eq!(result.base_only.ca_tax, dec!(10087.63));
        assert_eq!(result.base_only.total_tax, dec!(48429.63));
        assert_eq!(result.base_only.net_annual, dec!(101570.37));
    }

    #[test]
    fn base_only_view_rederives_percent_elections_from_base_salary() {
        let mut input = single_input(dec!(100000), dec!(50000));
        input.primary.k401 = K401Election::PercentOfSalary(dec!(10));

        let result = calculate(&input).unwrap();

        assert_eq!(result.pretax_annual, dec!(15000));
        assert_eq!(result.base_only.pretax_annual, dec!(10000));
    }

    #[test]
    fn base_only_view_excludes_fixed_elections() {
        let mut input = single_input(dec!(100000), dec!(50000));
        input.primary.k401 = K401Election::FixedAnnual(dec!(12000));

        let result = calculate(&input).unwrap();

        assert_eq!(result.pretax_annual, dec!(12000));
        assert_eq!(result.base_only.pretax_annual, dec!(0));
    }

    #[test]
    fn per_period_splits_base_only_figures_monthly() {
        let result = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        let per_period = result.per_period();

        assert_eq!(per_period.periods_per_year, 12);
        assert_eq!(per_period.gross, dec!(8333.33));
        assert_eq!(per_period.pretax, dec!(0.00));
        assert_eq!(per_period.fed_tax, dec!(1120.75));
        assert_eq!(per_period.ca_tax, dec!(453.14));
        assert_eq!(per_period.fica, dec!(637.50));
        assert_eq!(per_period.sdi, dec!(100.00));
        assert_eq!(per_period.net, dec!(6021.95));
    }

    #[test]
    fn per_period_respects_pay_frequency() {
        let mut input = single_input(dec!(100000), dec!(0));

        input.pay_frequency = PayFrequency::SemiMonthly;
        let semi_monthly = calculate(&input).unwrap().per_period();

        input.pay_frequency = PayFrequency::Yearly;
        let yearly = calculate(&input).unwrap().per_period();

        assert_eq!(semi_monthly.periods_per_year, 24);
        assert_eq!(semi_monthly.gross, dec!(4166.67));
        assert_eq!(yearly.periods_per_year, 1);
        assert_eq!(yearly.gross, dec!(100000.00));
    }

    // =========================================================================
    // bonus estimate tests
    // =========================================================================

    #[test]
    fn bonus_estimate_uses_marginal_rates_and_ss_headroom() {
        let result = calculate(&single_input(dec!(150000), dec!(50000))).unwrap();

        // fed marginal 24%, CA marginal 9.3% at the household taxable amounts;
        // SS headroom 176,100 − 150,000 = 26,100
        assert_eq!(result.fed_marginal_rate_pct, dec!(24.00));
        assert_eq!(result.ca_marginal_rate_pct, dec!(9.30));
        assert_eq!(result.bonus.bonus, dec!(50000));
        assert_eq!(result.bonus.fed_tax, dec!(12000.00));
        assert_eq!(result.bonus.ca_tax, dec!(4650.00));
        assert_eq!(result.bonus.social_security, dec!(1618.20));
        assert_eq!(result.bonus.medicare, dec!(725.00));
        assert_eq!(result.bonus.additional_medicare, dec!(0.00));
        assert_eq!(result.bonus.sdi, dec!(600.00));
        assert_eq!(result.bonus.total_tax, dec!(19593.20));
        assert_eq!(result.bonus.net_bonus, dec!(30406.80));
    }

    #[test]
    fn bonus_estimate_handles_exhausted_ss_headroom() {
        let result = calculate(&single_input(dec!(180000), dec!(40000))).unwrap();

        // Base salary is already past the wage base; the bonus pushes FICA
        // wages over the Additional Medicare threshold by 20,000.
        assert_eq!(result.bonus.social_security, dec!(0.00));
        assert_eq!(result.bonus.additional_medicare, dec!(180.00));
        assert_eq!(result.bonus.fed_tax, dec!(12800.00));
        assert_eq!(result.bonus.ca_tax, dec!(3720.00));
        assert_eq!(result.bonus.medicare, dec!(580.00));
        assert_eq!(result.bonus.sdi, dec!(480.00));
        assert_eq!(result.bonus.total_tax, dec!(17760.00));
        assert_eq!(result.bonus.net_bonus, dec!(22240.00));
    }

    #[test]
    fn zero_bonus_estimates_zero() {
        let result = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        assert_eq!(result.bonus.bonus, dec!(0));
        assert_eq!(result.bonus.total_tax, dec!(0.00));
        assert_eq!(result.bonus.net_bonus, dec!(0.00));
    }

    // =========================================================================
    // dual-earner tests
    // =========================================================================

    #[test]
    fn dual_earner_household_files_jointly() {
        let input = IncomeTaxInput {
            primary: earner(dec!(120000), dec!(0)),
            spouse: Some(earner(dec!(80000), dec!(0))),
            filing_status: FilingStatus::MarriedFilingJointly,
            pay_frequency: PayFrequency::Monthly,
        };

        let result = calculate(&input).unwrap();

        assert_eq!(result.gross_income, dec!(200000));
        assert_eq!(result.fed_tax, dec!(26898.00));
        assert_eq!(result.ca_tax, dec!(10875.26));
        assert_eq!(result.social_security, dec!(10918.20));
        assert_eq!(result.medicare, dec!(2900.00));
        assert_eq!(result.additional_medicare, dec!(0.00));
        assert_eq!(result.sdi, dec!(2400.00));
        assert_eq!(result.total_tax, dec!(53991.46));
    }

    #[test]
    fn allocation_splits_by_gross_share() {
        let input = IncomeTaxInput {
            primary: earner(dec!(120000), dec!(0)),
            spouse: Some(earner(dec!(80000), dec!(0))),
            filing_status: FilingStatus::MarriedFilingJointly,
            pay_frequency: PayFrequency::Monthly,
        };

        let result = calculate(&input).unwrap();

        let primary = &result.allocations[0];
        let spouse = &result.allocations[1];

        assert_eq!(primary.role, EarnerRole::Primary);
        assert_eq!(primary.share_pct, dec!(60.00));
        assert_eq!(primary.fed_tax, dec!(16138.80));
        assert_eq!(primary.total_tax, dec!(32394.88));
        assert_eq!(primary.net_annual, dec!(87605.12));

        assert_eq!(spouse.role, EarnerRole::Spouse);
        assert_eq!(spouse.share_pct, dec!(40.00));
        assert_eq!(spouse.total_tax, dec!(21596.58));
        assert_eq!(spouse.net_annual, dec!(58403.42));

        // The display split carries the whole household liability.
        assert_eq!(
            primary.total_tax + spouse.total_tax,
            result.total_tax
        );
    }

    #[test]
    fn single_earner_gets_one_full_allocation_row() {
        let result = calculate(&single_input(dec!(100000), dec!(0))).unwrap();

        assert_eq!(result.allocations.len(), 1);
        assert_eq!(result.allocations[0].share_pct, dec!(100.00));
        assert_eq!(result.allocations[0].total_tax, dec!(27736.63));
        assert_eq!(result.allocations[0].net_annual, dec!(72263.37));
    }

    // =========================================================================
    // handoff tests
    // =========================================================================

    #[test]
    fn primary_compensation_echoes_resolved_figures() {
        let mut input = single_input(dec!(150000), dec!(50000));
        input.primary.k401 = K401Election::PercentOfSalary(dec!(10));
        input.primary.health_per_period = dec!(100);
        input.primary.other_per_period = dec!(50);

        let result = calculate(&input).unwrap();

        assert_eq!(
            result.primary_compensation,
            CompensationProfile {
                base_salary: dec!(150000),
                bonus: dec!(50000),
                k401_contribution: dec!(20000),
                health_annual: dec!(2400),
                other_annual: dec!(1200),
            }
        );
    }

    #[test]
    fn identical_inputs_produce_identical_results() {
        let input = single_input(dec!(150000), dec!(50000));

        let first = calculate(&input).unwrap();
        let second = calculate(&input).unwrap();

        assert_eq!(first, second);
    }
}
